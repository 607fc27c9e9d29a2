//! Core domain logic for the geological sample manager.
//! This crate is the single source of truth for sample invariants.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::AppConfig;
pub use export::csv::{build_csv_export, today_utc, write_csv_export, CsvExport, ExportError};
pub use export::map_link::{map_search_url, open_on_map, MapLinkError, UrlOpener};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::sample::{Sample, SampleField, SampleFields, SampleId, SampleValidationError};
pub use repo::local_storage::{
    LocalStorage, MemoryLocalStorage, RepoError, RepoResult, SqliteLocalStorage,
};
pub use service::edit_session::{EditError, EditSession, EditSessions, RowMode};
pub use service::sample_app::{AppError, AppResult, SampleApp, UserInterface};
pub use service::sample_store::{SampleStore, StoreError, StoreResult, SAMPLES_STORAGE_KEY};
pub use view::draw::draw_table;
pub use view::table::{project_table, CellView, MapAction, RowActions, RowView, TableView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
