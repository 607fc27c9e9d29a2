//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level sample actions to Dart via FRB.
//! - Translate core dialogs into response envelopes: notices are returned,
//!   confirmations are answered up front by the caller, URLs are handed back
//!   for the host to launch.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every action response carries the redrawn table when one was produced.
//! - Edit drafts live on the Dart side; committed rows come back viewing.

use geosample_core::db::open_db;
use geosample_core::service::sample_app::MSG_INVALID_COORDINATES;
use geosample_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, map_search_url,
    today_utc, AppConfig, AppResult, SampleApp, SampleFields, SampleId, SqliteLocalStorage,
    TableView, UrlOpener, UserInterface,
};
use log::warn;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Seven descriptive form/edit values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleInput {
    pub numero_muestra: String,
    pub localidad: String,
    pub pais: String,
    pub latitud: String,
    pub longitud: String,
    pub mineralogia: String,
    pub paleontologia: String,
}

impl From<SampleInput> for SampleFields {
    fn from(value: SampleInput) -> Self {
        Self {
            numero_muestra: value.numero_muestra,
            localidad: value.localidad,
            pais: value.pais,
            latitud: value.latitud,
            longitud: value.longitud,
            mineralogia: value.mineralogia,
            paleontologia: value.paleontologia,
        }
    }
}

/// One table row for the Dart table widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRowItem {
    /// Stable sample id.
    pub sample_id: String,
    /// Seven display values in column order.
    pub values: Vec<String>,
    /// Coordinates bound to the row's map control.
    pub latitud: String,
    pub longitud: String,
}

/// Table state for one redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleTableItem {
    pub headers: Vec<String>,
    pub rows: Vec<SampleRowItem>,
    pub show_empty_message: bool,
    pub show_table: bool,
    pub show_bulk_actions: bool,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleActionResponse {
    /// Whether the action succeeded. A declined confirmation is `ok`.
    pub ok: bool,
    /// Notices raised during the action, in order, for blocking display.
    pub notices: Vec<String>,
    /// Redrawn table, when the action produced one.
    pub table: Option<SampleTableItem>,
    /// Path of a written export or URL to launch, depending on the action.
    pub target: Option<String>,
}

/// Draws the current table (startup or manual refresh).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn samples_render() -> SampleActionResponse {
    samples_render_at(&resolve_config().db_path)
}

/// Creation form submit.
#[flutter_rust_bridge::frb(sync)]
pub fn sample_submit(input: SampleInput) -> SampleActionResponse {
    sample_submit_at(&resolve_config().db_path, input)
}

/// Deletes one sample; `confirmed` is the user's answer to the delete prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn sample_delete(sample_id: String, confirmed: bool) -> SampleActionResponse {
    sample_delete_at(&resolve_config().db_path, sample_id, confirmed)
}

/// Saves an edited row with the values of its inputs.
///
/// # FFI contract
/// - Validation failures return `ok=false` and leave storage untouched; the
///   Dart side keeps the row in edit mode.
#[flutter_rust_bridge::frb(sync)]
pub fn sample_commit_edit(sample_id: String, input: SampleInput) -> SampleActionResponse {
    sample_commit_edit_at(&resolve_config().db_path, sample_id, input)
}

/// Clears every sample; `confirmed` is the user's answer to the clear prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn samples_clear(confirmed: bool) -> SampleActionResponse {
    samples_clear_at(&resolve_config().db_path, confirmed)
}

/// Writes today's CSV export into `export_dir` (or the configured default)
/// and returns its path in `target`.
#[flutter_rust_bridge::frb(sync)]
pub fn samples_export_csv(export_dir: Option<String>) -> SampleActionResponse {
    let config = resolve_config();
    let dir = export_dir
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export_dir.clone());
    samples_export_csv_at(&config.db_path, &dir)
}

/// Builds the map-search URL for a coordinate pair and returns it in
/// `target` for the host to launch in a new context.
///
/// # FFI contract
/// - Sync call, no storage access.
/// - Empty coordinates return `ok=false` with the invalid-coordinates notice.
#[flutter_rust_bridge::frb(sync)]
pub fn map_open(latitud: String, longitud: String) -> SampleActionResponse {
    match map_search_url(latitud.as_str(), longitud.as_str()) {
        Ok(url) => SampleActionResponse {
            ok: true,
            notices: Vec::new(),
            table: None,
            target: Some(url),
        },
        Err(_) => SampleActionResponse {
            ok: false,
            notices: vec![MSG_INVALID_COORDINATES.to_string()],
            table: None,
            target: None,
        },
    }
}

fn samples_render_at(db_path: &Path) -> SampleActionResponse {
    run_action(db_path, false, |app| Ok((Some(app.render()?), None)))
}

fn sample_submit_at(db_path: &Path, input: SampleInput) -> SampleActionResponse {
    run_action(db_path, false, |app| {
        Ok((Some(app.submit_sample(input.into())?), None))
    })
}

fn sample_delete_at(db_path: &Path, sample_id: String, confirmed: bool) -> SampleActionResponse {
    let id = SampleId::new(sample_id.trim());
    run_action(db_path, confirmed, |app| {
        Ok((app.delete_sample(&id)?, None))
    })
}

fn sample_commit_edit_at(
    db_path: &Path,
    sample_id: String,
    input: SampleInput,
) -> SampleActionResponse {
    let id = SampleId::new(sample_id.trim());
    run_action(db_path, false, |app| {
        app.begin_edit(&id)?;
        app.set_edit_draft(&id, input.into())?;
        Ok((Some(app.commit_edit(&id)?), None))
    })
}

fn samples_clear_at(db_path: &Path, confirmed: bool) -> SampleActionResponse {
    run_action(db_path, confirmed, |app| Ok((app.clear_all()?, None)))
}

fn samples_export_csv_at(db_path: &Path, export_dir: &Path) -> SampleActionResponse {
    run_action(db_path, false, |app| {
        let path = app.export_csv(export_dir, today_utc())?;
        Ok((None, Some(path.display().to_string())))
    })
}

/// Dialog adapter: answers confirmations with the caller's pre-supplied
/// decision and records everything else for the response.
struct EnvelopeUi {
    confirmed: bool,
    notices: RefCell<Vec<String>>,
}

impl UrlOpener for EnvelopeUi {
    fn open_url(&self, _url: &str) -> std::io::Result<()> {
        // Map URLs reach the host through `map_open`.
        Ok(())
    }
}

impl UserInterface for EnvelopeUi {
    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, _question: &str) -> bool {
        self.confirmed
    }
}

type ActionOutput = (Option<TableView>, Option<String>);

fn run_action(
    db_path: &Path,
    confirmed: bool,
    f: impl FnOnce(&mut SampleApp<SqliteLocalStorage<'_>, EnvelopeUi>) -> AppResult<ActionOutput>,
) -> SampleActionResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_action module=ffi status=error error_code=db_open_failed");
            return SampleActionResponse {
                ok: false,
                notices: vec![format!("No se pudo abrir el almacenamiento: {err}")],
                table: None,
                target: None,
            };
        }
    };

    let ui = EnvelopeUi {
        confirmed,
        notices: RefCell::new(Vec::new()),
    };
    let mut app = SampleApp::new(SqliteLocalStorage::new(&conn), ui);
    let outcome = f(&mut app);
    let notices = app.ui().notices.borrow().clone();

    match outcome {
        Ok((table, target)) => SampleActionResponse {
            ok: true,
            notices,
            table: table.as_ref().map(to_table_item),
            target,
        },
        Err(_) => SampleActionResponse {
            ok: false,
            notices,
            table: None,
            target: None,
        },
    }
}

fn resolve_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::from_env)
}

fn to_table_item(view: &TableView) -> SampleTableItem {
    SampleTableItem {
        headers: view.headers.iter().map(|header| header.to_string()).collect(),
        rows: view
            .rows
            .iter()
            .map(|row| SampleRowItem {
                sample_id: row.sample_id.to_string(),
                values: row.cells.iter().map(|cell| cell.value().to_string()).collect(),
                latitud: row.map_action.latitud.clone(),
                longitud: row.map_action.longitud.clone(),
            })
            .collect(),
        show_empty_message: view.show_empty_message,
        show_table: view.show_table,
        show_bulk_actions: view.show_bulk_actions,
    }
}
