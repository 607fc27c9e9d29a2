//! User-interaction handlers for the sample table.
//!
//! # Responsibility
//! - Wire user actions (form submit, edit, delete, clear, export, map) to the
//!   store, edit sessions and renderer.
//! - Ask for confirmation before destructive actions and report every
//!   outcome through a blocking user notification.
//!
//! # Invariants
//! - Every mutation is followed by a full redraw, which closes all open
//!   edit sessions.
//! - Declined confirmations leave state unchanged.
//! - Every error is notified to the user and returned; none is fatal.

use crate::export::csv::{build_csv_export, write_csv_export, ExportError};
use crate::export::map_link::{open_on_map, MapLinkError, UrlOpener};
use crate::model::sample::{SampleField, SampleFields, SampleId, SampleValidationError};
use crate::repo::local_storage::LocalStorage;
use crate::service::edit_session::{EditError, EditSessions};
use crate::service::sample_store::{SampleStore, StoreError};
use crate::view::table::{project_table, TableView};
use chrono::NaiveDate;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const MSG_SAMPLE_SAVED: &str =
    "Punto de datos guardado exitosamente en el almacenamiento local.";
pub const MSG_SAMPLE_DELETED: &str = "Punto de datos eliminado exitosamente.";
pub const MSG_SAMPLE_UPDATED: &str = "Punto de datos actualizado exitosamente.";
pub const MSG_ALL_CLEARED: &str =
    "Todos los datos han sido eliminados del almacenamiento local.";
pub const MSG_EXPORTED: &str = "Datos exportados exitosamente como CSV.";
pub const MSG_FIELDS_REQUIRED: &str = "Todos los campos deben tener un valor.";
pub const MSG_NOTHING_TO_EXPORT: &str = "No hay datos para exportar.";
pub const MSG_INVALID_COORDINATES: &str = "Coordenadas no válidas.";
pub const MSG_SAMPLE_MISSING: &str = "El punto de datos ya no existe.";
pub const MSG_NOT_EDITING: &str = "La fila no está en modo edición.";
pub const CONFIRM_DELETE: &str = "¿Estás seguro de que quieres eliminar este punto de datos?";
pub const CONFIRM_CLEAR_ALL: &str = "¿Estás seguro de que quieres eliminar TODOS los datos guardados? Esta acción es irreversible.";

/// Blocking user dialogs and new-context URL opening.
pub trait UserInterface: UrlOpener {
    /// Shows a message and returns once the user dismissed it.
    fn notify(&self, message: &str);
    /// Asks a yes/no question.
    fn confirm(&self, question: &str) -> bool;
}

pub type AppResult<T> = Result<T, AppError>;

/// Handler-level error taxonomy.
#[derive(Debug)]
pub enum AppError {
    /// Empty required field on create or edit.
    Validation(SampleValidationError),
    /// Export requested with no samples.
    EmptyCollection,
    /// Map lookup with an empty coordinate.
    InvalidCoordinates,
    /// Target sample does not exist.
    NotFound(SampleId),
    /// Target row is not in edit mode.
    NotEditing(SampleId),
    /// URL could not be opened.
    OpenUrl(std::io::Error),
    /// Export file could not be written.
    ExportWrite(ExportError),
    /// Storage failure or corrupt stored data.
    Store(StoreError),
}

impl AppError {
    /// Text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => MSG_FIELDS_REQUIRED.to_string(),
            Self::EmptyCollection => MSG_NOTHING_TO_EXPORT.to_string(),
            Self::InvalidCoordinates => MSG_INVALID_COORDINATES.to_string(),
            Self::NotFound(_) => MSG_SAMPLE_MISSING.to_string(),
            Self::NotEditing(_) => MSG_NOT_EDITING.to_string(),
            Self::OpenUrl(err) => format!("No se pudo abrir el mapa: {err}"),
            Self::ExportWrite(err) => format!("No se pudo exportar: {err}"),
            Self::Store(err) => format!("Error de almacenamiento: {err}"),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::EmptyCollection => "empty_collection",
            Self::InvalidCoordinates => "invalid_coordinates",
            Self::NotFound(_) => "not_found",
            Self::NotEditing(_) => "not_editing",
            Self::OpenUrl(_) => "open_url_failed",
            Self::ExportWrite(_) => "export_write_failed",
            Self::Store(StoreError::CorruptStorage(_)) => "corrupt_storage",
            Self::Store(_) => "storage",
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmptyCollection => write!(f, "no samples to export"),
            Self::InvalidCoordinates => write!(f, "latitude and longitude are required"),
            Self::NotFound(id) => write!(f, "sample not found: {id}"),
            Self::NotEditing(id) => write!(f, "sample is not being edited: {id}"),
            Self::OpenUrl(err) => write!(f, "failed to open url: {err}"),
            Self::ExportWrite(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::OpenUrl(err) => Some(err),
            Self::ExportWrite(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<EditError> for AppError {
    fn from(value: EditError) -> Self {
        match value {
            EditError::SampleNotFound(id) => Self::NotFound(id),
            EditError::NotEditing(id) => Self::NotEditing(id),
            EditError::Validation(err) => Self::Validation(err),
            EditError::Store(err) => Self::from(err),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        match value {
            ExportError::EmptyCollection => Self::EmptyCollection,
            other => Self::ExportWrite(other),
        }
    }
}

impl From<MapLinkError> for AppError {
    fn from(value: MapLinkError) -> Self {
        match value {
            MapLinkError::InvalidCoordinates => Self::InvalidCoordinates,
            MapLinkError::Open(err) => Self::OpenUrl(err),
        }
    }
}

/// Sample table application: store, edit sessions and user dialogs.
pub struct SampleApp<S: LocalStorage, U: UserInterface> {
    store: SampleStore<S>,
    sessions: EditSessions,
    ui: U,
}

impl<S: LocalStorage, U: UserInterface> SampleApp<S, U> {
    pub fn new(storage: S, ui: U) -> Self {
        Self {
            store: SampleStore::new(storage),
            sessions: EditSessions::new(),
            ui,
        }
    }

    pub fn store(&self) -> &SampleStore<S> {
        &self.store
    }

    pub fn sessions(&self) -> &EditSessions {
        &self.sessions
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Full redraw: closes every edit session and projects the store.
    pub fn render(&mut self) -> AppResult<TableView> {
        self.sessions.reset();
        self.view()
    }

    /// Projects the store without touching open edit sessions.
    pub fn view(&self) -> AppResult<TableView> {
        match self.store.list() {
            Ok(samples) => Ok(project_table(&samples, &self.sessions)),
            Err(err) => self.fail(err.into()),
        }
    }

    /// Creation form submit.
    pub fn submit_sample(&mut self, fields: SampleFields) -> AppResult<TableView> {
        if let Err(err) = self.store.add(fields) {
            return self.fail(err.into());
        }
        let view = self.render()?;
        self.ui.notify(MSG_SAMPLE_SAVED);
        Ok(view)
    }

    /// Deletes one sample after confirmation.
    ///
    /// Returns `None` when the user declined.
    pub fn delete_sample(&mut self, id: &SampleId) -> AppResult<Option<TableView>> {
        if !self.ui.confirm(CONFIRM_DELETE) {
            return Ok(None);
        }
        match self.store.remove(id) {
            Ok(true) => {}
            Ok(false) => return self.fail(AppError::NotFound(id.clone())),
            Err(err) => return self.fail(err.into()),
        }
        let view = self.render()?;
        self.ui.notify(MSG_SAMPLE_DELETED);
        Ok(Some(view))
    }

    /// Switches one row to edit mode.
    pub fn begin_edit(&mut self, id: &SampleId) -> AppResult<TableView> {
        let began = self.sessions.begin_edit(&self.store, id).map(|_| ());
        if let Err(err) = began {
            return self.fail(err.into());
        }
        self.view()
    }

    /// Updates one input of an editing row.
    pub fn set_edit_field(
        &mut self,
        id: &SampleId,
        field: SampleField,
        value: impl Into<String>,
    ) -> AppResult<()> {
        match self.sessions.set_field(id, field, value) {
            Ok(()) => Ok(()),
            Err(err) => self.fail(err.into()),
        }
    }

    /// Replaces all inputs of an editing row.
    pub fn set_edit_draft(&mut self, id: &SampleId, draft: SampleFields) -> AppResult<()> {
        match self.sessions.set_draft(id, draft) {
            Ok(()) => Ok(()),
            Err(err) => self.fail(err.into()),
        }
    }

    /// Saves an editing row.
    ///
    /// A validation failure keeps the row editing and stored data unchanged.
    pub fn commit_edit(&mut self, id: &SampleId) -> AppResult<TableView> {
        if let Err(err) = self.sessions.commit_edit(&self.store, id) {
            let err = AppError::from(err);
            if matches!(err, AppError::NotFound(_)) {
                // Stale row; the caller redraws after the notice.
                self.sessions.reset();
            }
            return self.fail(err);
        }
        let view = self.render()?;
        self.ui.notify(MSG_SAMPLE_UPDATED);
        Ok(view)
    }

    /// Removes every sample after confirmation.
    ///
    /// Returns `None` when the user declined.
    pub fn clear_all(&mut self) -> AppResult<Option<TableView>> {
        if !self.ui.confirm(CONFIRM_CLEAR_ALL) {
            return Ok(None);
        }
        if let Err(err) = self.store.clear() {
            return self.fail(err.into());
        }
        let view = self.render()?;
        self.ui.notify(MSG_ALL_CLEARED);
        Ok(Some(view))
    }

    /// Writes the CSV export for `date` into `dir`.
    ///
    /// Returns the written file path.
    pub fn export_csv(&self, dir: &Path, date: NaiveDate) -> AppResult<PathBuf> {
        let samples = match self.store.list() {
            Ok(samples) => samples,
            Err(err) => return self.fail(err.into()),
        };
        let written = build_csv_export(&samples, date)
            .and_then(|export| write_csv_export(dir, &export));
        match written {
            Ok(path) => {
                self.ui.notify(MSG_EXPORTED);
                Ok(path)
            }
            Err(err) => self.fail(err.into()),
        }
    }

    /// Opens the map search for a coordinate pair, from a row control or
    /// the manual coordinates form.
    ///
    /// Returns the opened URL.
    pub fn open_on_map(&self, latitud: &str, longitud: &str) -> AppResult<String> {
        match open_on_map(&self.ui, latitud, longitud) {
            Ok(url) => Ok(url),
            Err(err) => self.fail(err.into()),
        }
    }

    /// Opens the map for one stored sample's coordinates.
    pub fn open_sample_on_map(&self, id: &SampleId) -> AppResult<String> {
        let sample = match self.store.get(id) {
            Ok(Some(sample)) => sample,
            Ok(None) => return self.fail(AppError::NotFound(id.clone())),
            Err(err) => return self.fail(err.into()),
        };
        self.open_on_map(&sample.fields.latitud, &sample.fields.longitud)
    }

    fn fail<T>(&self, err: AppError) -> AppResult<T> {
        warn!(
            "event=app_action module=app status=error error_code={} error={}",
            err.code(),
            err
        );
        self.ui.notify(&err.user_message());
        Err(err)
    }
}
