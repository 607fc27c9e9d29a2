//! In-place row edit sessions.
//!
//! # Responsibility
//! - Track which rows are in edit mode and hold their draft input values.
//! - Validate and commit drafts through the sample store.
//!
//! # Invariants
//! - Sessions are keyed by sample id, never by row position.
//! - Several rows may be editing at once; each has its own draft.
//! - A failed commit keeps the session and leaves storage untouched.

use crate::model::sample::{SampleField, SampleFields, SampleId, SampleValidationError};
use crate::repo::local_storage::LocalStorage;
use crate::service::sample_store::{SampleStore, StoreError};
use log::{debug, info};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display state of one table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    Viewing,
    Editing,
}

/// Errors from edit session operations.
#[derive(Debug)]
pub enum EditError {
    /// Target sample does not exist in the store.
    SampleNotFound(SampleId),
    /// Target row has no open edit session.
    NotEditing(SampleId),
    /// Draft has an empty field.
    Validation(SampleValidationError),
    /// Store-level failure.
    Store(StoreError),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SampleNotFound(id) => write!(f, "sample not found: {id}"),
            Self::NotEditing(id) => write!(f, "sample is not being edited: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EditError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// Draft state of one row in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub sample_id: SampleId,
    pub draft: SampleFields,
}

/// Edit sessions of the current table, keyed by sample id.
#[derive(Debug, Default)]
pub struct EditSessions {
    sessions: HashMap<SampleId, EditSession>,
}

impl EditSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a row into edit mode with inputs pre-filled from storage.
    ///
    /// Calling this on a row already editing discards its draft.
    pub fn begin_edit<S: LocalStorage>(
        &mut self,
        store: &SampleStore<S>,
        id: &SampleId,
    ) -> Result<&EditSession, EditError> {
        let sample = store
            .get(id)?
            .ok_or_else(|| EditError::SampleNotFound(id.clone()))?;

        debug!("event=edit_begin module=edit status=ok sample_id={id}");
        let session = EditSession {
            sample_id: sample.id,
            draft: sample.fields,
        };
        self.sessions.insert(id.clone(), session);
        self.sessions
            .get(id)
            .ok_or_else(|| EditError::NotEditing(id.clone()))
    }

    /// Replaces one draft input value.
    pub fn set_field(
        &mut self,
        id: &SampleId,
        field: SampleField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| EditError::NotEditing(id.clone()))?;
        session.draft.set(field, value);
        Ok(())
    }

    /// Replaces the whole draft of one row.
    pub fn set_draft(&mut self, id: &SampleId, draft: SampleFields) -> Result<(), EditError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| EditError::NotEditing(id.clone()))?;
        session.draft = draft;
        Ok(())
    }

    /// Validates the draft and writes it through the store.
    ///
    /// On success the session is closed. The caller is expected to redraw
    /// the table, which returns every other row to viewing as well.
    ///
    /// # Errors
    /// - `EditError::Validation` keeps the session open; nothing is written.
    /// - `EditError::SampleNotFound` when the sample vanished meanwhile; the
    ///   stale session is closed.
    pub fn commit_edit<S: LocalStorage>(
        &mut self,
        store: &SampleStore<S>,
        id: &SampleId,
    ) -> Result<(), EditError> {
        let session = self
            .sessions
            .get(id)
            .ok_or_else(|| EditError::NotEditing(id.clone()))?;

        if let Err(err) = session.draft.validate() {
            debug!("event=edit_commit module=edit status=rejected sample_id={id} error={err}");
            return Err(EditError::Validation(err));
        }

        let updated = store.update(id, session.draft.clone())?;
        self.sessions.remove(id);
        if !updated {
            return Err(EditError::SampleNotFound(id.clone()));
        }

        info!("event=edit_commit module=edit status=ok sample_id={id}");
        Ok(())
    }

    /// Returns every row to viewing mode.
    pub fn reset(&mut self) {
        self.sessions.clear();
    }

    pub fn session(&self, id: &SampleId) -> Option<&EditSession> {
        self.sessions.get(id)
    }

    pub fn mode(&self, id: &SampleId) -> RowMode {
        if self.sessions.contains_key(id) {
            RowMode::Editing
        } else {
            RowMode::Viewing
        }
    }

    /// Number of rows currently editing.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{EditError, EditSessions, RowMode};
    use crate::model::sample::{SampleField, SampleFields, SampleId};
    use crate::repo::local_storage::MemoryLocalStorage;
    use crate::service::sample_store::SampleStore;

    fn fields(numero: &str) -> SampleFields {
        SampleFields {
            numero_muestra: numero.to_string(),
            localidad: "Loc".to_string(),
            pais: "Pais".to_string(),
            latitud: "1".to_string(),
            longitud: "2".to_string(),
            mineralogia: "Min".to_string(),
            paleontologia: "Pal".to_string(),
        }
    }

    #[test]
    fn begin_edit_prefills_draft_from_store() {
        let store = SampleStore::new(MemoryLocalStorage::new());
        let sample = store.add(fields("S1")).unwrap();
        let mut sessions = EditSessions::new();

        let session = sessions.begin_edit(&store, &sample.id).unwrap();
        assert_eq!(session.draft, sample.fields);
        assert_eq!(sessions.mode(&sample.id), RowMode::Editing);
    }

    #[test]
    fn begin_edit_on_unknown_id_fails() {
        let store = SampleStore::new(MemoryLocalStorage::new());
        let mut sessions = EditSessions::new();

        let err = sessions
            .begin_edit(&store, &SampleId::from("missing"))
            .unwrap_err();
        assert!(matches!(err, EditError::SampleNotFound(_)));
        assert!(sessions.is_empty());
    }

    #[test]
    fn set_field_requires_open_session() {
        let mut sessions = EditSessions::new();
        let err = sessions
            .set_field(&SampleId::from("x"), SampleField::Pais, "Chile")
            .unwrap_err();
        assert!(matches!(err, EditError::NotEditing(_)));
    }

    #[test]
    fn several_rows_can_edit_at_once() {
        let store = SampleStore::new(MemoryLocalStorage::new());
        let first = store.add(fields("S1")).unwrap();
        let second = store.add(fields("S2")).unwrap();
        let mut sessions = EditSessions::new();

        sessions.begin_edit(&store, &first.id).unwrap();
        sessions.begin_edit(&store, &second.id).unwrap();
        assert_eq!(sessions.len(), 2);

        sessions.reset();
        assert_eq!(sessions.mode(&first.id), RowMode::Viewing);
        assert_eq!(sessions.mode(&second.id), RowMode::Viewing);
    }

    #[test]
    fn commit_of_removed_sample_closes_session() {
        let store = SampleStore::new(MemoryLocalStorage::new());
        let sample = store.add(fields("S1")).unwrap();
        let mut sessions = EditSessions::new();
        sessions.begin_edit(&store, &sample.id).unwrap();
        store.remove(&sample.id).unwrap();

        let err = sessions.commit_edit(&store, &sample.id).unwrap_err();
        assert!(matches!(err, EditError::SampleNotFound(_)));
        assert_eq!(sessions.mode(&sample.id), RowMode::Viewing);
    }
}
