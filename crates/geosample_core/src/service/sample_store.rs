//! Sample store use-case service.
//!
//! # Responsibility
//! - Own the authoritative sample collection persisted under one storage key.
//! - Provide list/save/add/update/remove/clear with write-through semantics.
//!
//! # Invariants
//! - Collection order is insertion order; updates replace in place.
//! - Ids are unique within the collection; `add` never reuses one.
//! - Rejected writes (validation failures) never touch storage.
//! - Undecodable stored data surfaces as `StoreError::CorruptStorage` and is
//!   never silently replaced by an empty collection.

use crate::model::sample::{mint_sample_id, Sample, SampleFields, SampleId, SampleValidationError};
use crate::repo::local_storage::{LocalStorage, RepoError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the JSON array of samples.
pub const SAMPLES_STORAGE_KEY: &str = "muestrasGeologicas";

pub type StoreResult<T> = Result<T, StoreError>;

/// Sample store error.
#[derive(Debug)]
pub enum StoreError {
    /// A descriptive field was empty on create or update.
    Validation(SampleValidationError),
    /// Stored value is not a JSON array of samples.
    CorruptStorage(String),
    /// Collection could not be encoded.
    Encode(serde_json::Error),
    /// Storage transport failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CorruptStorage(details) => {
                write!(f, "stored sample collection is corrupt: {details}")
            }
            Self::Encode(err) => write!(f, "failed to encode sample collection: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::CorruptStorage(_) => None,
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<SampleValidationError> for StoreError {
    fn from(value: SampleValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Storage-backed sample collection.
pub struct SampleStore<S: LocalStorage> {
    storage: S,
}

impl<S: LocalStorage> SampleStore<S> {
    /// Creates a store writing through the given storage.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Underlying storage, mainly for inspection in tests.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the full collection in insertion order.
    ///
    /// An absent key lists as empty.
    pub fn list(&self) -> StoreResult<Vec<Sample>> {
        let Some(raw) = self.storage.get_item(SAMPLES_STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Sample>>(&raw) {
            Ok(samples) => {
                debug!(
                    "event=sample_list module=store status=ok count={}",
                    samples.len()
                );
                Ok(samples)
            }
            Err(err) => {
                warn!(
                    "event=sample_list module=store status=error error_code=corrupt_storage bytes={}",
                    raw.len()
                );
                Err(StoreError::CorruptStorage(err.to_string()))
            }
        }
    }

    /// Gets one sample by id.
    pub fn get(&self, id: &SampleId) -> StoreResult<Option<Sample>> {
        Ok(self.list()?.into_iter().find(|sample| &sample.id == id))
    }

    /// Overwrites the persisted collection with `samples`.
    pub fn save(&self, samples: &[Sample]) -> StoreResult<()> {
        let encoded = serde_json::to_string(samples).map_err(StoreError::Encode)?;
        self.storage.set_item(SAMPLES_STORAGE_KEY, &encoded)?;
        Ok(())
    }

    /// Appends a new sample with a freshly minted id.
    ///
    /// # Errors
    /// - `StoreError::Validation` when any field is empty; nothing is written.
    pub fn add(&self, fields: SampleFields) -> StoreResult<Sample> {
        fields.validate()?;

        let mut samples = self.list()?;
        let id = {
            let existing: HashSet<&str> = samples.iter().map(|sample| sample.id.as_str()).collect();
            mint_sample_id(&existing)
        };
        let sample = Sample::with_id(id, fields);
        samples.push(sample.clone());
        self.save(&samples)?;

        info!(
            "event=sample_add module=store status=ok sample_id={} count={}",
            sample.id,
            samples.len()
        );
        Ok(sample)
    }

    /// Replaces every descriptive field of one sample, keeping its id and
    /// position.
    ///
    /// Returns `false` without writing when `id` is unknown.
    ///
    /// # Errors
    /// - `StoreError::Validation` when any field is empty; nothing is written.
    pub fn update(&self, id: &SampleId, fields: SampleFields) -> StoreResult<bool> {
        fields.validate()?;

        let mut samples = self.list()?;
        let Some(target) = samples.iter_mut().find(|sample| &sample.id == id) else {
            info!("event=sample_update module=store status=not_found sample_id={id}");
            return Ok(false);
        };
        target.fields = fields;
        self.save(&samples)?;

        info!("event=sample_update module=store status=ok sample_id={id}");
        Ok(true)
    }

    /// Deletes one sample.
    ///
    /// Returns `false` without writing when `id` is unknown.
    pub fn remove(&self, id: &SampleId) -> StoreResult<bool> {
        let mut samples = self.list()?;
        let before = samples.len();
        samples.retain(|sample| &sample.id != id);
        if samples.len() == before {
            info!("event=sample_remove module=store status=not_found sample_id={id}");
            return Ok(false);
        }
        self.save(&samples)?;

        info!(
            "event=sample_remove module=store status=ok sample_id={id} count={}",
            samples.len()
        );
        Ok(true)
    }

    /// Removes every sample by dropping the storage key.
    pub fn clear(&self) -> StoreResult<()> {
        self.storage.remove_item(SAMPLES_STORAGE_KEY)?;
        info!("event=sample_clear module=store status=ok");
        Ok(())
    }
}
