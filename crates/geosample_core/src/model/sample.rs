//! Sample domain model.
//!
//! # Responsibility
//! - Define the persisted sample record and its seven descriptive fields.
//! - Mint collision-free identifiers for new samples.
//!
//! # Invariants
//! - `id` is immutable once minted and unique within one collection.
//! - Descriptive fields are non-empty at write time. Stored data is not
//!   re-validated on read.
//! - JSON keys use the camelCase layout (`numeroMuestra`, ...).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque sample identifier.
///
/// Older stored data carries ids of arbitrary shape, so this is a plain
/// string wrapper rather than a parsed UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(String);

impl SampleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for SampleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SampleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SampleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Descriptive sample column, in fixed display/export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleField {
    NumeroMuestra,
    Localidad,
    Pais,
    Latitud,
    Longitud,
    Mineralogia,
    Paleontologia,
}

impl SampleField {
    /// All descriptive columns in display order.
    pub const ALL: [SampleField; 7] = [
        Self::NumeroMuestra,
        Self::Localidad,
        Self::Pais,
        Self::Latitud,
        Self::Longitud,
        Self::Mineralogia,
        Self::Paleontologia,
    ];

    /// Stable key used in persisted JSON and edit input ids.
    pub fn key(self) -> &'static str {
        match self {
            Self::NumeroMuestra => "numeroMuestra",
            Self::Localidad => "localidad",
            Self::Pais => "pais",
            Self::Latitud => "latitud",
            Self::Longitud => "longitud",
            Self::Mineralogia => "mineralogia",
            Self::Paleontologia => "paleontologia",
        }
    }

    /// User-facing column label.
    pub fn label(self) -> &'static str {
        match self {
            Self::NumeroMuestra => "Número de muestra",
            Self::Localidad => "Localidad",
            Self::Pais => "País",
            Self::Latitud => "Latitud",
            Self::Longitud => "Longitud",
            Self::Mineralogia => "Mineralogía",
            Self::Paleontologia => "Paleontología",
        }
    }

    /// Parses a column from its stable key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl Display for SampleField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Validation errors for descriptive sample fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleValidationError {
    /// First empty field in column order.
    EmptyField(SampleField),
}

impl Display for SampleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
        }
    }
}

impl Error for SampleValidationError {}

/// The seven descriptive fields of a sample, without identity.
///
/// Used as the creation form payload and as the edit draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleFields {
    pub numero_muestra: String,
    pub localidad: String,
    pub pais: String,
    pub latitud: String,
    pub longitud: String,
    pub mineralogia: String,
    pub paleontologia: String,
}

impl SampleFields {
    /// Returns one field value.
    pub fn get(&self, field: SampleField) -> &str {
        match field {
            SampleField::NumeroMuestra => &self.numero_muestra,
            SampleField::Localidad => &self.localidad,
            SampleField::Pais => &self.pais,
            SampleField::Latitud => &self.latitud,
            SampleField::Longitud => &self.longitud,
            SampleField::Mineralogia => &self.mineralogia,
            SampleField::Paleontologia => &self.paleontologia,
        }
    }

    /// Replaces one field value.
    pub fn set(&mut self, field: SampleField, value: impl Into<String>) {
        let slot = match field {
            SampleField::NumeroMuestra => &mut self.numero_muestra,
            SampleField::Localidad => &mut self.localidad,
            SampleField::Pais => &mut self.pais,
            SampleField::Latitud => &mut self.latitud,
            SampleField::Longitud => &mut self.longitud,
            SampleField::Mineralogia => &mut self.mineralogia,
            SampleField::Paleontologia => &mut self.paleontologia,
        };
        *slot = value.into();
    }

    /// Checks the non-empty rule for all seven fields.
    ///
    /// Whitespace-only values count as present.
    ///
    /// # Errors
    /// - Returns the first empty field in column order.
    pub fn validate(&self) -> Result<(), SampleValidationError> {
        match SampleField::ALL
            .into_iter()
            .find(|field| self.get(*field).is_empty())
        {
            Some(field) => Err(SampleValidationError::EmptyField(field)),
            None => Ok(()),
        }
    }
}

/// Persisted geological sample record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub id: SampleId,
    #[serde(flatten)]
    pub fields: SampleFields,
}

impl Sample {
    /// Builds a sample from an already minted id.
    pub fn with_id(id: SampleId, fields: SampleFields) -> Self {
        Self { id, fields }
    }

    /// Shortcut for one descriptive field.
    pub fn field(&self, field: SampleField) -> &str {
        self.fields.get(field)
    }
}

/// Mints a fresh sample id that does not collide with `existing`.
///
/// Ids are UUIDv7 in simple form: a millisecond timestamp prefix followed by
/// random bits.
pub fn mint_sample_id(existing: &HashSet<&str>) -> SampleId {
    loop {
        let candidate = Uuid::now_v7().simple().to_string();
        if !existing.contains(candidate.as_str()) {
            return SampleId(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{mint_sample_id, Sample, SampleField, SampleFields, SampleValidationError};
    use std::collections::HashSet;

    fn filled() -> SampleFields {
        SampleFields {
            numero_muestra: "S1".to_string(),
            localidad: "X".to_string(),
            pais: "Y".to_string(),
            latitud: "10".to_string(),
            longitud: "20".to_string(),
            mineralogia: "Quartz".to_string(),
            paleontologia: "None".to_string(),
        }
    }

    #[test]
    fn validate_reports_first_empty_field_in_column_order() {
        let mut fields = filled();
        fields.pais.clear();
        fields.paleontologia.clear();

        let err = fields.validate().expect_err("empty fields must be rejected");
        assert_eq!(err, SampleValidationError::EmptyField(SampleField::Pais));
    }

    #[test]
    fn validate_accepts_whitespace_values() {
        let mut fields = filled();
        fields.mineralogia = " ".to_string();
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn field_keys_roundtrip() {
        for field in SampleField::ALL {
            assert_eq!(SampleField::from_key(field.key()), Some(field));
        }
        assert_eq!(SampleField::from_key("id"), None);
    }

    #[test]
    fn serializes_with_flat_camel_case_layout() {
        let sample = Sample::with_id("abc".into(), filled());
        let value = serde_json::to_value(&sample).expect("serialize sample");
        let object = value.as_object().expect("sample serializes as object");

        assert_eq!(object.len(), 8);
        assert_eq!(object["id"], "abc");
        assert_eq!(object["numeroMuestra"], "S1");
        assert_eq!(object["paleontologia"], "None");
    }

    #[test]
    fn minted_id_skips_existing_values() {
        let first = mint_sample_id(&HashSet::new());
        let existing: HashSet<&str> = [first.as_str()].into_iter().collect();
        let second = mint_sample_id(&existing);

        assert!(!first.as_str().is_empty());
        assert_ne!(first, second);
    }
}
