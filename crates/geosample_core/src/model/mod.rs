//! Geological sample domain model.
//!
//! # Responsibility
//! - Define the canonical sample record shared by store, table and export.
//! - Define the fixed descriptive column set and its validation rules.
//!
//! # Invariants
//! - Every sample is identified by an opaque `SampleId` that is never reused.
//! - Column order is fixed and shared by every projection.

pub mod sample;
