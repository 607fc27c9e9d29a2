//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value storage contract the sample store writes through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs never interpret stored values.

pub mod local_storage;
