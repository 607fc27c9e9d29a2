//! Table presentation.
//!
//! # Responsibility
//! - Project the sample collection into a host-agnostic table view-model.
//! - Draw that view-model as plain text for terminal hosts.
//!
//! # Invariants
//! - Projection is pure and never mutates the store.
//! - Every draw is a full redraw from the current snapshot.

pub mod draw;
pub mod table;
