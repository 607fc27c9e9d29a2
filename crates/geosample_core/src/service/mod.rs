//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage, edit state and presentation into user actions.
//! - Keep UI/FFI hosts decoupled from storage details.

pub mod edit_session;
pub mod sample_app;
pub mod sample_store;
