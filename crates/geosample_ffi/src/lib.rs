//! Flutter-facing bindings for the geological sample manager.

pub mod api;
