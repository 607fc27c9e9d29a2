//! Stateless export and external link helpers.
//!
//! # Responsibility
//! - Serialize the sample collection to the CSV download format.
//! - Build and open external map-search URLs for sample coordinates.

pub mod csv;
pub mod map_link;
