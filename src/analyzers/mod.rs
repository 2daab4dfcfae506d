//! Post-processing of collected rows.
//!
//! Fills the derived percentage fields and condenses the collection into a
//! [`types::Summary`]: record and location counts, the year span, missing
//! values per field and records per location.

pub mod derive;
pub mod summary;
pub mod types;
