//! Data types produced by the summary step.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// First and last survey year present in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSpan {
    pub first: u16,
    pub last: u16,
}

/// Number of rows with no value for one exported field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMissing {
    pub field: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCount {
    pub city: String,
    pub records: usize,
}

/// Overview of a collection run, logged at the end and optionally written as JSON.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub location_count: usize,
    pub year_span: Option<YearSpan>,
    pub missing_values: Vec<FieldMissing>,
    /// Sorted by record count, highest first.
    pub records_per_location: Vec<LocationCount>,
}
