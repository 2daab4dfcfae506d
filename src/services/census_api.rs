//! Traits for the two Census services the pipeline depends on.

use crate::stats::IndicatorRecord;
use crate::tract::TractReference;

/// Places a free-text address in a current-vintage (2020) census tract.
#[async_trait::async_trait]
pub trait TractResolver: Send + Sync {
    /// Returns `None` when the address cannot be resolved. Implementations
    /// handle their own retries and never surface transport errors.
    async fn resolve(&self, address: &str) -> Option<TractReference>;
}

/// Source of survey indicators for a single tract and year.
#[async_trait::async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Returns `None` when the survey has no row for the tract or the query
    /// failed. The record carries raw values only; location metadata and
    /// derived ratios are filled in by the caller.
    async fn fetch(
        &self,
        year: u16,
        state_fips: &str,
        county_fips: &str,
        tract_code: &str,
    ) -> Option<IndicatorRecord>;
}
