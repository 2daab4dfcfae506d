//! Output formatting and persistence for collected indicators.
//!
//! Supports the CSV export (and reading it back), a logged sample of rows, a
//! logged summary, and a JSON summary file.

use anyhow::{Context, Result, bail};
use csv::WriterBuilder;
use std::fmt::Display;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::Summary;
use crate::stats::IndicatorRecord;

pub const SAMPLE_ROWS: usize = 10;

/// Writes every record as a CSV row with a header, replacing any existing file.
///
/// # Errors
///
/// Fails without touching `path` when `records` is empty.
pub fn export_records(path: impl AsRef<Path>, records: &[IndicatorRecord]) -> Result<()> {
    let path = path.as_ref();
    if records.is_empty() {
        bail!("no records collected, skipping export to {}", path.display());
    }

    let file = File::create(path)
        .with_context(|| format!("failed to create export file {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = records.len(), "CSV export written");
    Ok(())
}

/// Reads a CSV previously written by [`export_records`].
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<IndicatorRecord>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open export {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: IndicatorRecord = result?;
        rows.push(record);
    }

    Ok(rows)
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Logs the first `limit` records with their headline fields.
pub fn print_sample(records: &[IndicatorRecord], limit: usize) {
    for record in records.iter().take(limit) {
        info!(
            city = %record.city,
            year = record.year,
            median_rent = %opt(record.median_rent),
            median_home_value = %opt(record.median_home_value),
            median_household_income = %opt(record.median_household_income),
            renter_pct = %opt(record.renter_pct),
            college_degree_pct = %opt(record.college_degree_pct),
            unemployment_rate = %opt(record.unemployment_rate),
            "Sample row"
        );
    }
}

/// Logs a [`Summary`]: totals first, then missing values and per-location counts.
pub fn print_summary(summary: &Summary) {
    let (first_year, last_year) = summary
        .year_span
        .map_or((None, None), |s| (Some(s.first), Some(s.last)));

    info!(
        total_records = summary.total_records,
        locations = summary.location_count,
        first_year = %opt(first_year),
        last_year = %opt(last_year),
        "Data summary"
    );

    for m in &summary.missing_values {
        info!(field = %m.field, missing = m.missing, "Missing values");
    }

    for c in &summary.records_per_location {
        info!(city = %c.city, records = c.records, "Records per location");
    }
}

/// Writes a [`Summary`] as pretty-printed JSON.
pub fn write_summary_json(path: impl AsRef<Path>, summary: &Summary) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create summary file {}", path.display()))?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
