//! Location × year collection loop.

use anyhow::{Result, ensure};
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{Instrument, error, info, warn};

use crate::config::Location;
use crate::crosswalk::CrosswalkTable;
use crate::services::{IndicatorSource, TractResolver};
use crate::stats::IndicatorRecord;
use crate::tract::TractReference;

pub const FIRST_YEAR: u16 = 2010;
pub const LAST_YEAR: u16 = 2023;

/// Last survey year published on 2010-vintage tract boundaries.
pub const LAST_2010_VINTAGE_YEAR: u16 = 2019;

pub const REQUEST_DELAY: Duration = Duration::from_millis(300);

/// Validates a requested survey year window against the supported span.
pub fn year_range(start: u16, end: u16) -> Result<RangeInclusive<u16>> {
    ensure!(
        (FIRST_YEAR..=LAST_YEAR).contains(&start) && (FIRST_YEAR..=LAST_YEAR).contains(&end),
        "years must lie within {FIRST_YEAR}-{LAST_YEAR}, got {start}-{end}"
    );
    ensure!(start <= end, "start year {start} is after end year {end}");
    Ok(start..=end)
}

/// Picks the tract a location is queried with for `year`.
///
/// The 2010-vintage tract applies only to crosswalk locations, only for years
/// up to 2019, and only when the crosswalk produced one.
pub fn select_tract<'a>(
    needs_crosswalk: bool,
    year: u16,
    tract_2020: &'a TractReference,
    tract_2010: Option<&'a TractReference>,
) -> &'a TractReference {
    match tract_2010 {
        Some(previous) if needs_crosswalk && year <= LAST_2010_VINTAGE_YEAR => previous,
        _ => tract_2020,
    }
}

/// Drives geocoding, crosswalk lookup and per-year fetches for each location
/// in order. Every failure is local to its location or year.
pub struct Pipeline<'a, R, S> {
    resolver: &'a R,
    source: &'a S,
    crosswalk: &'a CrosswalkTable,
    years: RangeInclusive<u16>,
    request_delay: Duration,
}

impl<'a, R: TractResolver, S: IndicatorSource> Pipeline<'a, R, S> {
    pub fn new(resolver: &'a R, source: &'a S, crosswalk: &'a CrosswalkTable) -> Self {
        Self {
            resolver,
            source,
            crosswalk,
            years: FIRST_YEAR..=LAST_YEAR,
            request_delay: REQUEST_DELAY,
        }
    }

    pub fn with_years(mut self, years: RangeInclusive<u16>) -> Self {
        self.years = years;
        self
    }

    /// Pause after every survey request.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Collects one record per (location, year) the survey answered, in
    /// location order then ascending year.
    #[tracing::instrument(skip_all, fields(locations = locations.len()))]
    pub async fn run(&self, locations: &[Location]) -> Vec<IndicatorRecord> {
        let mut results = Vec::new();

        for location in locations {
            let span = tracing::info_span!("location", city = %location.name);
            self.collect_location(location, &mut results)
                .instrument(span)
                .await;
        }

        info!(records = results.len(), "Collection finished");
        results
    }

    async fn collect_location(&self, location: &Location, results: &mut Vec<IndicatorRecord>) {
        info!(address = %location.address, "Processing location");

        let Some(tract_2020) = self.resolver.resolve(&location.address).await else {
            error!("Could not find tract for location, skipping");
            return;
        };
        info!(geoid_2020 = %tract_2020.geoid, "2020 tract resolved");

        let tract_2010 = if location.needs_crosswalk {
            match self.crosswalk.lookup_2010(&tract_2020.geoid) {
                Some(geoid) => {
                    info!(geoid_2010 = geoid, "2010 tract resolved via crosswalk");
                    Some(tract_2020.with_geoid(geoid))
                }
                None => {
                    warn!(
                        geoid_2020 = %tract_2020.geoid,
                        "No 2010 tract found in crosswalk, using 2020 tract for all years"
                    );
                    None
                }
            }
        } else {
            None
        };

        for year in self.years.clone() {
            let tract = select_tract(
                location.needs_crosswalk,
                year,
                &tract_2020,
                tract_2010.as_ref(),
            );

            let fetched = self
                .source
                .fetch(year, &tract.state_fips, &tract.county_fips, &tract.tract_code)
                .await;

            if let Some(record) = fetched {
                info!(
                    year,
                    tract = %tract.geoid,
                    median_rent = ?record.median_rent,
                    median_household_income = ?record.median_household_income,
                    "Indicators collected"
                );
                results.push(record.with_location(&location.name, &tract.geoid));
            }

            tokio::time::sleep(self.request_delay).await;
        }
    }
}
