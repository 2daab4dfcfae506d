use crate::analyzers::types::{FieldMissing, LocationCount, Summary, YearSpan};
use crate::stats::IndicatorRecord;
use chrono::Utc;
use std::collections::BTreeMap;

/// Summarizes a collection of (possibly derived) records.
pub fn summarize(records: &[IndicatorRecord]) -> Summary {
    let year_span = records
        .iter()
        .map(|r| r.year)
        .min()
        .zip(records.iter().map(|r| r.year).max())
        .map(|(first, last)| YearSpan { first, last });

    macro_rules! missing {
        ($($field:ident),* $(,)?) => {
            vec![$(FieldMissing {
                field: stringify!($field).to_string(),
                missing: records.iter().filter(|r| r.$field.is_none()).count(),
            }),*]
        };
    }

    let missing_values = missing!(
        median_rent,
        median_home_value,
        total_housing_units,
        median_household_income,
        renter_occupied_units,
        below_poverty,
        pop_25_over,
        college_degree_or_higher,
        unemployed,
        in_labor_force,
        renter_pct,
        college_degree_pct,
        unemployment_rate,
    );

    let mut per_city: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *per_city.entry(record.city.as_str()).or_default() += 1;
    }

    let mut records_per_location: Vec<LocationCount> = per_city
        .iter()
        .map(|(city, count)| LocationCount {
            city: city.to_string(),
            records: *count,
        })
        .collect();
    records_per_location.sort_by(|a, b| b.records.cmp(&a.records).then(a.city.cmp(&b.city)));

    Summary {
        generated_at: Utc::now(),
        total_records: records.len(),
        location_count: per_city.len(),
        year_span,
        missing_values,
        records_per_location,
    }
}
