//! Per-tract, per-year indicator rows and the value rules applied to them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MEDIAN_RENT: &str = "B25064_001E";
pub const MEDIAN_HOME_VALUE: &str = "B25077_001E";
pub const TOTAL_HOUSING_UNITS: &str = "B25001_001E";
pub const MEDIAN_HOUSEHOLD_INCOME: &str = "B19013_001E";
pub const RENTER_OCCUPIED_UNITS: &str = "B25003_003E";
pub const BELOW_POVERTY: &str = "B17001_002E";
pub const POP_25_OVER: &str = "B15003_001E";
pub const BACHELORS: &str = "B15003_022E";
pub const MASTERS: &str = "B15003_023E";
pub const PROFESSIONAL: &str = "B15003_024E";
pub const DOCTORATE: &str = "B15003_025E";
pub const UNEMPLOYED: &str = "B23025_005E";
pub const IN_LABOR_FORCE: &str = "B23025_003E";

/// Survey product every record is drawn from.
pub const SOURCE: &str = "acs5";

/// ACS5 variables requested for every tract and year, in request order.
pub const VARIABLES: [&str; 13] = [
    MEDIAN_RENT,
    MEDIAN_HOME_VALUE,
    TOTAL_HOUSING_UNITS,
    MEDIAN_HOUSEHOLD_INCOME,
    RENTER_OCCUPIED_UNITS,
    BELOW_POVERTY,
    POP_25_OVER,
    BACHELORS,
    MASTERS,
    PROFESSIONAL,
    DOCTORATE,
    UNEMPLOYED,
    IN_LABOR_FORCE,
];

/// One exported row: a location's tract indicators for a single survey year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub city: String,
    pub year: u16,
    pub tract_geoid: String,
    pub source: String,

    // housing
    pub median_rent: Option<u64>,
    pub median_home_value: Option<u64>,
    pub total_housing_units: Option<u64>,
    pub median_household_income: Option<u64>,
    pub renter_occupied_units: Option<u64>,

    // economics
    pub below_poverty: Option<u64>,
    pub pop_25_over: Option<u64>,
    pub college_degree_or_higher: Option<u64>,
    pub unemployed: Option<u64>,
    pub in_labor_force: Option<u64>,

    // derived by `with_derived`
    pub renter_pct: Option<f64>,
    pub college_degree_pct: Option<f64>,
    pub unemployment_rate: Option<f64>,
}

impl IndicatorRecord {
    /// Builds a record from one ACS response row keyed by variable name.
    ///
    /// The four degree counts are summed with absent components taken as zero,
    /// so `college_degree_or_higher` is always present. Every other field stays
    /// absent when its cleaned value is.
    pub fn from_row(year: u16, row: &Map<String, Value>) -> Self {
        let get = |name: &str| row.get(name).and_then(clean_value);

        let college: u64 = [BACHELORS, MASTERS, PROFESSIONAL, DOCTORATE]
            .into_iter()
            .map(|name| get(name).unwrap_or(0))
            .sum();

        IndicatorRecord {
            year,
            source: SOURCE.to_string(),
            median_rent: get(MEDIAN_RENT),
            median_home_value: get(MEDIAN_HOME_VALUE),
            total_housing_units: get(TOTAL_HOUSING_UNITS),
            median_household_income: get(MEDIAN_HOUSEHOLD_INCOME),
            renter_occupied_units: get(RENTER_OCCUPIED_UNITS),
            below_poverty: get(BELOW_POVERTY),
            pop_25_over: get(POP_25_OVER),
            college_degree_or_higher: Some(college),
            unemployed: get(UNEMPLOYED),
            in_labor_force: get(IN_LABOR_FORCE),
            ..Default::default()
        }
    }

    /// Set location metadata (name and the GEOID the row was fetched for)
    pub fn with_location(mut self, city: &str, tract_geoid: &str) -> Self {
        self.city = city.to_string();
        self.tract_geoid = tract_geoid.to_string();
        self
    }

    /// Fills the three percentage fields from the raw counts.
    pub fn with_derived(mut self) -> Self {
        self.renter_pct = pct(self.renter_occupied_units, self.total_housing_units);
        self.college_degree_pct = pct(self.college_degree_or_higher, self.pop_25_over);
        self.unemployment_rate = pct(self.unemployed, self.in_labor_force);
        self
    }
}

/// Normalizes a raw survey value: non-negative integers pass through, and
/// everything else (negative sentinels such as `-666666666`, text, null)
/// becomes `None`.
pub fn clean_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => clean_str(s),
        Value::Number(n) => match n.as_i64() {
            Some(i) => u64::try_from(i).ok(),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64),
        },
        _ => None,
    }
}

pub fn clean_str(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|i| u64::try_from(i).ok())
}

/// `part / total * 100` rounded to one decimal, or `None` when either side is
/// absent or `total` is zero.
///
/// Rounding is applied to the exact binary value of the ratio, so a ratio
/// stored as exactly `6.25` rounds to the even digit, `6.2`.
pub fn pct(part: Option<u64>, total: Option<u64>) -> Option<f64> {
    let total = total.filter(|t| *t > 0)?;
    let ratio = part? as f64 / total as f64 * 100.0;
    format!("{ratio:.1}").parse().ok()
}
