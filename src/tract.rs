/// A census tract as addressed by the ACS API: the full GEOID plus the
/// state, county and 6-digit tract components used in queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TractReference {
    pub geoid: String,
    pub state_fips: String,
    pub county_fips: String,
    pub tract_code: String,
}

impl TractReference {
    pub fn new(geoid: &str, state_fips: &str, county_fips: &str) -> Self {
        Self {
            geoid: geoid.to_string(),
            state_fips: state_fips.to_string(),
            county_fips: county_fips.to_string(),
            tract_code: tract_code(geoid).to_string(),
        }
    }

    /// The same state and county under a different tract GEOID, as produced by
    /// a vintage crosswalk.
    pub fn with_geoid(&self, geoid: &str) -> Self {
        Self::new(geoid, &self.state_fips, &self.county_fips)
    }
}

/// Last six characters of a GEOID, or the whole string if it is shorter.
pub fn tract_code(geoid: &str) -> &str {
    let start = geoid
        .char_indices()
        .rev()
        .nth(5)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &geoid[start..]
}
