//! ACS 5-year estimates client.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};

use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::parser::parse_acs_rows;
use crate::services::IndicatorSource;
use crate::stats::{IndicatorRecord, VARIABLES};

pub const ACS_BASE_URL: &str = "https://api.census.gov/data";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Queries `/{year}/acs/acs5` for the fixed variable set of one tract.
///
/// There is no retry at this layer: any failure is logged and reported as
/// "no data" for that tract and year.
pub struct AcsClient<C> {
    client: C,
    base_url: String,
}

impl AcsClient<UrlParam<BasicClient>> {
    /// Client for the public Census data API authenticated with `api_key`.
    pub fn census(api_key: String) -> Result<Self> {
        let client = UrlParam::census(BasicClient::with_timeout(REQUEST_TIMEOUT)?, api_key);
        Ok(Self::new(client, ACS_BASE_URL))
    }
}

impl<C: HttpClient> AcsClient<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_url(
        &self,
        year: u16,
        state_fips: &str,
        county_fips: &str,
        tract_code: &str,
    ) -> Result<Url> {
        let url = Url::parse_with_params(
            &format!("{}/{}/acs/acs5", self.base_url, year),
            &[
                ("get", VARIABLES.join(",")),
                ("for", format!("tract:{tract_code}")),
                ("in", format!("state:{state_fips} county:{county_fips}")),
            ],
        )?;
        Ok(url)
    }

    async fn query(
        &self,
        year: u16,
        state_fips: &str,
        county_fips: &str,
        tract_code: &str,
    ) -> Result<Option<IndicatorRecord>> {
        let url = self.request_url(year, state_fips, county_fips, tract_code)?;
        let body = fetch_json(&self.client, url).await?;
        let rows = parse_acs_rows(&body)?;

        Ok(rows.first().map(|row| IndicatorRecord::from_row(year, row)))
    }
}

#[async_trait]
impl<C: HttpClient> IndicatorSource for AcsClient<C> {
    #[tracing::instrument(skip(self))]
    async fn fetch(
        &self,
        year: u16,
        state_fips: &str,
        county_fips: &str,
        tract_code: &str,
    ) -> Option<IndicatorRecord> {
        match self.query(year, state_fips, county_fips, tract_code).await {
            Ok(Some(record)) => {
                debug!("ACS5 row received");
                Some(record)
            }
            Ok(None) => {
                warn!("No ACS5 data returned");
                None
            }
            Err(e) => {
                warn!(error = %e, "ACS5 fetch failed");
                None
            }
        }
    }
}
