//! Census geocoder client: one-line address → 2020 census tract.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::parser::{GeocodeMatch, parse_geocoder_response};
use crate::services::TractResolver;
use crate::tract::TractReference;

pub const GEOCODER_URL: &str =
    "https://geocoding.geo.census.gov/geocoder/geographies/onelineaddress";

/// Current address ranges with current (2020) tract geographies.
const BENCHMARK: &str = "Public_AR_Current";
const VINTAGE: &str = "Current_Current";

pub const MAX_ATTEMPTS: u32 = 3;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Result of a single geocoder request.
enum Attempt {
    Found(TractReference),
    /// The service answered and matched nothing. Not retried.
    NoMatch,
    /// Transport failure or unexpected response shape.
    Retry(anyhow::Error),
}

pub struct Geocoder<C> {
    client: C,
    base_url: Url,
    max_attempts: u32,
    backoff: Duration,
}

impl Geocoder<BasicClient> {
    /// Client for the public Census geocoder with a 15 second request timeout.
    pub fn census() -> Result<Self> {
        Ok(Self::new(
            BasicClient::with_timeout(REQUEST_TIMEOUT)?,
            Url::parse(GEOCODER_URL)?,
        ))
    }
}

impl<C: HttpClient> Geocoder<C> {
    pub fn new(client: C, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            max_attempts: MAX_ATTEMPTS,
            backoff: RETRY_BACKOFF,
        }
    }

    /// Pause between failed attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn request_url(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("benchmark", BENCHMARK)
            .append_pair("vintage", VINTAGE)
            .append_pair("format", "json");
        url
    }

    async fn attempt(&self, address: &str) -> Attempt {
        let body = match fetch_json(&self.client, self.request_url(address)).await {
            Ok(body) => body,
            Err(e) => return Attempt::Retry(e),
        };

        match parse_geocoder_response(&body) {
            Ok(GeocodeMatch::Tract(tract)) => Attempt::Found(tract),
            Ok(GeocodeMatch::NoMatch) => Attempt::NoMatch,
            Err(e) => Attempt::Retry(e),
        }
    }
}

#[async_trait]
impl<C: HttpClient> TractResolver for Geocoder<C> {
    #[tracing::instrument(skip(self))]
    async fn resolve(&self, address: &str) -> Option<TractReference> {
        for attempt in 1..=self.max_attempts {
            match self.attempt(address).await {
                Attempt::Found(tract) => {
                    debug!(attempt, geoid = %tract.geoid, "Address geocoded");
                    return Some(tract);
                }
                Attempt::NoMatch => {
                    warn!("No geocoder match for address");
                    return None;
                }
                Attempt::Retry(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Geocoder attempt failed"
                    );
                }
            }

            if attempt < self.max_attempts {
                info!(backoff_secs = self.backoff.as_secs_f64(), "Retrying geocoder request");
                tokio::time::sleep(self.backoff).await;
            }
        }

        error!(attempts = self.max_attempts, "Geocoder retries exhausted");
        None
    }
}
