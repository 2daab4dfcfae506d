//! HTTP plumbing shared by the geocoder and the ACS client.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use serde_json::Value;

/// Issues a GET for `url` through `client` and decodes the body as JSON.
///
/// An empty body decodes to [`Value::Null`]; the ACS API answers
/// `204 No Content` when a geography has no rows. Non-success statuses are
/// errors carrying a short preview of the body.
pub async fn fetch_json<C: HttpClient>(client: &C, url: Url) -> Result<Value> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        let preview: String = String::from_utf8_lossy(&body).chars().take(180).collect();
        return Err(anyhow!("request returned {status}: {preview}"));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&body).context("invalid JSON response")
}
