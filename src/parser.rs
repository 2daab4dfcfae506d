//! Decoders for the geocoder and ACS JSON response shapes.

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

use crate::tract::TractReference;

/// Outcome of decoding a geocoder response that had the expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeMatch {
    Tract(TractReference),
    /// `result.addressMatches` was missing or empty.
    NoMatch,
}

/// Extracts the first match's first census tract from a geocoder response.
///
/// A missing `result` or `addressMatches` is treated like an empty match list.
///
/// # Errors
///
/// Returns an error when the body is not a JSON object or when the first
/// match lacks `geographies."Census Tracts"[0]` with `GEOID`, `STATE` and
/// `COUNTY`.
pub fn parse_geocoder_response(value: &Value) -> Result<GeocodeMatch> {
    if !value.is_object() {
        return Err(anyhow!("geocoder response is not a JSON object"));
    }

    let first = match value
        .get("result")
        .and_then(|r| r.get("addressMatches"))
        .and_then(Value::as_array)
        .and_then(|m| m.first())
    {
        Some(first) => first,
        None => return Ok(GeocodeMatch::NoMatch),
    };

    let tract = first
        .get("geographies")
        .and_then(|g| g.get("Census Tracts"))
        .and_then(|t| t.get(0))
        .context("match has no census tract geography")?;

    let field = |name: &str| {
        tract
            .get(name)
            .and_then(Value::as_str)
            .with_context(|| format!("census tract is missing {name}"))
    };

    Ok(GeocodeMatch::Tract(TractReference::new(
        field("GEOID")?,
        field("STATE")?,
        field("COUNTY")?,
    )))
}

/// Zips an ACS table response (header row followed by data rows) into one
/// name-to-value map per data row.
///
/// `null` and an array holding only the header both yield no rows.
pub fn parse_acs_rows(value: &Value) -> Result<Vec<Map<String, Value>>> {
    let table = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(rows) => rows,
        other => return Err(anyhow!("expected a JSON array, got {other}")),
    };

    let Some((header, rows)) = table.split_first() else {
        return Ok(Vec::new());
    };
    let header = header
        .as_array()
        .context("ACS header row is not an array")?
        .iter()
        .map(|h| h.as_str().map(str::to_string).context("ACS header is not a string"))
        .collect::<Result<Vec<_>>>()?;

    rows.iter()
        .map(|row| -> Result<Map<String, Value>> {
            let cells = row.as_array().context("ACS data row is not an array")?;
            Ok(header.iter().cloned().zip(cells.iter().cloned()).collect())
        })
        .collect()
}
