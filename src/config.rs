use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// A neighborhood to collect indicators for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
    /// Use the 2010-vintage tract for survey years before 2020.
    #[serde(default)]
    pub needs_crosswalk: bool,
}

/// The ordered set of locations for a run.
///
/// Stored as JSON on disk:
/// ```json
/// {
///   "locations": [
///     { "name": "Boston", "address": "88 Beach Street, Boston, MA 02111", "needs_crosswalk": true },
///     { "name": "Chicago", "address": "2206 S Wentworth Ave, Chicago, IL 60616" }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct LocationConfig {
    pub locations: Vec<Location>,
}

impl LocationConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read locations file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid locations file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: LocationConfig = serde_json::from_str(content)?;
        if config.locations.is_empty() {
            anyhow::bail!("no locations configured");
        }
        Ok(config)
    }

    pub fn crosswalk_count(&self) -> usize {
        self.locations.iter().filter(|l| l.needs_crosswalk).count()
    }
}
