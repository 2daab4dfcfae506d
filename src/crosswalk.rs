//! 2020 → 2010 census tract relationship table.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The two columns kept from the Census tract relationship file. Every other
/// column in the file is ignored.
#[derive(Debug, Deserialize)]
struct CrosswalkEntry {
    #[serde(rename = "GEOID_TRACT_20")]
    geoid_2020: String,
    #[serde(rename = "GEOID_TRACT_10")]
    geoid_2010: String,
}

/// Maps a 2020-vintage tract GEOID to the 2010-vintage GEOID it replaced.
///
/// Loaded once from a `|`-delimited file with a header row, e.g. the Census
/// `tab20_tract20_tract10_natl.txt` relationship file:
/// ```text
/// OID_TRACT_20|GEOID_TRACT_20|...|GEOID_TRACT_10|...
/// 20790564|17031839200|...|17031839100|...
/// ```
/// A 2020 tract that overlaps several 2010 tracts maps to the first one listed.
pub struct CrosswalkTable {
    entries: HashMap<String, String>,
    pairs: usize,
}

impl CrosswalkTable {
    /// Loads the table from the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open crosswalk file {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to parse crosswalk file {}", path.display()))
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().delimiter(b'|').from_reader(rdr);

        let mut seen = HashSet::new();
        let mut entries = HashMap::new();

        for result in reader.deserialize() {
            let entry: CrosswalkEntry = result?;
            if entry.geoid_2010.is_empty() {
                continue;
            }
            if seen.insert((entry.geoid_2020.clone(), entry.geoid_2010.clone())) {
                entries.entry(entry.geoid_2020).or_insert(entry.geoid_2010);
            }
        }

        Ok(Self {
            entries,
            pairs: seen.len(),
        })
    }

    /// Returns the 2010 GEOID for `geoid_2020`, if the table has one.
    pub fn lookup_2010(&self, geoid_2020: &str) -> Option<&str> {
        self.entries.get(geoid_2020).map(String::as_str)
    }

    /// Number of distinct (2020, 2010) pairs loaded.
    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }
}
