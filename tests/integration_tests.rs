use acs_tract_history::acs::{ACS_BASE_URL, AcsClient};
use acs_tract_history::analyzers::{derive::derive_ratios, summary::summarize};
use acs_tract_history::config::Location;
use acs_tract_history::crosswalk::CrosswalkTable;
use acs_tract_history::fetch::HttpClient;
use acs_tract_history::output::{export_records, read_records};
use acs_tract_history::pipeline::Pipeline;
use acs_tract_history::services::{IndicatorSource, TractResolver};
use acs_tract_history::stats::IndicatorRecord;
use acs_tract_history::tract::TractReference;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;

const CROSSWALK: &str = "\
GEOID_TRACT_20|GEOID_TRACT_10
17031839200|17031839100
17031839200|17031839100
";

/// Resolves addresses from a fixed list; anything else is not found.
struct FixedResolver(Vec<(&'static str, TractReference)>);

#[async_trait]
impl TractResolver for FixedResolver {
    async fn resolve(&self, address: &str) -> Option<TractReference> {
        self.0
            .iter()
            .find(|(a, _)| *a == address)
            .map(|(_, t)| t.clone())
    }
}

/// Records every query and answers with a fixed row, except for the listed
/// years which return nothing.
struct RecordingSource {
    calls: Mutex<Vec<(u16, String)>>,
    empty_years: Vec<u16>,
}

impl RecordingSource {
    fn new(empty_years: Vec<u16>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            empty_years,
        }
    }

    fn tract_for(&self, year: u16) -> String {
        let calls = self.calls.lock().unwrap();
        calls.iter().find(|(y, _)| *y == year).unwrap().1.clone()
    }
}

#[async_trait]
impl IndicatorSource for RecordingSource {
    async fn fetch(
        &self,
        year: u16,
        _state_fips: &str,
        _county_fips: &str,
        tract_code: &str,
    ) -> Option<IndicatorRecord> {
        self.calls
            .lock()
            .unwrap()
            .push((year, tract_code.to_string()));
        if self.empty_years.contains(&year) {
            return None;
        }
        let row = json!({
            "B25064_001E": "-666666666",
            "B19013_001E": "55000",
            "B25001_001E": "800",
            "B25003_003E": "600"
        });
        Some(IndicatorRecord::from_row(year, row.as_object().unwrap()))
    }
}

fn chicago(needs_crosswalk: bool) -> Location {
    Location {
        name: "Chicago".into(),
        address: "2206 S Wentworth Ave, Chicago, IL 60616".into(),
        needs_crosswalk,
    }
}

fn resolver() -> FixedResolver {
    FixedResolver(vec![(
        "2206 S Wentworth Ave, Chicago, IL 60616",
        TractReference::new("17031839200", "17", "031"),
    )])
}

fn crosswalk() -> CrosswalkTable {
    CrosswalkTable::from_reader(CROSSWALK.as_bytes()).unwrap()
}

#[tokio::test]
async fn test_crosswalk_location_switches_tract_in_2020() {
    let resolver = resolver();
    let source = RecordingSource::new(vec![]);
    let crosswalk = crosswalk();

    let records = Pipeline::new(&resolver, &source, &crosswalk)
        .with_years(2015..=2021)
        .with_request_delay(Duration::ZERO)
        .run(&[chicago(true)])
        .await;

    assert_eq!(source.tract_for(2015), "839100");
    assert_eq!(source.tract_for(2019), "839100");
    assert_eq!(source.tract_for(2020), "839200");
    assert_eq!(source.tract_for(2021), "839200");

    assert_eq!(records.len(), 7);
    assert_eq!(records[0].year, 2015);
    assert_eq!(records[0].tract_geoid, "17031839100");
    assert_eq!(records[6].year, 2021);
    assert_eq!(records[6].tract_geoid, "17031839200");
    assert!(records.iter().all(|r| r.city == "Chicago" && r.source == "acs5"));
}

#[tokio::test]
async fn test_non_crosswalk_location_ignores_table() {
    let resolver = resolver();
    let source = RecordingSource::new(vec![]);
    let crosswalk = crosswalk();

    let records = Pipeline::new(&resolver, &source, &crosswalk)
        .with_years(2010..=2012)
        .with_request_delay(Duration::ZERO)
        .run(&[chicago(false)])
        .await;

    assert!(records.iter().all(|r| r.tract_geoid == "17031839200"));
    assert_eq!(source.tract_for(2010), "839200");
}

#[tokio::test]
async fn test_crosswalk_miss_uses_2020_for_all_years() {
    let resolver = resolver();
    let source = RecordingSource::new(vec![]);
    let crosswalk =
        CrosswalkTable::from_reader("GEOID_TRACT_20|GEOID_TRACT_10\n".as_bytes()).unwrap();

    let records = Pipeline::new(&resolver, &source, &crosswalk)
        .with_years(2018..=2020)
        .with_request_delay(Duration::ZERO)
        .run(&[chicago(true)])
        .await;

    assert_eq!(records.len(), 3);
    assert_eq!(source.tract_for(2018), "839200");
}

#[tokio::test]
async fn test_unresolved_location_is_skipped() {
    let resolver = resolver();
    let source = RecordingSource::new(vec![2011]);
    let crosswalk = crosswalk();
    let locations = [
        Location {
            name: "Nowhere".into(),
            address: "1 Unknown Rd".into(),
            needs_crosswalk: true,
        },
        chicago(false),
    ];

    let records = Pipeline::new(&resolver, &source, &crosswalk)
        .with_years(2010..=2012)
        .with_request_delay(Duration::ZERO)
        .run(&locations)
        .await;

    // Only Chicago is queried, and the empty year is dropped.
    assert_eq!(source.calls.lock().unwrap().len(), 3);
    let years: Vec<_> = records.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2010, 2012]);
}

#[tokio::test]
async fn test_collect_derive_summarize_export() {
    let resolver = resolver();
    let source = RecordingSource::new(vec![]);
    let crosswalk = crosswalk();

    let records = Pipeline::new(&resolver, &source, &crosswalk)
        .with_years(2022..=2023)
        .with_request_delay(Duration::ZERO)
        .run(&[chicago(true)])
        .await;
    let records = derive_ratios(records);

    assert_eq!(records[0].median_rent, None);
    assert_eq!(records[0].median_household_income, Some(55000));
    assert_eq!(records[0].renter_pct, Some(75.0));
    assert_eq!(records[0].college_degree_or_higher, Some(0));
    assert_eq!(records[0].college_degree_pct, None);

    let summary = summarize(&records);
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.location_count, 1);
    let rent = summary
        .missing_values
        .iter()
        .find(|m| m.field == "median_rent")
        .unwrap();
    assert_eq!(rent.missing, 2);

    let path = std::env::temp_dir().join("acs_tract_history_integration_export.csv");
    let _ = std::fs::remove_file(&path);
    export_records(&path, &records).unwrap();
    assert_eq!(read_records(&path).unwrap(), records);
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_no_records_skips_export() {
    let resolver = FixedResolver(vec![]);
    let source = RecordingSource::new(vec![]);
    let crosswalk = crosswalk();

    let records = Pipeline::new(&resolver, &source, &crosswalk)
        .with_request_delay(Duration::ZERO)
        .run(&[chicago(true)])
        .await;
    assert!(records.is_empty());

    let path = std::env::temp_dir().join("acs_tract_history_integration_empty.csv");
    let _ = std::fs::remove_file(&path);
    assert!(export_records(&path, &derive_ratios(records)).is_err());
    assert!(!path.exists());
}

/// Serves one ACS table response for every request.
struct StaticAcs(&'static str);

#[async_trait]
impl HttpClient for StaticAcs {
    async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let resp = http::Response::builder().status(200).body(self.0).unwrap();
        Ok(reqwest::Response::from(resp))
    }
}

#[tokio::test]
async fn test_acs_client_through_pipeline() {
    let resolver = resolver();
    let acs = AcsClient::new(
        StaticAcs(
            r#"[["B25064_001E","B19013_001E","B15003_001E","B15003_022E","B15003_024E","state","county","tract"],
                ["-666666666","55000","1000","150","-222222222","17","031","839100"]]"#,
        ),
        ACS_BASE_URL,
    );
    let crosswalk = crosswalk();

    let records = Pipeline::new(&resolver, &acs, &crosswalk)
        .with_years(2015..=2015)
        .with_request_delay(Duration::ZERO)
        .run(&[chicago(true)])
        .await;
    let records = derive_ratios(records);

    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.tract_geoid, "17031839100");
    assert_eq!(r.median_rent, None);
    assert_eq!(r.median_household_income, Some(55000));
    assert_eq!(r.college_degree_or_higher, Some(150));
    assert_eq!(r.college_degree_pct, Some(15.0));
}
