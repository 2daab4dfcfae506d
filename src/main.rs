//! CLI entry point for the ACS tract history collector.
//!
//! Provides subcommands for running the full collection, geocoding a single
//! address, and summarizing a previously exported CSV.

use acs_tract_history::acs::AcsClient;
use acs_tract_history::analyzers::{derive::derive_ratios, summary::summarize};
use acs_tract_history::config::LocationConfig;
use acs_tract_history::crosswalk::CrosswalkTable;
use acs_tract_history::geocoder::Geocoder;
use acs_tract_history::output::{
    SAMPLE_ROWS, export_records, print_sample, print_summary, read_records, write_summary_json,
};
use acs_tract_history::pipeline::{FIRST_YEAR, LAST_YEAR, Pipeline, year_range};
use acs_tract_history::services::TractResolver;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "acs_tract_history")]
#[command(about = "Collect ACS5 housing and economic history for census tracts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Geocode every location and fetch its indicators for each survey year
    Collect(CollectArgs),
    /// Resolve a single address to its 2020 census tract
    Geocode {
        /// One-line street address
        #[arg(value_name = "ADDRESS")]
        address: String,
    },
    /// Summarize a previously exported CSV
    Summarize {
        /// CSV written by `collect`
        #[arg(value_name = "CSV")]
        input: String,

        /// Optional: write the summary as JSON to this path
        #[arg(long)]
        summary_json: Option<String>,
    },
}

#[derive(Args)]
struct CollectArgs {
    /// JSON file listing locations to collect
    #[arg(short, long, default_value = "locations.json")]
    locations: String,

    /// Pipe-delimited 2020/2010 tract relationship file
    #[arg(short, long, default_value = "crosswalk.txt")]
    crosswalk: String,

    /// CSV file to write results to
    #[arg(short, long, default_value = "tract_housing_economics.csv")]
    output: String,

    /// Optional: write the summary as JSON to this path
    #[arg(long)]
    summary_json: Option<String>,

    /// First survey year to collect
    #[arg(long, default_value_t = FIRST_YEAR)]
    start_year: u16,

    /// Last survey year to collect
    #[arg(long, default_value_t = LAST_YEAR)]
    end_year: u16,

    /// Pause after each survey request, in milliseconds
    #[arg(long, default_value_t = 300)]
    request_delay_ms: u64,

    /// Pause between geocoder retries, in seconds
    #[arg(long, default_value_t = 2)]
    retry_backoff_secs: u64,

    /// Census API key (defaults to the CENSUS_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/acs_tract_history.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("acs_tract_history.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect(args) => collect(args).await?,
        Commands::Geocode { address } => {
            let geocoder = Geocoder::census()?;
            let Some(tract) = geocoder.resolve(&address).await else {
                bail!("could not geocode {address:?} to a census tract");
            };
            info!(
                geoid = %tract.geoid,
                state = %tract.state_fips,
                county = %tract.county_fips,
                tract = %tract.tract_code,
                "Tract resolved"
            );
        }
        Commands::Summarize {
            input,
            summary_json,
        } => {
            let records = derive_ratios(read_records(&input)?);
            print_sample(&records, SAMPLE_ROWS);

            let summary = summarize(&records);
            print_summary(&summary);
            if let Some(path) = summary_json {
                write_summary_json(&path, &summary)?;
                info!(path = %path, "Summary written");
            }
        }
    }

    Ok(())
}

/// Runs the full pipeline: load inputs, collect every location × year,
/// derive ratios, then log and export the results.
#[tracing::instrument(skip_all, fields(output = %args.output))]
async fn collect(args: CollectArgs) -> Result<()> {
    let api_key = match args.api_key {
        Some(key) => key,
        None => std::env::var("CENSUS_API_KEY")
            .context("CENSUS_API_KEY must be set (or pass --api-key)")?,
    };
    let years = year_range(args.start_year, args.end_year)?;

    let config = LocationConfig::load(&args.locations)?;
    let crosswalk = CrosswalkTable::load(&args.crosswalk)?;

    info!(
        locations = config.locations.len(),
        crosswalk_locations = config.crosswalk_count(),
        crosswalk_pairs = crosswalk.len(),
        first_year = *years.start(),
        last_year = *years.end(),
        "Starting collection"
    );

    let geocoder =
        Geocoder::census()?.with_backoff(Duration::from_secs(args.retry_backoff_secs));
    let acs = AcsClient::census(api_key)?;

    let records = Pipeline::new(&geocoder, &acs, &crosswalk)
        .with_years(years)
        .with_request_delay(Duration::from_millis(args.request_delay_ms))
        .run(&config.locations)
        .await;
    let records = derive_ratios(records);

    print_sample(&records, SAMPLE_ROWS);

    let summary = summarize(&records);
    print_summary(&summary);
    if let Some(path) = &args.summary_json {
        write_summary_json(path, &summary)?;
        info!(path = %path, "Summary written");
    }

    export_records(&args.output, &records)?;
    info!(path = %args.output, rows = records.len(), "Data saved");

    Ok(())
}
