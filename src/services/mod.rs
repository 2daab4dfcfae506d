//! Seams between the pipeline driver and the remote Census services.

mod census_api;

pub use census_api::{IndicatorSource, TractResolver};
