pub mod acs;
pub mod analyzers;
pub mod config;
pub mod crosswalk;
pub mod fetch;
pub mod geocoder;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod services;
pub mod stats;
pub mod tract;
