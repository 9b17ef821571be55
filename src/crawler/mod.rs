//! Crawler module for chained fetching
//!
//! This module contains the chain engine, including:
//! - HTTP fetching with a bounded timeout
//! - HTML attribute extraction
//! - Inter-step delay policy
//! - Step sequencing and value propagation

mod delay;
mod extractor;
mod fetcher;
mod sequencer;

pub use delay::DelayPolicy;
pub use extractor::{extract_values, Extractor, HtmlExtractor};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use sequencer::{select_next_value, Sequencer, StepOutcome};

use crate::config::Config;
use crate::GetterError;
use std::path::PathBuf;
use std::time::Duration;

/// Runs the configured chain over HTTP
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client with the configured timeout
/// 2. Build the delay policy from the `[crawl]` section
/// 3. Run every step in order
///
/// # Returns
///
/// * `Ok(Some(path))` - The last file written
/// * `Ok(None)` - No step wrote output
/// * `Err(GetterError)` - The first failure
pub async fn crawl(config: &Config) -> Result<Option<PathBuf>, GetterError> {
    let fetcher = HttpFetcher::new(Duration::from_secs(config.crawl.timeout))?;
    let delay = DelayPolicy::from_config(&config.crawl);
    Sequencer::new(fetcher, HtmlExtractor, delay)
        .run(&config.steps)
        .await
}
