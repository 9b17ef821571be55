//! Step sequencer - the chain engine
//!
//! Runs the configured steps strictly in order. Each step:
//! - Builds its URL from the step's base URL and the value carried forward
//! - Fetches the body
//! - Saves the body when `out` or `outdir` is set
//! - Extracts attribute values when `elem` and `attr` are set
//! - Selects the single value carried to the next step
//!
//! Any error ends the run immediately. Files written by earlier steps stay on
//! disk.

use crate::config::StepDescriptor;
use crate::crawler::delay::DelayPolicy;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::output::{write_body, OutputTarget};
use crate::url::{basename, join_value};
use crate::GetterError;
use std::path::PathBuf;
use tracing::Instrument;

/// What one step produced
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// The URL that was fetched
    pub url: String,

    /// Raw response body
    pub body: Vec<u8>,

    /// Extracted attribute values, in document order
    pub values: Vec<String>,

    /// File the body was written to, if any
    pub written: Option<PathBuf>,

    /// Value carried to the next step (empty when nothing was selected)
    pub next_value: String,
}

/// Runs a chain of steps against a fetcher and an extractor
pub struct Sequencer<F, E> {
    fetcher: F,
    extractor: E,
    delay: DelayPolicy,
}

impl<F: Fetcher, E: Extractor> Sequencer<F, E> {
    /// Creates a new sequencer
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Downloads each step's URL
    /// * `extractor` - Pulls attribute values out of fetched pages
    /// * `delay` - Pause policy between steps
    pub fn new(fetcher: F, extractor: E, delay: DelayPolicy) -> Self {
        Self {
            fetcher,
            extractor,
            delay,
        }
    }

    /// Runs every step in order
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` - The last file written by any step
    /// * `Ok(None)` - No step wrote output
    /// * `Err(GetterError)` - The first error; later steps were not run
    pub async fn run(&self, steps: &[StepDescriptor]) -> Result<Option<PathBuf>, GetterError> {
        let total = steps.len();
        let mut value = String::new();
        let mut last_written = None;

        tracing::info!("Running chain of {} steps", total);

        for (index, step) in steps.iter().enumerate() {
            let is_last = index + 1 == total;
            let span = tracing::info_span!("step", n = index + 1, of = total);

            let outcome = async {
                let outcome = self.run_step(step, &value).await?;
                if !is_last {
                    self.pause().await;
                }
                Ok::<_, GetterError>(outcome)
            }
            .instrument(span)
            .await?;

            if outcome.written.is_some() {
                last_written = outcome.written;
            }
            value = outcome.next_value;
        }

        tracing::info!("Chain complete");
        Ok(last_written)
    }

    /// Runs a single step with the value carried from the previous one
    pub async fn run_step(
        &self,
        step: &StepDescriptor,
        value: &str,
    ) -> Result<StepOutcome, GetterError> {
        let url = join_value(&step.url, value);

        let body = self.fetcher.fetch(&url).await?;

        let written = match OutputTarget::resolve(step, &url) {
            Some(target) => Some(write_body(&target, &body)?),
            None => None,
        };

        let values = self.extract(step, &url, &body)?;
        let next_value = select_next_value(&values, &step.grep);
        if !next_value.is_empty() {
            tracing::info!("Carrying '{}' to the next step", next_value);
        }

        Ok(StepOutcome {
            url,
            body,
            values,
            written,
            next_value,
        })
    }

    /// Fetches one step's URL and returns its extracted values
    ///
    /// When `grep` is set only values containing it are returned. Nothing is
    /// written to disk.
    pub async fn fetch_values(&self, step: &StepDescriptor) -> Result<Vec<String>, GetterError> {
        let body = self.fetcher.fetch(&step.url).await?;
        let values = self.extract(step, &step.url, &body)?;
        Ok(values
            .into_iter()
            .filter(|v| v.contains(step.grep.as_str()))
            .collect())
    }

    fn extract(
        &self,
        step: &StepDescriptor,
        url: &str,
        body: &[u8],
    ) -> Result<Vec<String>, GetterError> {
        if !step.extracts() {
            return Ok(Vec::new());
        }

        let values = self
            .extractor
            .extract(body, &step.elem, &step.attr)
            .map_err(|message| GetterError::HtmlParse {
                url: url.to_string(),
                message,
            })?;

        tracing::debug!("<{} {}> values: {:?}", step.elem, step.attr, values);
        Ok(values)
    }

    async fn pause(&self) {
        if let Some(duration) = self.delay.pick() {
            tracing::info!("Sleeping {}s before the next step", duration.as_secs());
            tokio::time::sleep(duration).await;
        }
    }
}

/// Chooses the value carried to the next step
///
/// With `grep` set, the basename of the first value containing it wins.
/// Without `grep`, the first value is used verbatim. Otherwise the result is
/// empty.
///
/// # Example
///
/// ```
/// use getter::crawler::select_next_value;
///
/// let values = vec!["/a/foo".to_string(), "/b/bar".to_string()];
/// assert_eq!(select_next_value(&values, "bar"), "bar");
/// assert_eq!(select_next_value(&values, ""), "/a/foo");
/// assert_eq!(select_next_value(&values, "baz"), "");
/// ```
pub fn select_next_value(values: &[String], grep: &str) -> String {
    if !grep.is_empty() {
        return values
            .iter()
            .find(|v| v.contains(grep))
            .map(|v| basename(v).to_string())
            .unwrap_or_default();
    }
    values.first().cloned().unwrap_or_default()
}
