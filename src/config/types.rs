use serde::Deserialize;
use std::fmt;

/// Main configuration structure for Getter
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Ordered chain of steps, run first to last
    #[serde(rename = "step", default)]
    pub steps: Vec<StepDescriptor>,
}

/// Request and pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Upper bound on a single request, in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether to sleep between steps
    #[serde(default = "default_delay")]
    pub delay: bool,

    /// Lower bound of the inter-step delay (seconds, inclusive)
    #[serde(rename = "delay-min", default = "default_delay_min")]
    pub delay_min: u64,

    /// Upper bound of the inter-step delay (seconds, inclusive)
    #[serde(rename = "delay-max", default = "default_delay_max")]
    pub delay_max: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            delay: default_delay(),
            delay_min: default_delay_min(),
            delay_max: default_delay_max(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_delay() -> bool {
    true
}

fn default_delay_min() -> u64 {
    10
}

fn default_delay_max() -> u64 {
    19
}

/// One stage of the chain
///
/// Every field is a plain string and an empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StepDescriptor {
    /// Base URL; the propagated value is appended as a path segment
    pub url: String,

    /// Tag name to extract from
    pub elem: String,

    /// Attribute name to extract
    pub attr: String,

    /// Substring filter applied to extracted values
    pub grep: String,

    /// Exact output file path
    pub out: String,

    /// Output directory; the file name is the basename of the fetched URL
    pub outdir: String,
}

impl StepDescriptor {
    /// Creates a step that only fetches `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Returns true if both `elem` and `attr` are set
    pub fn extracts(&self) -> bool {
        !self.elem.is_empty() && !self.attr.is_empty()
    }
}

impl fmt::Display for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        if self.extracts() {
            write!(f, " <{} {}>", self.elem, self.attr)?;
        }
        if !self.grep.is_empty() {
            write!(f, " grep={}", self.grep)?;
        }
        if !self.out.is_empty() {
            write!(f, " out={}", self.out)?;
        } else if !self.outdir.is_empty() {
            write!(f, " outdir={}", self.outdir)?;
        }
        Ok(())
    }
}
