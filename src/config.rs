//! Configuration types for result-scrape

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level scraper configuration
///
/// Works out of the box against the default endpoint shape; every field is
/// individually overridable and serde-defaulted so partial config files work.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Base URL of the result-publishing site (default: "http://results.example.ac.in")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path template for the primary result form, with `{batch}` standing in
    /// for the two-digit batch code (default: "scheme{batch}/studentresult/index.asp")
    #[serde(default = "default_result_path_template")]
    pub result_path_template: String,

    /// Path template for the extended (dual-degree continuation) result form
    /// (default: "scheme{batch}/dualdegree/index.asp")
    #[serde(default = "default_extended_path_template")]
    pub extended_path_template: String,

    /// Per-request timeout applied to every fetch (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Worker count for the pooled bulk strategy (default: 4)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Pacing interval gating fetch issuance across the whole pool
    /// (default: 1 second)
    #[serde(default = "default_pacing_interval", with = "duration_serde")]
    pub pacing_interval: Duration,

    /// Retry behavior for the sequential strategy
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            result_path_template: default_result_path_template(),
            extended_path_template: default_extended_path_template(),
            request_timeout: default_request_timeout(),
            workers: default_workers(),
            pacing_interval: default_pacing_interval(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for transient failures
///
/// The delay ladder is linear with jitter: before attempt `n` (0-based) the
/// caller sleeps `base_delay * (n + 1)` plus a uniform jitter of up to
/// `max_jitter_secs` whole seconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries beyond the first attempt (default: 5)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay unit for the backoff ladder (default: 1 second)
    #[serde(default = "default_base_delay", with = "duration_serde")]
    pub base_delay: Duration,

    /// Upper bound of the random jitter added to each delay, in whole
    /// seconds (default: 2)
    #[serde(default = "default_max_jitter_secs")]
    pub max_jitter_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay: default_base_delay(),
            max_jitter_secs: default_max_jitter_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://results.example.ac.in".to_string()
}

fn default_result_path_template() -> String {
    "scheme{batch}/studentresult/index.asp".to_string()
}

fn default_extended_path_template() -> String {
    "scheme{batch}/dualdegree/index.asp".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_workers() -> usize {
    4
}

fn default_pacing_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_jitter_secs() -> u64 {
    2
}

// Duration serialization helper (seconds as integers)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
