//! Concurrency and timeout settings.

use std::time::Duration;

use duration_str::deserialize_duration;
use serde::Deserialize;

/// Concurrency and timeout settings shared by every tool handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum number of concurrent outbound HTTP requests, process-wide.
    pub max_concurrency: usize,
    /// Timeout for a single upstream HTTP request. Expiry counts as a
    /// transient failure and participates in retry backoff.
    #[serde(deserialize_with = "deserialize_duration")]
    pub request_timeout: Duration,
    /// Overall deadline for one `tools/call` request. Outstanding fan-out
    /// work is cancelled when it expires.
    #[serde(deserialize_with = "deserialize_duration")]
    pub request_deadline: Duration,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 15,
            request_timeout: Duration::from_secs(20),
            request_deadline: Duration::from_secs(60),
        }
    }
}
