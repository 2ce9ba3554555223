//! Pressbox configuration structures mapping the pressbox.toml configuration.
//!
//! Secrets (provider tokens) are never stored in plain strings: the loader
//! pulls them from the environment into [`secrecy::SecretString`] fields so
//! they cannot leak through `Debug` output or log lines.

#![deny(missing_docs)]

mod experts;
mod limits;
mod loader;
mod server;
mod upstreams;

use std::path::Path;

pub use experts::{ExpertsConfig, ProbabilityPattern};
pub use limits::LimitsConfig;
pub use loader::EnvError;
use serde::Deserialize;
pub use server::{HealthConfig, ServerConfig};
pub use upstreams::{
    CacheConfig, FootballDataConfig, MlbConfig, OddsApiConfig, SoccerDataConfig, UpstreamsConfig,
};

/// Main configuration structure for the pressbox server.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Concurrency and timeout settings.
    pub limits: LimitsConfig,
    /// Upstream sports data providers.
    pub upstreams: UpstreamsConfig,
    /// Expert consensus (LLM) settings.
    pub experts: ExpertsConfig,
}

impl Config {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides. Pass `None` to run on defaults plus environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        loader::load(path)
    }
}
