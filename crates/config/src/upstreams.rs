//! Upstream sports data provider settings.
//!
//! Each provider carries its base URL (overridable, which is how the
//! integration tests point the server at stub upstreams) and, where the
//! provider requires one, an auth credential. Credentials deserialize into
//! [`SecretString`] and are normally injected from the environment by the
//! loader rather than written into the TOML file.

use std::time::Duration;

use duration_str::deserialize_duration;
use secrecy::SecretString;
use serde::Deserialize;

/// Settings for all upstream data providers.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamsConfig {
    /// MLB Stats API (no authentication).
    pub mlb: MlbConfig,
    /// Football-Data.org v4 (header token).
    pub football_data: FootballDataConfig,
    /// SoccerDataAPI (query-string token).
    pub soccerdata: SoccerDataConfig,
    /// The Odds API v4 (query-string key).
    pub odds: OddsApiConfig,
    /// Optional same-day URL cache.
    pub cache: CacheConfig,
}

/// MLB Stats API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MlbConfig {
    /// Base URL of the API.
    pub base_url: String,
}

impl Default for MlbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://statsapi.mlb.com/api/v1".to_string(),
        }
    }
}

/// Football-Data.org settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FootballDataConfig {
    /// Base URL of the API.
    pub base_url: String,
    /// API key sent as the `X-Auth-Token` header. Normally injected from
    /// `FOOTBALL_DATA_API_KEY`.
    pub api_key: Option<SecretString>,
}

impl Default for FootballDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.football-data.org/v4".to_string(),
            api_key: None,
        }
    }
}

/// SoccerDataAPI settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoccerDataConfig {
    /// Base URL of the API.
    pub base_url: String,
    /// Token sent as the `auth_token` query parameter. Normally injected
    /// from `SOCCERDATA_AUTH_TOKEN`.
    pub auth_token: Option<SecretString>,
}

impl Default for SoccerDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.soccerdataapi.com".to_string(),
            auth_token: None,
        }
    }
}

/// The Odds API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OddsApiConfig {
    /// Base URL of the API.
    pub base_url: String,
    /// Key sent as the `apiKey` query parameter. Normally injected from
    /// `ODDS_API_KEY`.
    pub api_key: Option<SecretString>,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.the-odds-api.com/v4".to_string(),
            api_key: None,
        }
    }
}

/// Same-day URL cache settings. The cache is keyed by full request URL and
/// only ever holds 2xx JSON bodies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether the cache is active.
    pub enabled: bool,
    /// Entry time-to-live. Clamped to at most five minutes.
    #[serde(deserialize_with = "deserialize_duration")]
    pub ttl: Duration,
}

impl CacheConfig {
    /// The TTL with the five minute ceiling applied.
    pub fn effective_ttl(&self) -> Duration {
        self.ttl.min(Duration::from_secs(300))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl: Duration::from_secs(300),
        }
    }
}
