//! Configuration loading: optional TOML file plus environment overrides.
//!
//! Credentials only ever enter the process here, once, at startup.

use std::{
    net::{Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use secrecy::SecretString;

use crate::Config;

/// A malformed environment variable. Surfacing this at startup is the only
/// configuration failure that exits the process with a non-zero code besides
/// a bind failure.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {name}: {reason}")]
pub struct EnvError {
    /// The offending variable name.
    pub name: &'static str,
    /// Why it could not be parsed.
    pub reason: String,
}

pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config)?;

    Ok(config)
}

fn apply_env_overrides(config: &mut Config) -> Result<(), EnvError> {
    if let Some(port) = parse_env::<u16>("PORT")? {
        let ip = config
            .server
            .listen_address
            .map(|addr| addr.ip())
            .unwrap_or_else(|| Ipv4Addr::UNSPECIFIED.into());

        config.server.listen_address = Some(SocketAddr::new(ip, port));
    }

    if let Some(max) = parse_env::<usize>("MAX_CONCURRENCY")? {
        if max == 0 {
            return Err(EnvError {
                name: "MAX_CONCURRENCY",
                reason: "must be at least 1".to_string(),
            });
        }
        config.limits.max_concurrency = max;
    }

    if let Some(secs) = parse_env::<u64>("REQUEST_TIMEOUT_S")? {
        if secs == 0 {
            return Err(EnvError {
                name: "REQUEST_TIMEOUT_S",
                reason: "must be at least 1".to_string(),
            });
        }
        config.limits.request_timeout = Duration::from_secs(secs);
    }

    if let Some(key) = secret_env("FOOTBALL_DATA_API_KEY") {
        config.upstreams.football_data.api_key = Some(key);
    }

    if let Some(token) = secret_env("SOCCERDATA_AUTH_TOKEN") {
        config.upstreams.soccerdata.auth_token = Some(token);
    }

    if let Some(key) = secret_env("ODDS_API_KEY") {
        config.upstreams.odds.api_key = Some(key);
    }

    if let Some(key) = secret_env("LLM_API_KEY") {
        config.experts.api_key = Some(key);
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, EnvError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map(Some).map_err(|err: T::Err| EnvError {
            name,
            reason: err.to_string(),
        }),
        Err(_) => Ok(None),
    }
}

fn secret_env(name: &str) -> Option<SecretString> {
    std::env::var(name).ok().filter(|v| !v.is_empty()).map(SecretString::from)
}
