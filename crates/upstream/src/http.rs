//! Shared HTTP plumbing for every provider client.
//!
//! One pooled reqwest client per process; one bounded semaphore gating all
//! outbound requests; per-request timeout; the retry schedule from
//! [`crate::retry`]. Auth material is injected here and nowhere else, and is
//! scrubbed from transport errors before they become messages.

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use config::{CacheConfig, LimitsConfig};
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::{
    cache::UrlCache,
    error::{Result, UpstreamError},
    retry::{RetryPolicy, retry},
};

/// Common HTTP client, reusing connections across every provider.
fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            Client::builder()
                .user_agent(concat!("pressbox/", env!("CARGO_PKG_VERSION")))
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .tcp_nodelay(true)
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .build()
                .expect("default HTTP client must build")
        })
        .clone()
}

/// How a provider authenticates its requests.
#[derive(Clone, Copy)]
pub(crate) enum Auth<'a> {
    /// No credential (MLB Stats API).
    None,
    /// Named request header carrying the token.
    Header(&'static str, &'a SecretString),
    /// `Authorization: Bearer` header.
    Bearer(&'a SecretString),
    /// Query-string parameter carrying the token.
    Query(&'static str, &'a SecretString),
}

/// Shared fetch layer handed to each provider client.
#[derive(Clone)]
pub struct FetchClient {
    http: Client,
    limiter: Arc<Semaphore>,
    timeout: Duration,
    retry: RetryPolicy,
    cache: Option<UrlCache>,
}

impl FetchClient {
    /// Build the process-wide fetch layer from configuration.
    pub fn new(limits: &LimitsConfig, cache: &CacheConfig) -> Self {
        Self {
            http: http_client(),
            limiter: Arc::new(Semaphore::new(limits.max_concurrency)),
            timeout: limits.request_timeout,
            retry: RetryPolicy::default(),
            cache: cache.enabled.then(|| UrlCache::new(cache.effective_ttl())),
        }
    }

    /// One GET against an absolute URL, retried per the policy, parsed as
    /// JSON. Query auth becomes part of the cached URL key; header auth does
    /// not touch the key.
    pub(crate) async fn get_json(&self, mut url: Url, auth: Auth<'_>) -> Result<Value> {
        if let Auth::Query(name, token) = auth {
            url.query_pairs_mut().append_pair(name, token.expose_secret());
        }

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(url.as_str())
        {
            return Ok(hit.as_ref().clone());
        }

        let body = retry(self.retry, || self.attempt_get(url.clone(), auth)).await?;

        if let Some(cache) = &self.cache {
            cache.insert(url.as_str(), Arc::new(body.clone()));
        }

        Ok(body)
    }

    /// One POST with a JSON body, retried per the policy. Never cached.
    pub(crate) async fn post_json(&self, url: Url, body: &Value, auth: Auth<'_>) -> Result<Value> {
        retry(self.retry, || self.attempt_post(url.clone(), body, auth)).await
    }

    async fn attempt_get(&self, url: Url, auth: Auth<'_>) -> Result<Value> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| UpstreamError::Transient {
                reason: "request limiter shut down".to_string(),
            })?;

        let mut request = self.http.get(url).timeout(self.timeout);
        request = apply_auth(request, auth);

        let response = request.send().await.map_err(classify_transport)?;

        read_json(response).await
    }

    async fn attempt_post(&self, url: Url, body: &Value, auth: Auth<'_>) -> Result<Value> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| UpstreamError::Transient {
                reason: "request limiter shut down".to_string(),
            })?;

        let mut request = self.http.post(url).timeout(self.timeout).json(body);
        request = apply_auth(request, auth);

        let response = request.send().await.map_err(classify_transport)?;

        read_json(response).await
    }
}

fn apply_auth(request: reqwest::RequestBuilder, auth: Auth<'_>) -> reqwest::RequestBuilder {
    match auth {
        Auth::None | Auth::Query(..) => request,
        Auth::Header(name, token) => request.header(name, token.expose_secret()),
        Auth::Bearer(token) => request.bearer_auth(token.expose_secret()),
    }
}

/// Map a transport-level error to the taxonomy without leaking the URL,
/// whose query string may carry a credential.
fn classify_transport(err: reqwest::Error) -> UpstreamError {
    let err = err.without_url();

    if err.is_timeout() {
        UpstreamError::Transient {
            reason: format!("timeout: {err}"),
        }
    } else {
        UpstreamError::Transient {
            reason: format!("connection error: {err}"),
        }
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await.map_err(|err| UpstreamError::Transient {
        reason: format!("failed reading response body: {}", err.without_url()),
    })?;

    if is_retryable_status(status) {
        return Err(UpstreamError::retryable_status(status.as_u16(), &body));
    }

    if !status.is_success() {
        return Err(UpstreamError::http(status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|err| UpstreamError::Decode {
        reason: err.to_string(),
    })
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// Deserialize an upstream JSON value into a provider's typed shape.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| UpstreamError::Decode {
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses_match_the_policy() {
        for code in [429, 500, 502, 503, 504] {
            assert!(is_retryable_status(StatusCode::from_u16(code).unwrap()), "{code}");
        }

        for code in [400, 401, 403, 404, 418] {
            assert!(!is_retryable_status(StatusCode::from_u16(code).unwrap()), "{code}");
        }
    }
}
