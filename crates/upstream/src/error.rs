//! Upstream error taxonomy.
//!
//! Every variant renders as a single line. Credentials never appear in any
//! message; HTTP failures carry at most the first 180 bytes of the response
//! body, flattened to one line.

/// How much of an upstream error body is kept for the error message.
const BODY_PREFIX_BYTES: usize = 180;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Errors produced by upstream HTTP calls and normalization.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// Terminal upstream status (4xx other than 429). Not retried.
    #[error("{status}: {body_prefix}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// First bytes of the response body, single-line.
        body_prefix: String,
    },

    /// Transient failure: timeout, transport error, or a retryable status
    /// after the backoff schedule was exhausted. When a status was observed
    /// the message begins with it.
    #[error("{reason}")]
    Transient {
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The upstream returned a body that is not valid JSON.
    #[error("invalid JSON from upstream: {reason}")]
    Decode {
        /// Parser error detail.
        reason: String,
    },

    /// A required field could not be normalized into the internal model.
    #[error("could not normalize field `{field}`")]
    Normalize {
        /// The offending field.
        field: &'static str,
    },

    /// The provider requires a credential that was not configured.
    #[error("no credential configured for {provider}")]
    Credential {
        /// Provider name.
        provider: &'static str,
    },
}

impl UpstreamError {
    /// Whether the retry loop should try again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    pub(crate) fn http(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            body_prefix: body_prefix(body),
        }
    }

    pub(crate) fn retryable_status(status: u16, body: &str) -> Self {
        Self::Transient {
            reason: format!("{status} from upstream: {}", body_prefix(body)),
        }
    }
}

/// Flatten a response body into a bounded, single-line prefix.
fn body_prefix(body: &str) -> String {
    let mut prefix: String = body
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if prefix.len() > BODY_PREFIX_BYTES {
        let mut cut = BODY_PREFIX_BYTES;
        while !prefix.is_char_boundary(cut) {
            cut -= 1;
        }
        prefix.truncate(cut);
    }

    prefix.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_are_flattened_and_bounded() {
        let body = format!("line one\nline two {}", "x".repeat(300));
        let err = UpstreamError::http(404, &body);

        let message = err.to_string();
        assert!(message.starts_with("404: line one line two"));
        assert!(!message.contains('\n'));
        assert!(message.len() <= BODY_PREFIX_BYTES + 8);
    }

    #[test]
    fn retryable_status_message_leads_with_the_status() {
        let err = UpstreamError::retryable_status(503, "Service Unavailable");

        assert!(err.is_transient());
        assert!(err.to_string().starts_with("503 from upstream"));
    }

    #[test]
    fn terminal_http_is_not_transient() {
        assert!(!UpstreamError::http(404, "nope").is_transient());
        assert!(!UpstreamError::Normalize { field: "date" }.is_transient());
    }
}
