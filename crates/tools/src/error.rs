//! Tool-level error taxonomy and the demotion policy helpers.

use upstream::UpstreamError;

/// Result alias for tool handlers.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors a tool handler can surface. Every variant renders as a single
/// line suitable for the `error` field of a failed `ToolResult`.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A caller-supplied argument failed its schema check. Always terminal.
    #[error("invalid `{field}`: {reason}")]
    Validation {
        /// The offending argument.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An upstream call failed. Demoted to a per-entity entry by fan-out
    /// tools when at least one entity succeeded.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Every expert call failed; no distribution can be formed.
    #[error("expert consensus unavailable: {0}")]
    Consensus(String),

    /// The per-request deadline expired; partial fan-out results are
    /// discarded.
    #[error("request deadline exceeded after {seconds}s")]
    Timeout {
        /// The configured deadline.
        seconds: u64,
    },

    /// A programming bug. The wire message stays stable and redacted; the
    /// detail goes to the log.
    #[error("internal error")]
    Internal,
}

impl ToolError {
    /// Shorthand for a validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Decode a tool's argument object into its typed form.
pub(crate) fn decode_args<T: serde::de::DeserializeOwned>(arguments: serde_json::Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|err| ToolError::Validation {
        field: "arguments".to_string(),
        reason: err.to_string(),
    })
}
