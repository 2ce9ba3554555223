//! The `ToolResult` envelope every handler returns.

use jiff::Timestamp;
use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;

/// Envelope metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    /// When the result was produced, UTC.
    pub timestamp: Timestamp,
    /// Optional free-text note (ET semantics, effective counts, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome of one tool call. Exactly one of `data` and `error` is present:
/// the constructors are the only way to build one, so the invariant holds by
/// construction.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Short human-readable summary.
    pub content_md: String,
    /// Tool-specific payload; present iff `ok`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Envelope metadata.
    pub meta: Meta,
    /// Single-line failure message; present iff not `ok`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// A successful result carrying `data`.
    pub fn success(content_md: impl Into<String>, data: Value) -> Self {
        Self {
            ok: true,
            content_md: content_md.into(),
            data: Some(data),
            meta: Meta {
                timestamp: Timestamp::now(),
                note: None,
            },
            error: None,
        }
    }

    /// A failed result carrying a single-line error message.
    pub fn failure(error: &ToolError) -> Self {
        let message = single_line(&error.to_string());

        Self {
            ok: false,
            content_md: format!("**Error**: {message}"),
            data: None,
            meta: Meta {
                timestamp: Timestamp::now(),
                note: None,
            },
            error: Some(message),
        }
    }

    /// A failed result from a pre-rendered message. Used where a fan-out
    /// tool collapses every per-entity failure into one top-level error.
    pub(crate) fn failure_message(message: impl Into<String>) -> Self {
        let message = single_line(&message.into());

        Self {
            ok: false,
            content_md: format!("**Error**: {message}"),
            data: None,
            meta: Meta {
                timestamp: Timestamp::now(),
                note: None,
            },
            error: Some(message),
        }
    }

    /// Attach a `meta.note`.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.meta.note = Some(note.into());
        self
    }
}

fn single_line(message: &str) -> String {
    let flattened: String = message
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    flattened.trim().to_string()
}
