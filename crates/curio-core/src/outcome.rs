use std::time::Duration;

use thiserror::Error;

/// Outbound request envelope handed to the transport layer.
///
/// No body means GET; a body means POST with a JSON content type, which is
/// the only shape the collection search endpoint accepts beyond plain GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCall {
    pub url: String,
    pub body: Option<String>,
    pub timeout: Duration,
}

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

impl OutboundCall {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: None,
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Classified failure of a single outbound call.
///
/// The `Display` form is the internal diagnostic; anything shown to an end
/// user goes through [`CallError::user_message`], which paraphrases variants
/// whose detail must not leak.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("no response within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("upstream unreachable: {detail}")]
    Unreachable { detail: String },

    #[error("upstream returned status {status}")]
    HttpStatus { status: u16 },

    #[error("unexpected response shape: {detail}")]
    ShapeMismatch { detail: String },
}

impl CallError {
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
        }
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self::Unreachable {
            detail: detail.into(),
        }
    }

    pub fn shape_mismatch(detail: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            detail: detail.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "call.timeout",
            Self::Unreachable { .. } => "call.unreachable",
            Self::HttpStatus { .. } => "call.http_status",
            Self::ShapeMismatch { .. } => "call.shape_mismatch",
        }
    }

    pub const fn retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Unreachable { .. } => true,
            Self::HttpStatus { status } => *status == 429 || *status >= 500,
            Self::ShapeMismatch { .. } => false,
        }
    }

    /// Whether the `Display` form is safe to show verbatim.
    ///
    /// `Unreachable` embeds transport diagnostics (resolver output, socket
    /// errors) and `ShapeMismatch` embeds deserializer internals; both must
    /// be paraphrased.
    pub const fn is_user_safe(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::HttpStatus { .. })
    }

    /// Human-readable phrasing suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout { .. } => {
                String::from("the collection API took too long to respond; try again")
            }
            Self::Unreachable { .. } => String::from("the collection API could not be reached"),
            Self::HttpStatus { status } => match status {
                404 => String::from("no matching record was found upstream"),
                429 => String::from(
                    "the collection API is rate limiting requests; wait a moment and retry",
                ),
                500..=599 => String::from("the collection API is temporarily degraded"),
                other => format!("the collection API rejected the request (status {other})"),
            },
            Self::ShapeMismatch { .. } => {
                String::from("the collection API returned an unexpected response")
            }
        }
    }
}
