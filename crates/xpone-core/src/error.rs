// ── Core error types ──
//
// Errors surfaced to consumers of `xpone-core`. The `From<xpone_api::Error>`
// impl translates transport-layer failures into domain variants, and
// `class()` sorts every error into the handling buckets consumers act on.

use thiserror::Error;

/// How a consumer should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorClass {
    /// Endpoint missing on this firmware: fall back to another path or cache.
    EndpointUnavailable,
    /// Token rejected and refresh failed: re-authentication required.
    SessionExpired,
    /// Connection failure or timeout: retryable.
    Network,
    /// A write was rejected by the controller.
    Validation,
    /// Analytics endpoint not exposed: swallow silently.
    Suppressed,
    /// Anything else (configuration, storage, server faults).
    Other,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    #[error("Controller request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Endpoint not available on this controller: {endpoint}")]
    EndpointUnavailable { endpoint: String },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("Suppressed analytics error: {capability}")]
    Suppressed { capability: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Change rejected by controller (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Settings storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::EndpointUnavailable { .. }
            | Self::Api {
                status: Some(404 | 405 | 501),
                ..
            } => ErrorClass::EndpointUnavailable,
            Self::SessionExpired | Self::AuthenticationFailed { .. } => ErrorClass::SessionExpired,
            Self::ConnectionFailed { .. }
            | Self::Timeout { .. }
            | Self::Api {
                status: Some(502..=504),
                ..
            } => ErrorClass::Network,
            Self::Rejected { .. } | Self::ValidationFailed { .. } | Self::NotFound { .. } => {
                ErrorClass::Validation
            }
            Self::Suppressed { .. } => ErrorClass::Suppressed,
            Self::Api { .. } | Self::Config { .. } | Self::Storage { .. } | Self::Internal(_) => {
                ErrorClass::Other
            }
        }
    }

    /// Whether retrying the same call later could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Network | ErrorClass::EndpointUnavailable
        )
    }

    /// Short message suitable for showing an operator after a failed write.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { status: 403, .. } => {
                "You do not have permission to change this configuration.".into()
            }
            Self::Rejected { status: 404, .. } | Self::NotFound { .. } => {
                "The item no longer exists on the controller. Refresh and try again.".into()
            }
            Self::Rejected {
                status: 422,
                message,
            } => format!("The controller rejected the change: {message}"),
            Self::Rejected { message, .. } => format!("The change could not be saved: {message}"),
            Self::SessionExpired | Self::AuthenticationFailed { .. } => {
                "Your session has expired. Sign in again.".into()
            }
            Self::Timeout { .. } | Self::ConnectionFailed { .. } => {
                "The controller did not respond. Check the connection and retry.".into()
            }
            other => other.to_string(),
        }
    }

    /// Reclassify an API failure that happened during a write, where
    /// 403/404/422 mean the change itself was refused.
    pub(crate) fn from_write(err: xpone_api::Error) -> Self {
        match err {
            xpone_api::Error::Api {
                status: status @ (400 | 403 | 404 | 409 | 422),
                message,
                ..
            } => Self::Rejected { status, message },
            other => other.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<xpone_api::Error> for CoreError {
    fn from(err: xpone_api::Error) -> Self {
        match err {
            xpone_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            xpone_api::Error::SessionExpired | xpone_api::Error::NotAuthenticated => {
                CoreError::SessionExpired
            }
            xpone_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e.url().map(ToString::to_string).unwrap_or_default(),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            xpone_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            xpone_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            xpone_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            xpone_api::Error::Api {
                status,
                message,
                code,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            xpone_api::Error::SuppressedAnalytics { capability } => {
                CoreError::Suppressed { capability }
            }
            xpone_api::Error::CapabilityUnavailable { capability, .. } => {
                CoreError::EndpointUnavailable {
                    endpoint: capability,
                }
            }
            xpone_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
