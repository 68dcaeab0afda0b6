use thiserror::Error;

/// Marker carried in the message of [`Error::SuppressedAnalytics`].
///
/// Callers that only pattern-match on error text (log filters, UI layers)
/// can look for this string to recognise the class of errors that should
/// be swallowed rather than shown.
pub const SUPPRESSED_ANALYTICS_ERROR: &str = "SUPPRESSED_ANALYTICS_ERROR";

/// Top-level error type for the `xpone-api` crate.
///
/// Covers authentication, transport, HTTP status, and payload failures.
/// `xpone-core` maps these into its own classified [`CoreError`].
///
/// Note that a non-2xx response is *not* an error at this layer:
/// [`PlatformClient::request`](crate::PlatformClient::request) resolves
/// with an [`ApiResponse`](crate::ApiResponse) whose `ok()` is `false`.
/// [`Error::Api`] only appears once a caller asks for a successful body.
///
/// [`CoreError`]: https://docs.rs/xpone-core
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token exchange rejected (bad credentials, locked account, ...).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The access token was rejected and could not be refreshed.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// An operation needing a session was attempted before `login()`.
    #[error("Not authenticated -- login required")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake, certificate, or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The controller answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// An analytics or report endpoint this controller does not expose.
    #[error("SUPPRESSED_ANALYTICS_ERROR: {capability} is not available on this controller")]
    SuppressedAnalytics { capability: String },

    /// Every candidate path for a capability failed.
    #[error("No endpoint available for {capability} (tried {tried} candidates)")]
    CapabilityUnavailable { capability: String, tried: usize },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::NotAuthenticated | Self::Api { status: 401, .. }
        )
    }

    /// Returns `true` if this is a transient error worth a manual retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if the endpoint or entity does not exist on this controller.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status, .. } => matches!(status, 404 | 405 | 501),
            Self::CapabilityUnavailable { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` for the intentionally-swallowed analytics class.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::SuppressedAnalytics { .. })
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_mentions_timed_out() {
        let err = Error::Timeout { timeout_secs: 5 };
        assert!(err.to_string().contains("timed out"));
        assert!(err.is_transient());
    }

    #[test]
    fn session_expired_message_is_matchable() {
        let err = Error::SessionExpired;
        assert!(err.to_string().contains("Session expired"));
        assert!(err.is_auth_expired());
    }

    #[test]
    fn suppressed_analytics_carries_marker() {
        let err = Error::SuppressedAnalytics {
            capability: "ap report".into(),
        };
        assert!(err.to_string().contains(SUPPRESSED_ANALYTICS_ERROR));
        assert!(err.is_suppressed());
        assert!(!err.is_transient());
    }

    #[test]
    fn not_found_covers_missing_endpoints() {
        for status in [404, 405, 501] {
            let err = Error::Api {
                status,
                message: String::new(),
                code: None,
            };
            assert!(err.is_not_found(), "status {status} should be not-found");
        }
        let err = Error::Api {
            status: 422,
            message: String::new(),
            code: None,
        };
        assert!(!err.is_not_found());
        assert_eq!(err.status(), Some(422));
    }
}
