// ── Runtime connection configuration ──
//
// Describes how to reach one controller. Carries credentials and tuning but
// never touches disk; `xpone-config` builds it from profiles.

use std::time::Duration;

use xpone_api::{ApiBase, Credentials, TlsMode, TransportConfig};

/// Everything [`Dashboard::connect`](crate::Dashboard::connect) needs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Controller URL, e.g. `https://xcc.example.com:5825`.
    pub controller: String,
    pub api_base: ApiBase,
    /// `None` connects without logging in (pre-issued session or open lab box).
    pub credentials: Option<Credentials>,
    pub tls: TlsMode,
    /// Default per-request timeout.
    pub timeout: Duration,
    /// Lifetime of cached list responses.
    pub cache_ttl: Duration,
    /// Auto-refresh period. `Duration::ZERO` disables it.
    pub refresh_interval: Duration,
}

impl ClientConfig {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            api_base: ApiBase::default(),
            credentials: None,
            tls: TlsMode::default(),
            timeout: Duration::from_secs(15),
            cache_ttl: crate::cache::DEFAULT_TTL,
            refresh_interval: Duration::from_secs(30),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
