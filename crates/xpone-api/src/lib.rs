// xpone-api: Async Rust client for the Extreme Platform ONE controller REST API

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod probe;
pub mod session;
pub mod transport;

pub use auth::{ApiBase, Credentials, TokenPair};
pub use client::{ApiResponse, PlatformClient};
pub use error::{Error, SUPPRESSED_ANALYTICS_ERROR};
pub use probe::{Candidate, Capability, Probed};
pub use transport::{TlsMode, TransportConfig};

/// HTTP method re-export so callers of [`PlatformClient::request`] don't
/// need a direct `reqwest` dependency.
pub use reqwest::Method;
