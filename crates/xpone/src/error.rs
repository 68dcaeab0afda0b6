//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use xpone_config::ConfigError;
use xpone_core::CoreError;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(xpone::connection_failed),
        help(
            "{reason}\n\
             Check that the controller is reachable. For a self-signed\n\
             certificate, try --insecure (-k) or set ca_cert in the profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(xpone::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(xpone::auth_failed),
        help(
            "Verify the username and password for this profile.\n\
             Store a new password with: xpone config init"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(xpone::no_credentials),
        help(
            "Run: xpone config init\n\
             Or set the XPONE_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("{message}")]
    #[diagnostic(code(xpone::permission_denied))]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(xpone::not_found),
        help("Run: xpone {list_command} to see what the controller reports")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("This controller does not expose {endpoint}")]
    #[diagnostic(
        code(xpone::unavailable),
        help("The endpoint is missing on this firmware release.")
    )]
    Unavailable { endpoint: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(xpone::rejected))]
    Rejected { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(xpone::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(xpone::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(xpone::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: xpone config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(xpone::no_config),
        help(
            "Pass --controller <URL>, or create a profile with: xpone config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(xpone::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("Could not render output: {0}")]
    #[diagnostic(code(xpone::render))]
    Render(String),

    #[error("Interactive prompt failed: {0}")]
    #[diagnostic(code(xpone::prompt))]
    Prompt(#[from] dialoguer::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } | Self::Unavailable { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

fn list_command(entity_type: &str) -> &'static str {
    match entity_type {
        "access point" => "aps list",
        "service" => "services list",
        "site" => "sites list",
        _ => "stations list",
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::SessionExpired => Self::AuthFailed {
                message: "session expired".into(),
            },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                resource_type: entity_type.into(),
                identifier,
                list_command: list_command(entity_type).into(),
            },
            CoreError::EndpointUnavailable { endpoint } => Self::Unavailable { endpoint },
            ref rejected @ CoreError::Rejected { status: 403, .. } => Self::PermissionDenied {
                message: rejected.user_message(),
            },
            ref rejected @ CoreError::Rejected { .. } => Self::Rejected {
                message: rejected.user_message(),
            },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
            other => Self::Api {
                message: other.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Render(err.to_string())
    }
}
