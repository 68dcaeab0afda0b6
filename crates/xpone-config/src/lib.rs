//! Profile configuration for xpone.
//!
//! TOML profiles merged with `XPONE_` environment variables, password
//! resolution (env, keyring, plaintext), and translation to
//! `xpone_core::ClientConfig`. The CLI layers its flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use xpone_core::{ApiBase, ClientConfig, Credentials, TlsMode};

const KEYRING_SERVICE: &str = "xpone";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Profile `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name.to_owned(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Lifetime of cached list responses, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,

    /// Auto-refresh period in seconds; 0 disables it.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            cache_ttl: default_cache_ttl(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    15
}
fn default_cache_ttl() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller URL (e.g. "https://xcc.example.com:5825").
    pub controller: String,

    /// `direct` (`/management`) or `proxied` (`/api/management`).
    #[serde(default)]
    pub api_base: ApiBase,

    pub username: Option<String>,

    /// Plaintext password. Prefer `password_env` or the keyring.
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    pub password_env: Option<String>,

    /// OAuth scope requested at login.
    pub scope: Option<String>,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid certificates. Overrides `defaults.insecure`.
    pub insecure: Option<bool>,

    /// Request timeout in seconds. Overrides `defaults.timeout`.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "xpone", "xpone").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("xpone");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` plus environment. A missing file yields
/// the defaults. Nested keys use a double underscore in env names, e.g.
/// `XPONE_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("XPONE_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_account(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name))
        .ok()?
        .get_password()
        .ok()
}

/// Save a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Resolve a profile's password: the env var named by `password_env`,
/// then `XPONE_PASSWORD`, then the keyring, then plaintext config.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    let env = |name: &str| std::env::var(name).ok();
    resolve_password_with(profile, profile_name, env, keyring_password)
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    let found = profile
        .password_env
        .as_deref()
        .and_then(&env)
        .or_else(|| env("XPONE_PASSWORD"))
        .or_else(|| keyring(profile_name))
        .or_else(|| profile.password.clone());

    found
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Login credentials for a profile. `None` when the profile has no
/// username, which connects without logging in.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<Credentials>, ConfigError> {
    let Some(username) = profile
        .username
        .clone()
        .or_else(|| std::env::var("XPONE_USERNAME").ok())
    else {
        return Ok(None);
    };

    let password = resolve_password(profile, profile_name)?;
    let mut credentials = Credentials::new(username, password);
    if let Some(scope) = &profile.scope {
        credentials = credentials.with_scope(scope.clone());
    }
    Ok(Some(credentials))
}

/// TLS mode for a profile: insecure wins, then a custom CA, then the
/// system store.
pub fn resolve_tls(profile: &Profile, defaults: &Defaults) -> TlsMode {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    }
}

/// Build a `ClientConfig` from a profile, with no command-line overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let mut config = client_config_without_credentials(profile, defaults)?;
    config.credentials = resolve_credentials(profile, profile_name)?;
    Ok(config)
}

fn client_config_without_credentials(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile
        .controller
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "controller".into(),
            reason: format!("invalid URL: {}", profile.controller),
        })?;

    Ok(ClientConfig {
        controller: url.to_string(),
        api_base: profile.api_base,
        credentials: None,
        tls: resolve_tls(profile, defaults),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        cache_ttl: Duration::from_secs(defaults.cache_ttl),
        refresh_interval: Duration::from_secs(defaults.refresh_interval),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile() -> Profile {
        Profile {
            controller: "https://xcc.example.com:5825".into(),
            username: Some("admin".into()),
            password: Some("plain".into()),
            password_env: Some("LAB_PASSWORD".into()),
            ..Profile::default()
        }
    }

    fn none(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn password_chain_order() {
        let p = profile();
        let env_all = |name: &str| match name {
            "LAB_PASSWORD" => Some("from-profile-env".to_owned()),
            "XPONE_PASSWORD" => Some("from-global-env".to_owned()),
            _ => None,
        };
        let global_only =
            |name: &str| (name == "XPONE_PASSWORD").then(|| "from-global-env".to_owned());
        let keyring = |_: &str| Some("from-keyring".to_owned());

        let resolved = resolve_password_with(&p, "lab", env_all, keyring).unwrap();
        assert_eq!(resolved.expose_secret(), "from-profile-env");

        let resolved = resolve_password_with(&p, "lab", global_only, keyring).unwrap();
        assert_eq!(resolved.expose_secret(), "from-global-env");

        let resolved = resolve_password_with(&p, "lab", none, keyring).unwrap();
        assert_eq!(resolved.expose_secret(), "from-keyring");

        let resolved = resolve_password_with(&p, "lab", none, none).unwrap();
        assert_eq!(resolved.expose_secret(), "plain");
    }

    #[test]
    fn missing_password_is_an_error() {
        let p = Profile {
            password: None,
            password_env: None,
            ..profile()
        };
        let err = resolve_password_with(&p, "lab", none, none).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "lab"));
    }

    #[test]
    fn tls_resolution() {
        let defaults = Defaults::default();
        let mut p = profile();
        assert!(matches!(resolve_tls(&p, &defaults), TlsMode::System));

        p.ca_cert = Some(PathBuf::from("/etc/xpone/ca.pem"));
        assert!(matches!(resolve_tls(&p, &defaults), TlsMode::CustomCa(_)));

        p.insecure = Some(true);
        assert!(matches!(resolve_tls(&p, &defaults), TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn client_config_uses_profile_overrides() {
        let defaults = Defaults::default();
        let p = Profile {
            api_base: ApiBase::Proxied,
            timeout: Some(5),
            ..profile()
        };
        let config = client_config_without_credentials(&p, &defaults).unwrap();
        assert_eq!(config.api_base, ApiBase::Proxied);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.cache_ttl, Duration::from_secs(30));

        let bad = Profile {
            controller: "not a url".into(),
            ..profile()
        };
        assert!(matches!(
            client_config_without_credentials(&bad, &defaults),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xpone").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                api_base: ApiBase::Proxied,
                scope: Some("ops".into()),
                ..profile()
            },
        );
        cfg.default_profile = Some("lab".into());
        save_config_to(&path, &cfg).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("api_base = \"proxied\""));

        let loaded = load_config_from(&path).unwrap();
        let (name, lab) = loaded.profile(None).unwrap();
        assert_eq!(name, "lab");
        assert_eq!(lab.scope.as_deref(), Some("ops"));
        assert_eq!(lab.api_base, ApiBase::Proxied);
    }

    #[test]
    fn missing_file_yields_defaults_and_unknown_profile_errors() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.defaults.timeout, 15);
        assert!(matches!(
            loaded.profile(Some("nope")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }
}
