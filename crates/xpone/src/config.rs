//! CLI configuration: a thin layer over `xpone_config` that applies the
//! `GlobalOpts` flag overrides (--controller, --username, etc.).

use std::path::PathBuf;

use xpone_core::{ApiBase, ClientConfig};

use crate::cli::{ApiBaseArg, GlobalOpts};
use crate::error::CliError;

pub use xpone_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Table layouts and other client preferences live next to the config file.
pub fn preferences_path() -> PathBuf {
    config_path().with_file_name("preferences.json")
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

impl From<ApiBaseArg> for ApiBase {
    fn from(arg: ApiBaseArg) -> Self {
        match arg {
            ApiBaseArg::Direct => Self::Direct,
            ApiBaseArg::Proxied => Self::Proxied,
        }
    }
}

/// The active profile with flag overrides applied.
///
/// Without a stored profile, `--controller` alone is enough to build an
/// ad-hoc one. Naming a profile that does not exist is an error.
pub fn effective_profile(
    global: &GlobalOpts,
    config: &Config,
) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(stored) => stored.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            });
        }
        None => Profile::default(),
    };

    if let Some(controller) = &global.controller {
        profile.controller.clone_from(controller);
    }
    if let Some(username) = &global.username {
        profile.username = Some(username.clone());
    }
    if let Some(api_base) = global.api_base {
        profile.api_base = api_base.into();
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    if profile.controller.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    Ok((name, profile))
}

/// Translate the effective profile into a `ClientConfig`.
pub fn resolve_client_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ClientConfig, CliError> {
    let (name, profile) = effective_profile(global, config)?;
    Ok(xpone_config::profile_to_client_config(
        &profile,
        &name,
        &config.defaults,
    )?)
}

fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
