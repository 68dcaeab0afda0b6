//! Config subcommand handlers.

use std::fmt::Write;

use dialoguer::{Confirm, Input, Password, Select};
use xpone_core::ApiBase;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn api_base_name(base: ApiBase) -> &'static str {
    match base {
        ApiBase::Direct => "direct",
        ApiBase::Proxied => "proxied",
    }
}

/// Format config for display, masking the plaintext password.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "cache_ttl = {}", cfg.defaults.cache_ttl);
    let _ = writeln!(out, "refresh_interval = {}", cfg.defaults.refresh_interval);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "controller = \"{}\"", p.controller);
        let _ = writeln!(out, "api_base = \"{}\"", api_base_name(p.api_base));
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref scope) = p.scope {
            let _ = writeln!(out, "scope = \"{scope}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Prompt for the password and where to keep it. Returns the plaintext
/// only when the user chose to write it into the config file.
fn prompt_password(profile_name: &str) -> Result<Option<String>, CliError> {
    let password = Password::new().with_prompt("Password").interact()?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()?;

    if selection == 0 {
        xpone_config::store_password(profile_name, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

fn run_wizard() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("xpone configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()?;

    let controller: String = Input::new()
        .with_prompt("Controller URL")
        .default("https://xcc.example.com:5825".into())
        .interact_text()?;

    let api_base = match Select::new()
        .with_prompt("API location")
        .items(&["/management (direct)", "/api/management (proxied)"])
        .default(0)
        .interact()?
    {
        0 => ApiBase::Direct,
        _ => ApiBase::Proxied,
    };

    let username: String = Input::new()
        .with_prompt("Username (empty to skip login)")
        .allow_empty(true)
        .interact_text()?;
    let username = Some(username.trim().to_owned()).filter(|u| !u.is_empty());

    let password = match username {
        Some(_) => prompt_password(&profile_name)?,
        None => None,
    };

    let insecure = Confirm::new()
        .with_prompt("Accept self-signed certificates?")
        .default(false)
        .interact()?;

    let profile = Profile {
        controller,
        api_base,
        username,
        password,
        insecure: insecure.then_some(true),
        ..Profile::default()
    };

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    let path = config::save_config(&cfg)?;

    eprintln!("\n   ✓ Profile '{profile_name}' saved to {}", path.display());
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => run_wizard(),
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            if !global.quiet {
                eprintln!("# active profile: {active}");
            }
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_config_masks_password() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                controller: "https://lab:5825".into(),
                api_base: ApiBase::Proxied,
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        let text = format_config_redacted(&cfg);
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("api_base = \"proxied\""));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("hunter2"));
    }
}
