//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Password, Select};

use fmc_config::{self as config_file, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation(format!("interactive: prompt failed: {e}"))
}

fn profile_not_found(cfg: &Config, name: &str) -> CliError {
    CliError::ProfileNotFound {
        name: name.into(),
        available: config::available_profiles(cfg),
    }
}

/// Config as JSON with every plaintext password masked.
fn redacted(cfg: &Config) -> Result<serde_json::Value, CliError> {
    let mut value =
        serde_json::to_value(cfg).map_err(|e| CliError::Internal(format!("serialization failed: {e}")))?;
    if let Some(profiles) = value.get_mut("profiles").and_then(|p| p.as_object_mut()) {
        for profile in profiles.values_mut() {
            if let Some(pw) = profile.get_mut("password").filter(|pw| !pw.is_null()) {
                *pw = serde_json::Value::from(MASK);
            }
        }
    }
    Ok(value)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config_file::load_config()?;
            let out = output::render_state(&global.output, &redacted(&cfg)?)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_file::config_path().display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config_file::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;

            config_file::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config_file::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: fmc config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config_file::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, &name));
            }
            cfg.default_profile = Some(name.clone());
            config_file::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config_file::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(&cfg, &profile_name));
            }

            let secret = Password::new()
                .with_prompt("Password")
                .interact()
                .map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::validation("password: value cannot be empty"));
            }

            config_file::store_password(&profile_name, &secret)?;
            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "url" => profile.url = value,
        "username" => profile.username = Some(value),
        "domain" => profile.domain = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| CliError::validation("insecure: must be 'true' or 'false'"))?,
            );
        }
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| CliError::validation("timeout: must be a number (seconds)"))?,
            );
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(CliError::validation(format!(
                "unknown config key '{other}'. Valid keys: url, username, domain, \
                 password_env, insecure, timeout, ca_cert"
            )));
        }
    }
    Ok(())
}

/// Interactive wizard.
fn init() -> Result<(), CliError> {
    let config_path = config_file::config_path();
    eprintln!("FMC CLI configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let url: String = Input::new()
        .with_prompt("FMC URL")
        .default("https://fmc.example.com".into())
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("API username")
        .interact_text()
        .map_err(prompt_err)?;

    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(prompt_err)?;
    if username.is_empty() || password.is_empty() {
        return Err(CliError::validation("credentials: username and password cannot be empty"));
    }

    let store_choices = &[
        "Store password in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let password_field = if store_selection == 0 {
        config_file::store_password(&profile_name, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        None
    } else {
        Some(password)
    };

    let domain: String = Input::new()
        .with_prompt("Domain (empty for the session default)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let insecure = Confirm::new()
        .with_prompt("Accept the FMC's self-signed certificate?")
        .default(true)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        url,
        username: Some(username),
        password: password_field,
        domain: (!domain.is_empty()).then_some(domain),
        insecure: Some(insecure),
        ..Profile::default()
    };

    let mut cfg = config_file::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config_file::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: fmc version");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn redacts_plaintext_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                url: "https://fmc.lab".into(),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        let value = redacted(&cfg).unwrap();
        assert_eq!(value["profiles"]["lab"]["password"], MASK);
        assert!(!value.to_string().contains("hunter2"));
    }

    #[test]
    fn set_key_validates_values() {
        let mut profile = Profile::default();
        set_key(&mut profile, "timeout", "30".into()).unwrap();
        assert_eq!(profile.timeout, Some(30));
        assert!(set_key(&mut profile, "insecure", "maybe".into()).is_err());
        assert!(set_key(&mut profile, "colour", "red".into()).is_err());
    }
}
