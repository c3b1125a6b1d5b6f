//! Translate the active profile plus `GlobalOpts` overrides into a
//! `fmc_core::ConnectionConfig`.
//!
//! Core never sees profiles or flags; this is the single boundary where
//! CLI types cross into core types.

use std::time::Duration;

use secrecy::SecretString;

use fmc_config::{Config, Profile};
use fmc_core::{ConnectionConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Flag > env > profile, for every connection setting.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    config: &Config,
) -> Result<ConnectionConfig, CliError> {
    let url_str = global.url.as_deref().unwrap_or(&profile.url);
    let url = parse_url(url_str)?;

    let username = match global.username {
        Some(ref user) => user.clone(),
        None => fmc_config::resolve_username(profile, profile_name)?,
    };
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => fmc_config::resolve_password(profile, profile_name)?,
    };

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        fmc_config::profile_tls(profile)
    };

    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(ConnectionConfig {
        url,
        username,
        password,
        domain: global.domain.clone().or_else(|| profile.domain.clone()),
        tls,
        timeout: Duration::from_secs(timeout),
    })
}

/// Build a `ConnectionConfig` from the config file, profile, and CLI overrides.
pub fn build_connection_config(global: &GlobalOpts) -> Result<ConnectionConfig, CliError> {
    let cfg = fmc_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global, &cfg);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile -- build from flags / env vars alone.
    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: fmc_config::config_path().display().to_string(),
    })?;
    let (Some(username), Some(password)) = (global.username.clone(), global.password.clone()) else {
        return Err(CliError::NoCredentials { profile: profile_name });
    };

    Ok(ConnectionConfig {
        url: parse_url(url_str)?,
        username,
        password: SecretString::from(password),
        domain: global.domain.clone(),
        tls: TlsVerification::DangerAcceptInvalid,
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
    })
}

pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

fn parse_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str
        .parse()
        .map_err(|_| CliError::validation(format!("url: invalid URL: {url_str}")))
}
