//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fmc_config::ConfigError;
use fmc_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Client ───────────────────────────────────────────────────────

    #[error("Client Error: {message}")]
    #[diagnostic(code(fmc::client_error))]
    Client { message: String, status: Option<u16> },

    #[error("Client Error: authentication failed")]
    #[diagnostic(
        code(fmc::auth_failed),
        help(
            "{message}\n\
             Verify the username and password, e.g.: fmc config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("Client Error: {message}")]
    #[diagnostic(
        code(fmc::not_found),
        help("Names are matched exactly and case-sensitively within the domain.")
    )]
    NotFound { message: String },

    // ── Version gating ───────────────────────────────────────────────

    #[error("UnsupportedVersion: {feature} requires FMC {required} or later")]
    #[diagnostic(
        code(fmc::unsupported_version),
        help("Connected to FMC {actual}. Run: fmc version")
    )]
    UnsupportedVersion {
        feature: String,
        required: String,
        actual: String,
    },

    // ── Input ────────────────────────────────────────────────────────

    #[error("Invalid Configuration: {message}")]
    #[diagnostic(code(fmc::validation))]
    Validation { message: String },

    #[error("Failed to read state document {path}")]
    #[diagnostic(code(fmc::state_document), help("{reason}"))]
    StateDocument { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(fmc::no_credentials),
        help(
            "Configure credentials with: fmc config init\n\
             Or set FMC_USERNAME and FMC_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fmc::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fmc config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(fmc::no_config),
        help(
            "Create one with: fmc config init\n\
             Expected at: {path}\n\
             Or pass --url, --username and --password."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(fmc::config))]
    Config(String),

    // ── Internal ─────────────────────────────────────────────────────

    #[error("Internal Error: {0}")]
    #[diagnostic(code(fmc::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::Client { status: Some(404), .. } => exit_code::NOT_FOUND,
            Self::UnsupportedVersion { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Client { message, status } => CliError::Client { message, status },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            e @ (CoreError::NotFoundByName { .. } | CoreError::NotFound { .. }) => CliError::NotFound {
                message: e.to_string(),
            },
            CoreError::UnsupportedVersion {
                feature,
                required,
                actual,
            } => CliError::UnsupportedVersion {
                feature,
                required,
                actual,
            },
            CoreError::Validation { message } => CliError::Validation { message },
            CoreError::Config { message } => CliError::Config(message),
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation {
                message: format!("{field}: {reason}"),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_summary() {
        let err = CliError::from(CoreError::NotFoundByName {
            resource: "fmc_security_zone".into(),
            name: "outside".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(err.to_string().starts_with("Client Error"));
        assert!(err.to_string().contains("'outside'"));

        let err = CliError::from(CoreError::UnsupportedVersion {
            feature: "CertificateMap".into(),
            required: "7.2.0".into(),
            actual: "7.0.1".into(),
        });
        assert_eq!(err.exit_code(), exit_code::UNSUPPORTED);
        assert!(err.to_string().starts_with("UnsupportedVersion"));
    }

    #[test]
    fn config_errors_map_to_cli_errors() {
        let err = CliError::from(ConfigError::NoCredentials { profile: "lab".into() });
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err = CliError::from(ConfigError::Validation {
            field: "url".into(),
            reason: "invalid URL".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
