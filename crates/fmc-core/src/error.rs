// ── Core error types ──
//
// User-facing errors from fmc-core. Three of them are the terminal outcomes a
// lifecycle operation can end in: a client (transport/HTTP) failure, a name
// that matched nothing, or a feature the connected FMC is too old for.
// The `From<fmc_api::Error>` impl translates transport-layer errors.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Client errors ────────────────────────────────────────────────
    #[error("Failed to communicate with FMC: {message}")]
    Client {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Failed to find {resource} with name '{name}'")]
    NotFoundByName { resource: String, name: String },

    #[error("{resource} with id '{id}' does not exist")]
    NotFound { resource: String, id: String },

    // ── Version gating ───────────────────────────────────────────────
    #[error("{feature} requires FMC {required} or later, connected to {actual}")]
    UnsupportedVersion {
        feature: String,
        required: String,
        actual: String,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid configuration: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Diagnostic title shown ahead of the detail message.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Client { .. }
            | Self::AuthenticationFailed { .. }
            | Self::NotFoundByName { .. }
            | Self::NotFound { .. } => "Client Error",
            Self::UnsupportedVersion { .. } => "UnsupportedVersion",
            Self::Validation { .. } | Self::Config { .. } => "Invalid Configuration",
            Self::Internal(_) => "Internal Error",
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fmc_api::Error> for CoreError {
    fn from(err: fmc_api::Error) -> Self {
        match err {
            fmc_api::Error::Authentication { message } => CoreError::AuthenticationFailed { message },
            fmc_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            fmc_api::Error::UnknownDomain { name } => CoreError::Config {
                message: format!("domain '{name}' is not available to this user"),
            },
            fmc_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fmc_api::Error::Tls(msg) => CoreError::Client {
                message: format!("TLS error: {msg}"),
                status: None,
            },
            fmc_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            other => CoreError::Client {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_to_client_error() {
        let err: CoreError = fmc_api::Error::Api {
            message: "boom".into(),
            status: 500,
        }
        .into();
        assert!(matches!(err, CoreError::Client { status: Some(500), .. }));
        assert_eq!(err.summary(), "Client Error");
    }

    #[test]
    fn not_found_by_name_is_a_client_error() {
        let err = CoreError::NotFoundByName {
            resource: "fmc_security_zone".into(),
            name: "outside".into(),
        };
        assert_eq!(err.summary(), "Client Error");
        assert!(err.to_string().contains("'outside'"));
    }

    #[test]
    fn unsupported_version_summary() {
        let err = CoreError::UnsupportedVersion {
            feature: "CertificateMap".into(),
            required: "7.2.0".into(),
            actual: "7.0.1".into(),
        };
        assert_eq!(err.summary(), "UnsupportedVersion");
    }
}
