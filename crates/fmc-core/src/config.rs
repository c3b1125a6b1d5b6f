// ── Runtime connection configuration ──
//
// Describes how to reach an FMC. Carries credential data and connection
// tuning but never touches disk; the CLI builds a `ConnectionConfig` from its
// profile and hands it to `Provider::connect`.

use std::path::PathBuf;
use std::time::Duration;

use fmc_api::{Credentials, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. FMC ships with a self-signed certificate.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single FMC.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// FMC URL (e.g., `https://fmc.example.com`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Domain name to address by default; `None` uses the login default.
    pub domain: Option<String>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ConnectionConfig {
    pub(crate) fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone().into(),
            timeout: self.timeout,
        }
    }
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}
