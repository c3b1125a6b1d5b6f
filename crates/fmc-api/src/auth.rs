// Token authentication
//
// FMC issues an access/refresh token pair from
// `POST /api/fmc_platform/v1/auth/generatetoken` (HTTP basic auth). The
// response carries everything in headers: the tokens, the default domain
// UUID, and a JSON list of every domain the user may address.

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::HeaderMap;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

pub const ACCESS_TOKEN_HEADER: &str = "x-auth-access-token";
pub const REFRESH_TOKEN_HEADER: &str = "x-auth-refresh-token";
const DOMAIN_UUID_HEADER: &str = "domain_uuid";
const DOMAINS_HEADER: &str = "domains";

/// Tokens expire after 30 minutes; refresh a little early.
const TOKEN_LIFETIME: TimeDelta = TimeDelta::minutes(25);

/// FMC allows three refreshes before a fresh token must be generated.
const MAX_REFRESHES: u8 = 3;

/// Username/password pair used for token generation.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// An FMC domain as advertised by the `DOMAINS` login header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub uuid: Uuid,
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub default_domain: Uuid,
    pub domains: Vec<Domain>,
    pub acquired_at: DateTime<Utc>,
    pub refresh_count: u8,
}

impl Session {
    /// Parse a session from the `generatetoken` / `refreshtoken` response headers.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, Error> {
        let header = |name: &str| -> Result<String, Error> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
                .ok_or_else(|| Error::Authentication {
                    message: format!("login response is missing the {name} header"),
                })
        };

        let access_token = header(ACCESS_TOKEN_HEADER)?;
        let refresh_token = header(REFRESH_TOKEN_HEADER)?;
        let default_domain =
            header(DOMAIN_UUID_HEADER)?
                .parse::<Uuid>()
                .map_err(|e| Error::Authentication {
                    message: format!("invalid {DOMAIN_UUID_HEADER} header: {e}"),
                })?;

        // DOMAINS is optional on single-domain appliances.
        let domains = match headers.get(DOMAINS_HEADER).and_then(|v| v.to_str().ok()) {
            Some(raw) => serde_json::from_str(raw).map_err(|e| Error::Deserialization {
                message: format!("invalid {DOMAINS_HEADER} header: {e}"),
                body: raw.to_owned(),
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            access_token,
            refresh_token,
            default_domain,
            domains,
            acquired_at: Utc::now(),
            refresh_count: 0,
        })
    }

    /// Resolve a domain name to its UUID. `None` selects the default domain.
    pub fn domain_uuid(&self, name: Option<&str>) -> Result<Uuid, Error> {
        let Some(name) = name else {
            return Ok(self.default_domain);
        };
        self.domains
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.uuid)
            .ok_or_else(|| Error::UnknownDomain { name: name.into() })
    }

    /// True once the access token is close to its 30 minute expiry.
    pub fn is_stale(&self) -> bool {
        Utc::now() - self.acquired_at >= TOKEN_LIFETIME
    }

    /// True while the refresh token may still be used.
    pub fn can_refresh(&self) -> bool {
        self.refresh_count < MAX_REFRESHES
    }
}
