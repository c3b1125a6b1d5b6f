// Async HTTP client for the Cisco FMC REST API.
//
// Paths are passed in absolute form (`/api/fmc_config/v1/domain/{DOMAIN_UUID}/...`);
// the client substitutes the domain UUID for the selected domain, attaches
// the access token, and maps error bodies into `Error`.

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::{ACCESS_TOKEN_HEADER, Credentials, REFRESH_TOKEN_HEADER, Session};
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{ErrorResponse, Page, ServerVersion, ServerVersionList};

const GENERATE_TOKEN_PATH: &str = "/api/fmc_platform/v1/auth/generatetoken";
const REFRESH_TOKEN_PATH: &str = "/api/fmc_platform/v1/auth/refreshtoken";
const SERVER_VERSION_PATH: &str = "/api/fmc_platform/v1/info/serverversion";

/// Placeholder substituted with the selected domain's UUID.
pub const DOMAIN_PLACEHOLDER: &str = "{DOMAIN_UUID}";

// ── Request modifiers ────────────────────────────────────────────────

/// Per-request options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOpts {
    /// Address a domain other than the client default, by name.
    pub domain: Option<String>,
}

impl RequestOpts {
    pub fn domain(name: impl Into<String>) -> Self {
        Self {
            domain: Some(name.into()),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the FMC REST API.
///
/// Authenticates lazily on first use and re-authenticates once when the
/// access token is rejected.
pub struct FmcClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    default_domain: Option<String>,
    session: RwLock<Option<Session>>,
}

impl FmcClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client that generates tokens from username/password.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            credentials: Some(credentials),
            default_domain: None,
            session: RwLock::new(None),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller supplies a session).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            credentials: None,
            default_domain: None,
            session: RwLock::new(None),
        })
    }

    /// Use an already-established session instead of logging in.
    pub fn with_session(self, session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
            ..self
        }
    }

    /// Domain (by name) used when a request does not pick one.
    pub fn with_default_domain(self, domain: impl Into<String>) -> Self {
        Self {
            default_domain: Some(domain.into()),
            ..self
        }
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Generate a fresh token pair from the configured credentials.
    pub async fn login(&self) -> Result<(), Error> {
        let creds = self.credentials.as_ref().ok_or_else(|| Error::Authentication {
            message: "no credentials configured".into(),
        })?;

        let url = self.join(GENERATE_TOKEN_PATH)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .basic_auth(&creds.username, Some(creds.password.expose_secret()))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token generation failed (HTTP {status}): {body}"),
            });
        }

        let session = Session::from_headers(resp.headers())?;
        info!(
            username = %creds.username,
            domains = session.domains.len(),
            "authenticated with FMC"
        );
        *self.session.write().await = Some(session);
        Ok(())
    }

    /// Exchange the refresh token for a new access token.
    async fn refresh(&self, current: &Session) -> Result<Session, Error> {
        let url = self.join(REFRESH_TOKEN_PATH)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header(ACCESS_TOKEN_HEADER, &current.access_token)
            .header(REFRESH_TOKEN_HEADER, &current.refresh_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::SessionExpired);
        }

        let mut session = Session::from_headers(resp.headers())?;
        session.refresh_count = current.refresh_count + 1;
        if session.domains.is_empty() {
            session.domains.clone_from(&current.domains);
        }
        Ok(session)
    }

    /// Return a usable session, logging in or refreshing as needed.
    async fn ensure_session(&self) -> Result<Option<Session>, Error> {
        let current = self.session.read().await.clone();

        match current {
            Some(session) if !session.is_stale() => Ok(Some(session)),
            Some(session) if self.credentials.is_some() => {
                let renewed = if session.can_refresh() {
                    match self.refresh(&session).await {
                        Ok(s) => s,
                        Err(e) => {
                            warn!(error = %e, "token refresh failed, generating a new token");
                            self.login().await?;
                            return Ok(self.session.read().await.clone());
                        }
                    }
                } else {
                    self.login().await?;
                    return Ok(self.session.read().await.clone());
                };
                *self.session.write().await = Some(renewed.clone());
                Ok(Some(renewed))
            }
            Some(session) => Ok(Some(session)),
            None if self.credentials.is_some() => {
                self.login().await?;
                Ok(self.session.read().await.clone())
            }
            None => Ok(None),
        }
    }

    /// Discard the cached session so the next request logs in again.
    async fn invalidate(&self) {
        *self.session.write().await = None;
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn join(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Substitute `{DOMAIN_UUID}` and join onto the base URL.
    fn url(&self, path: &str, session: Option<&Session>, opts: &RequestOpts) -> Result<Url, Error> {
        if !path.contains(DOMAIN_PLACEHOLDER) {
            return self.join(path);
        }

        let domain_name = opts.domain.as_deref().or(self.default_domain.as_deref());
        let session = session.ok_or(Error::SessionExpired)?;
        let uuid = session.domain_uuid(domain_name)?;
        self.join(&path.replace(DOMAIN_PLACEHOLDER, &uuid.to_string()))
    }

    // ── Request execution ────────────────────────────────────────────

    /// Send a request, re-authenticating once if the token was rejected.
    async fn execute<F>(
        &self,
        method: &Method,
        path: &str,
        opts: &RequestOpts,
        build: F,
    ) -> Result<reqwest::Response, Error>
    where
        F: Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    {
        let mut reauthenticated = false;

        loop {
            let session = self.ensure_session().await?;
            let url = self.url(path, session.as_ref(), opts)?;
            debug!("{method} {url}");

            let mut builder = build(self.http.request(method.clone(), url));
            if let Some(ref s) = session {
                builder = builder.header(ACCESS_TOKEN_HEADER, &s.access_token);
            }

            let resp = builder.send().await?;
            if resp.status() != StatusCode::UNAUTHORIZED {
                return Ok(resp);
            }
            if reauthenticated || self.credentials.is_none() {
                return Err(Error::SessionExpired);
            }

            warn!("access token rejected, re-authenticating");
            self.invalidate().await;
            reauthenticated = true;
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Error::RateLimited { retry_after_secs };
        }

        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message())
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        Error::Api {
            message,
            status: status.as_u16(),
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str, opts: &RequestOpts) -> Result<T, Error> {
        let resp = self.execute(&Method::GET, path, opts, |b| b).await?;
        Self::handle_response(resp).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        opts: &RequestOpts,
    ) -> Result<T, Error> {
        debug!("params={params:?}");
        let resp = self
            .execute(&Method::GET, path, opts, |b| b.query(params))
            .await?;
        Self::handle_response(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        params: &[(&str, String)],
        body: &B,
        opts: &RequestOpts,
    ) -> Result<T, Error> {
        let resp = self
            .execute(&Method::POST, path, opts, |b| b.query(params).json(body))
            .await?;
        Self::handle_response(resp).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        opts: &RequestOpts,
    ) -> Result<T, Error> {
        let resp = self
            .execute(&Method::PUT, path, opts, |b| b.json(body))
            .await?;
        Self::handle_response(resp).await
    }

    pub async fn delete(
        &self,
        path: &str,
        params: &[(&str, String)],
        opts: &RequestOpts,
    ) -> Result<(), Error> {
        let resp = self
            .execute(&Method::DELETE, path, opts, |b| b.query(params))
            .await?;
        Self::handle_empty(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Fetch one page of a collection.
    pub async fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        offset: u64,
        limit: u64,
        expanded: bool,
        opts: &RequestOpts,
    ) -> Result<Page<T>, Error> {
        let mut params = vec![("offset", offset.to_string()), ("limit", limit.to_string())];
        if expanded {
            params.push(("expanded", "true".to_owned()));
        }
        self.get_with_params(path, &params, opts).await
    }

    /// Collect every page of a collection into a single `Vec<T>`.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        limit: u64,
        expanded: bool,
        opts: &RequestOpts,
    ) -> Result<Vec<T>, Error> {
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page: Page<T> = self.list_page(path, offset, limit, expanded, opts).await?;
            let more = page.has_next();
            all.extend(page.items);
            if !more {
                break;
            }
            offset += limit;
        }

        Ok(all)
    }

    /// `GET /api/fmc_platform/v1/info/serverversion`.
    pub async fn server_version(&self) -> Result<ServerVersion, Error> {
        let list: ServerVersionList = self.get(SERVER_VERSION_PATH, &RequestOpts::default()).await?;
        list.items
            .into_iter()
            .next()
            .ok_or_else(|| Error::Deserialization {
                message: "server version response has no items".into(),
                body: String::new(),
            })
    }

    /// Domains advertised by the current session.
    pub async fn domains(&self) -> Result<Vec<crate::auth::Domain>, Error> {
        Ok(self
            .ensure_session()
            .await?
            .map(|s| s.domains)
            .unwrap_or_default())
    }
}
