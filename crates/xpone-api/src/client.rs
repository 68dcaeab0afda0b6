// Platform ONE HTTP client
//
// Wraps `reqwest::Client` with base-path selection (direct vs proxied),
// bearer-token attachment, transparent token refresh, and per-request
// timeouts. Endpoint modules (session, endpoints, probe) are implemented
// as inherent methods in separate files to keep this one about transport.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use url::Url;

use crate::auth::{ApiBase, TokenPair};
use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error body shapes ────────────────────────────────────────────────

/// Controllers report failures as `{"errors":[{"errorMessage": "..."}]}`,
/// older firmware as a flat `{"message": "..."}` or `{"error": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default, alias = "errorCode")]
    code: Option<Value>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEntry {
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    error_code: Option<Value>,
}

fn value_to_code(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

// ── Response ─────────────────────────────────────────────────────────

/// A fully-read HTTP response.
///
/// Non-2xx statuses are represented here with `ok() == false` rather than
/// as an `Err`, so callers can branch on status without error plumbing.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    url: Url,
    body: String,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, url: Url, body: String) -> Self {
        Self { status, url, body }
    }

    /// `true` for any 2xx status.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserialize the body as `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&self.body)),
            body: self.body.clone(),
        })
    }

    /// The body as a JSON value. An empty body is `Value::Null`.
    pub fn value(&self) -> Result<Value, Error> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        self.json()
    }

    /// Convert a non-success response into [`Error::Api`].
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.ok() {
            return Ok(self);
        }

        let status = self.status.as_u16();
        let (message, code) = match serde_json::from_str::<ErrorBody>(&self.body) {
            Ok(parsed) => {
                let first = parsed.errors.into_iter().next();
                let code = first
                    .as_ref()
                    .and_then(|e| e.error_code.as_ref())
                    .or(parsed.code.as_ref())
                    .and_then(value_to_code);
                let message = first
                    .and_then(|e| e.error_message)
                    .or(parsed.message)
                    .or_else(|| parsed.error.as_ref().and_then(value_to_code));
                (message, code)
            }
            Err(_) => (None, None),
        };

        let message = message.unwrap_or_else(|| {
            if self.body.trim().is_empty() {
                self.status.to_string()
            } else {
                preview(&self.body).to_owned()
            }
        });

        Err(Error::Api {
            status,
            message,
            code,
        })
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Platform ONE management API.
///
/// Holds the current [`TokenPair`] and attaches it as a bearer token.
/// An access token past its lifetime is refreshed before the next call;
/// a `401` on an authenticated call triggers one refresh-and-retry.
/// Concurrent requests share a single refresh.
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: Url,
    api_base: ApiBase,
    timeout: Duration,
    pub(crate) session: RwLock<Option<TokenPair>>,
    pub(crate) refresh_lock: Mutex<()>,
}

impl PlatformClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `controller` (e.g. `https://xcc.example.com:5825`).
    pub fn new(
        controller: &str,
        api_base: ApiBase,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, controller, api_base, transport.timeout)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        controller: &str,
        api_base: ApiBase,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(controller, api_base)?;
        Ok(Self {
            http,
            base_url,
            api_base,
            timeout,
            session: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Append the API base prefix unless the URL already carries it.
    ///
    /// Direct: `https://host/management/`
    /// Proxied: `https://host/api/management/`
    fn normalize_base_url(raw: &str, api_base: ApiBase) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        let prefix = api_base.prefix();

        if path.ends_with(prefix) {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}{prefix}/"));
        }

        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_base(&self) -> ApiBase {
        self.api_base
    }

    pub fn default_timeout(&self) -> Duration {
        self.timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a relative path (`"v1/aps"`, `"/v3/sites"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build a URL from individually percent-encoded segments.
    ///
    /// Use this whenever a segment comes from data (serial numbers, ids).
    pub(crate) fn url_from_segments(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Issue an authenticated request against `path`.
    ///
    /// Resolves with the response for every HTTP status; only transport
    /// failures, timeouts, and unrecoverable session expiry are `Err`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<ApiResponse, Error> {
        let url = self.url(path)?;
        self.execute(method, url, body, timeout).await
    }

    /// Authenticated request against a prebuilt URL, with refresh-and-retry.
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<ApiResponse, Error> {
        let bearer = self.current_bearer().await?;
        let resp = self
            .send(method.clone(), url.clone(), body, timeout, bearer.as_deref())
            .await?;

        let Some(rejected) = bearer.filter(|_| resp.status == StatusCode::UNAUTHORIZED) else {
            return Ok(resp);
        };

        debug!("access token rejected, refreshing");
        if let Err(e) = self.refresh_after(&rejected).await {
            debug!(error = %e, "token refresh failed");
            return Err(Error::SessionExpired);
        }

        let Some(bearer) = self.bearer().await else {
            return Err(Error::SessionExpired);
        };
        let retry = self
            .send(method, url, body, timeout, Some(bearer.as_str()))
            .await?;
        if retry.status == StatusCode::UNAUTHORIZED {
            self.clear_session_if(&bearer).await;
            return Err(Error::SessionExpired);
        }
        Ok(retry)
    }

    /// Send one request with an explicit bearer token. No refresh logic.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        timeout: Option<Duration>,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, Error> {
        let timeout = timeout.unwrap_or(self.timeout);
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url.clone()).timeout(timeout);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        };

        let resp = builder.send().await.map_err(map_err)?;
        let status = resp.status();
        let text = resp.text().await.map_err(map_err)?;
        Ok(ApiResponse::new(status, url, text))
    }

    // ── JSON helpers for endpoint modules ────────────────────────────

    pub(crate) async fn get_value(&self, url: Url) -> Result<Value, Error> {
        self.execute(Method::GET, url, None, None)
            .await?
            .error_for_status()?
            .value()
    }

    pub(crate) async fn put_value(&self, url: Url, body: &Value) -> Result<Value, Error> {
        self.execute(Method::PUT, url, Some(body), None)
            .await?
            .error_for_status()?
            .value()
    }

    // ── Session state ────────────────────────────────────────────────

    /// The access token to attach, refreshing first if it has expired.
    async fn current_bearer(&self) -> Result<Option<String>, Error> {
        let (expired, can_refresh) = {
            let guard = self.session.read().await;
            match guard.as_ref() {
                None => return Ok(None),
                Some(tokens) if !tokens.is_expired() => {
                    return Ok(Some(tokens.access_token.expose_secret().to_owned()));
                }
                Some(tokens) => (
                    tokens.access_token.expose_secret().to_owned(),
                    tokens.can_refresh(),
                ),
            }
        };

        if !can_refresh {
            self.clear_session_if(&expired).await;
            return Err(Error::SessionExpired);
        }

        debug!("access token expired, refreshing before request");
        self.refresh_after(&expired).await.map_err(|e| {
            debug!(error = %e, "token refresh failed");
            Error::SessionExpired
        })?;
        match self.bearer().await {
            Some(token) => Ok(Some(token)),
            None => Err(Error::SessionExpired),
        }
    }

    async fn bearer(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.expose_secret().to_owned())
    }

    /// Install a token pair directly (e.g. one restored from disk).
    pub async fn restore_session(&self, tokens: TokenPair) {
        *self.session.write().await = Some(tokens);
    }

    /// A copy of the current token pair, if authenticated.
    pub async fn session(&self) -> Option<TokenPair> {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    pub(crate) async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    /// Forget the session only if it still holds `access`. A pair that
    /// another request installed in the meantime survives.
    pub(crate) async fn clear_session_if(&self, access: &str) {
        let mut guard = self.session.write().await;
        if guard
            .as_ref()
            .is_some_and(|t| t.access_token.expose_secret() == access)
        {
            *guard = None;
        }
    }
}
