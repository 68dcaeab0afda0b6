// OAuth2 token session
//
// Password-grant login, refresh-token rotation, and logout against
// `{base}/v1/oauth2/token`. The resulting token pair is held by the
// client and attached to every subsequent request as a bearer token.

use chrono::Utc;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::auth::{Credentials, TokenPair};
use crate::client::PlatformClient;
use crate::error::Error;

const TOKEN_PATH: &str = "v1/oauth2/token";

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    idle_timeout: Option<i64>,
}

impl TokenResponse {
    fn into_pair(self) -> TokenPair {
        TokenPair::new(
            SecretString::from(self.access_token),
            self.refresh_token.map(SecretString::from),
            self.expires_in,
            self.idle_timeout,
            Utc::now(),
        )
    }
}

impl PlatformClient {
    /// Exchange credentials for a token pair and store it.
    ///
    /// `POST {base}/v1/oauth2/token` with
    /// `{"grantType": "password", "userId": ..., "password": ..., "scope": ...}`
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, Error> {
        let url = self.url(TOKEN_PATH)?;
        debug!(user = %credentials.user_id, "requesting access token");

        let mut body = json!({
            "grantType": "password",
            "userId": credentials.user_id,
            "password": credentials.password.expose_secret(),
        });
        if let Some(ref scope) = credentials.scope {
            body["scope"] = json!(scope);
        }

        let resp = self.send(Method::POST, url, Some(&body), None, None).await?;
        if !resp.ok() {
            let status = resp.status();
            let detail = match resp.error_for_status() {
                Err(Error::Api { message, .. }) => message,
                _ => String::new(),
            };
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {detail}"),
            });
        }

        let tokens = resp.json::<TokenResponse>()?.into_pair();
        *self.session.write().await = Some(tokens.clone());

        debug!("login successful");
        Ok(tokens)
    }

    /// Trade the stored refresh token for a new token pair.
    ///
    /// On failure the session is cleared, so the next request goes out
    /// unauthenticated rather than with a dead token.
    pub async fn refresh(&self) -> Result<TokenPair, Error> {
        let _flight = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Refresh on behalf of a request whose access token was `rejected`.
    ///
    /// Callers queue on the refresh lock. One that finds the session has
    /// already moved past `rejected` reuses the new pair instead of
    /// spending the (rotated, now invalid) refresh token again.
    pub(crate) async fn refresh_after(&self, rejected: &str) -> Result<(), Error> {
        let _flight = self.refresh_lock.lock().await;
        let superseded = self
            .session
            .read()
            .await
            .as_ref()
            .is_some_and(|t| t.access_token.expose_secret() != rejected && !t.is_expired());
        if superseded {
            debug!("session already refreshed by a concurrent request");
            return Ok(());
        }
        self.refresh_locked().await.map(|_| ())
    }

    /// The refresh exchange itself. Caller holds `refresh_lock`.
    async fn refresh_locked(&self) -> Result<TokenPair, Error> {
        let current = {
            let guard = self.session.read().await;
            guard.as_ref().and_then(|t| {
                t.refresh_token.as_ref().map(|r| {
                    (
                        t.access_token.expose_secret().to_owned(),
                        r.expose_secret().to_owned(),
                    )
                })
            })
        };
        let Some((access, refresh_token)) = current else {
            return Err(Error::NotAuthenticated);
        };

        let url = self.url(TOKEN_PATH)?;
        debug!("refreshing access token");

        let body = json!({
            "grantType": "refresh_token",
            "refreshToken": refresh_token,
        });

        let resp = self.send(Method::POST, url, Some(&body), None, None).await?;
        if !resp.ok() {
            self.clear_session_if(&access).await;
            return Err(Error::SessionExpired);
        }

        let mut tokens = resp.json::<TokenResponse>()?.into_pair();
        // Some firmware omits the refresh token on rotation; keep the old one.
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(SecretString::from(refresh_token));
        }
        *self.session.write().await = Some(tokens.clone());

        debug!("access token refreshed");
        Ok(tokens)
    }

    /// Revoke the current access token and forget the session.
    ///
    /// `DELETE {base}/v1/oauth2/token/{access_token}`. The local session is
    /// cleared even if the controller rejects the revocation.
    pub async fn logout(&self) -> Result<(), Error> {
        let access = self
            .session
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.expose_secret().to_owned());
        let Some(access) = access else {
            return Ok(());
        };

        let url = self.url_from_segments(&["v1", "oauth2", "token", &access])?;
        debug!("revoking access token");
        let result = self
            .send(Method::DELETE, url, None, None, Some(&access))
            .await;
        self.clear_session().await;

        result?.error_for_status()?;
        debug!("logout complete");
        Ok(())
    }
}
