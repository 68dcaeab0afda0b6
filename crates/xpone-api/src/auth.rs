use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Where the management API is mounted relative to the controller URL.
///
/// A controller reached directly serves the API under `/management`; the
/// production reverse proxy re-exposes it under `/api/management`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiBase {
    #[default]
    Direct,
    Proxied,
}

impl ApiBase {
    /// The path prefix every endpoint path is appended to.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Direct => "/management",
            Self::Proxied => "/api/management",
        }
    }
}

impl std::str::FromStr for ApiBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "proxied" | "proxy" => Ok(Self::Proxied),
            other => Err(format!("expected 'direct' or 'proxied', got '{other}'")),
        }
    }
}

/// Password-grant credentials exchanged for a token pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password: SecretString,
    pub scope: Option<String>,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, password: SecretString) -> Self {
        Self {
            user_id: user_id.into(),
            password,
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Seconds before nominal expiry at which a token is treated as expired.
const EXPIRY_SKEW_SECS: i64 = 30;

/// Bearer access token plus the optional refresh token issued with it.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub issued_at: DateTime<Utc>,
    /// From `expires_in`. `None` means the controller gave no lifetime.
    pub expires_at: Option<DateTime<Utc>>,
    /// From `idle_timeout`, in seconds.
    pub idle_timeout_secs: Option<i64>,
}

impl TokenPair {
    /// Build a pair from a token response received at `issued_at`.
    pub fn new(
        access_token: SecretString,
        refresh_token: Option<SecretString>,
        expires_in: Option<i64>,
        idle_timeout_secs: Option<i64>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expires_at =
            expires_in.and_then(|secs| issued_at.checked_add_signed(Duration::seconds(secs)));
        Self {
            access_token,
            refresh_token,
            issued_at,
            expires_at,
            idle_timeout_secs,
        }
    }

    /// Whether the access token should be refreshed before use at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|exp| now + Duration::seconds(EXPIRY_SKEW_SECS) >= exp)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(expires_in: Option<i64>) -> (TokenPair, DateTime<Utc>) {
        let now = Utc::now();
        let token = TokenPair::new(
            SecretString::from("access".to_owned()),
            None,
            expires_in,
            Some(900),
            now,
        );
        (token, now)
    }

    #[test]
    fn token_without_lifetime_never_expires() {
        let (token, now) = pair(None);
        assert!(!token.is_expired_at(now + Duration::days(365)));
    }

    #[test]
    fn token_expires_with_skew() {
        let (token, now) = pair(Some(120));
        assert!(!token.is_expired_at(now));
        assert!(token.is_expired_at(now + Duration::seconds(95)));
        assert!(!token.can_refresh());
    }

    #[test]
    fn api_base_prefixes() {
        assert_eq!(ApiBase::Direct.prefix(), "/management");
        assert_eq!(ApiBase::Proxied.prefix(), "/api/management");
        assert_eq!("proxy".parse::<ApiBase>(), Ok(ApiBase::Proxied));
        assert!("cloud".parse::<ApiBase>().is_err());
    }
}
