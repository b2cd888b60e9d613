//! Credentials and IAM token handling.
//!
//! Basic and bearer credentials are static and become a default header on
//! the HTTP client. IAM credentials are exchanged for short-lived access
//! tokens, cached until 80% of their lifetime has passed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use moka::Expiry;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::api;
use crate::error::{ClientError, ClientResult, ValidationError};

/// How requests to a service are authenticated.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Authenticator {
    /// Send no credentials.
    #[default]
    NoAuth,
    /// HTTP basic authentication.
    Basic { username: String, password: String },
    /// A caller-managed bearer token.
    BearerToken(String),
    /// An IBM Cloud API key exchanged for IAM access tokens.
    Iam {
        api_key: String,
        /// Token endpoint; defaults to [`api::IAM_URL`].
        url: Option<String>,
    },
}

impl Authenticator {
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic { username: username.into(), password: password.into() }
    }

    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    #[must_use]
    pub fn iam(api_key: impl Into<String>) -> Self {
        Self::Iam { api_key: api_key.into(), url: None }
    }

    /// Short name used in logs and the `*_AUTH_TYPE` variable.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoAuth => "noauth",
            Self::Basic { .. } => "basic",
            Self::BearerToken(_) => "bearertoken",
            Self::Iam { .. } => "iam",
        }
    }

    /// Reject empty credentials and ones still wrapped in braces or quotes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::NoAuth => Ok(()),
            Self::Basic { username, password } => {
                check_credential("username", username)?;
                check_credential("password", password)
            }
            Self::BearerToken(token) => check_credential("bearer_token", token),
            Self::Iam { api_key, .. } => check_credential("apikey", api_key),
        }
    }

    /// Static `Authorization` header value, if this authenticator has one.
    pub(crate) fn static_header(&self) -> Option<String> {
        match self {
            Self::Basic { username, password } => {
                Some(format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))))
            }
            Self::BearerToken(token) => Some(format!("Bearer {token}")),
            Self::NoAuth | Self::Iam { .. } => None,
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAuth => f.write_str("NoAuth"),
            Self::Basic { username, .. } => {
                f.debug_struct("Basic").field("username", username).finish()
            }
            Self::BearerToken(_) => f.write_str("BearerToken(..)"),
            Self::Iam { url, .. } => f.debug_struct("Iam").field("url", url).finish(),
        }
    }
}

pub(crate) fn check_credential(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::invalid(field, "cannot be empty"));
    }
    if has_bad_wrapping(value) {
        return Err(ValidationError::invalid(
            field,
            "must not start or end with curly brackets or quotes; remove them from your credentials",
        ));
    }
    Ok(())
}

pub(crate) fn has_bad_wrapping(value: &str) -> bool {
    let bad = |c: char| c == '{' || c == '}' || c == '"';
    value.starts_with(bad) || value.ends_with(bad)
}

/// Token returned by the IAM token endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IamToken {
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,

    #[serde(default)]
    pub token_type: Option<String>,

    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: u64,

    /// Expiry as a Unix timestamp.
    #[serde(default)]
    pub expiration: Option<i64>,
}

impl IamToken {
    /// How long the token is used before a refresh is forced.
    #[must_use]
    pub fn refresh_after(&self) -> Duration {
        Duration::from_secs_f64(self.expires_in as f64 * api::IAM_REFRESH_FRACTION)
    }
}

struct RefreshWindow;

impl Expiry<&'static str, Arc<IamToken>> for RefreshWindow {
    fn expire_after_create(
        &self,
        _key: &&'static str,
        token: &Arc<IamToken>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(token.refresh_after())
    }
}

const TOKEN_KEY: &str = "access_token";

/// Exchanges an API key for IAM access tokens and caches the result.
///
/// Concurrent callers share a single in-flight exchange.
#[derive(Clone)]
pub struct IamTokenManager {
    http: Client,
    api_key: String,
    url: String,
    cache: Cache<&'static str, Arc<IamToken>>,
}

impl IamTokenManager {
    #[must_use]
    pub fn new(http: Client, api_key: impl Into<String>, url: Option<String>) -> Self {
        let cache = Cache::builder().max_capacity(1).expire_after(RefreshWindow).build();
        Self {
            http,
            api_key: api_key.into(),
            url: url.unwrap_or_else(|| api::IAM_URL.to_string()),
            cache,
        }
    }

    /// Current access token, requesting a new one if the cached token is stale.
    pub async fn token(&self) -> ClientResult<String> {
        let token = self
            .cache
            .try_get_with(TOKEN_KEY, self.request_token())
            .await
            .map_err(|err| ClientError::auth(err.to_string()))?;
        Ok(token.access_token.clone())
    }

    /// Drop the cached token so the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        self.cache.invalidate(TOKEN_KEY).await;
    }

    async fn request_token(&self) -> ClientResult<Arc<IamToken>> {
        let form = [
            ("grant_type", api::IAM_GRANT_TYPE),
            ("apikey", self.api_key.as_str()),
            ("response_type", "cloud_iam"),
        ];

        let response = self
            .http
            .post(&self.url)
            .basic_auth(api::IAM_CLIENT_ID, Some(api::IAM_CLIENT_SECRET))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "IAM token request rejected");
            return Err(ClientError::auth(format!("IAM returned {status}: {body}")));
        }

        let token: IamToken = response.json().await?;
        tracing::info!(expires_in = token.expires_in, "Obtained IAM access token");
        Ok(Arc::new(token))
    }
}

impl std::fmt::Debug for IamTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamTokenManager").field("url", &self.url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header_is_base64() {
        let auth = Authenticator::basic("user", "pass");
        assert_eq!(auth.static_header().as_deref(), Some("Basic dXNlcjpwYXNz"));
        assert_eq!(Authenticator::bearer("t").static_header().as_deref(), Some("Bearer t"));
        assert!(Authenticator::iam("k").static_header().is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let debug = format!("{:?}", Authenticator::basic("user", "hunter2"));
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));

        let debug = format!("{:?}", Authenticator::iam("secret-key"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_wrapped_credentials_rejected() {
        assert!(Authenticator::iam("{key}").validate().is_err());
        assert!(Authenticator::basic("\"user\"", "pw").validate().is_err());
        assert!(Authenticator::bearer("").validate().is_err());
        assert!(Authenticator::iam("abc123").validate().is_ok());
    }

    #[test]
    fn test_refresh_window_is_eighty_percent() {
        let token = IamToken { expires_in: 3600, ..Default::default() };
        assert_eq!(token.refresh_after(), Duration::from_secs(2880));
    }
}
