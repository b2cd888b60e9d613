//! Service configuration.

use std::time::Duration;

use crate::auth::{self, Authenticator};
use crate::error::ValidationError;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// IAM token endpoint.
    pub const IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

    /// Grant type for API key exchange.
    pub const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

    /// Client credentials the IAM endpoint expects from SDKs.
    pub const IAM_CLIENT_ID: &str = "bx";
    pub const IAM_CLIENT_SECRET: &str = "bx";

    /// Fraction of a token's lifetime after which it is refreshed.
    pub const IAM_REFRESH_FRACTION: f64 = 0.8;

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum retries for transient failures.
    pub const MAX_RETRIES: u32 = 3;

    /// Backoff bounds between retries.
    pub const RETRY_MIN_DELAY: Duration = Duration::from_secs(1);
    pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Sent as `User-Agent` on every request.
    pub const USER_AGENT: &str = concat!("watson-sdk-rust/", env!("CARGO_PKG_VERSION"));
}

/// Configuration for one Watson service instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name used for environment lookup and logging (e.g. `conversation`).
    pub service_name: String,

    /// Base URL of the service, without a trailing `/v1` or `/v4`.
    pub service_url: String,

    /// API version date sent as the `version` query parameter.
    pub version: String,

    pub authenticator: Authenticator,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retries for transient failures on non-streaming requests.
    pub max_retries: u32,
}

impl Config {
    /// Create a configuration with default timeouts.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        service_url: impl Into<String>,
        version: impl Into<String>,
        authenticator: Authenticator,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            service_url: service_url.into(),
            version: version.into(),
            authenticator,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: api::MAX_RETRIES,
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str, version: &str) -> Self {
        Self {
            service_name: "test".to_string(),
            service_url: base_url.to_string(),
            version: version.to_string(),
            authenticator: Authenticator::NoAuth,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0, // Surface status codes immediately
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Variables are prefixed with the upper-cased service name:
    /// `CONVERSATION_URL`, `CONVERSATION_APIKEY`, `CONVERSATION_USERNAME`,
    /// `CONVERSATION_PASSWORD`, `CONVERSATION_BEARER_TOKEN`,
    /// `CONVERSATION_AUTH_URL` and `CONVERSATION_AUTH_TYPE`.
    ///
    /// # Errors
    ///
    /// Returns error if the variables describe an unusable configuration.
    pub fn from_env(service_name: &str, default_url: &str, version: &str) -> anyhow::Result<Self> {
        Self::from_lookup(service_name, default_url, version, |key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(
        service_name: &str,
        default_url: &str,
        version: &str,
        lookup: F,
    ) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = env_prefix(service_name);
        let var = |suffix: &str| lookup(&format!("{prefix}_{suffix}")).filter(|v| !v.is_empty());

        let service_url = var("URL").unwrap_or_else(|| default_url.to_string());
        let auth_type = var("AUTH_TYPE").map(|t| t.to_ascii_lowercase());

        let authenticator = match auth_type.as_deref() {
            Some("noauth") => Authenticator::NoAuth,
            Some("basic") => Authenticator::basic(
                var("USERNAME").ok_or_else(|| anyhow::anyhow!("{prefix}_USERNAME is not set"))?,
                var("PASSWORD").ok_or_else(|| anyhow::anyhow!("{prefix}_PASSWORD is not set"))?,
            ),
            Some("bearertoken") => Authenticator::bearer(
                var("BEARER_TOKEN")
                    .ok_or_else(|| anyhow::anyhow!("{prefix}_BEARER_TOKEN is not set"))?,
            ),
            Some("iam") => Authenticator::Iam {
                api_key: var("APIKEY").ok_or_else(|| anyhow::anyhow!("{prefix}_APIKEY is not set"))?,
                url: var("AUTH_URL"),
            },
            Some(other) => anyhow::bail!("unsupported {prefix}_AUTH_TYPE: {other}"),
            None => infer_authenticator(&var),
        };

        let config = Self::new(service_name, service_url, version, authenticator);
        config.validate()?;
        tracing::debug!(
            service = service_name,
            auth = config.authenticator.kind(),
            "Loaded configuration from environment"
        );
        Ok(config)
    }

    /// Check the configuration before building a client.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version.trim().is_empty() {
            return Err(ValidationError::Empty { field: "version" });
        }
        if self.service_url.is_empty() {
            return Err(ValidationError::Empty { field: "service_url" });
        }
        if auth::has_bad_wrapping(&self.service_url) {
            return Err(ValidationError::invalid(
                "service_url",
                "must not start or end with curly brackets or quotes",
            ));
        }
        self.authenticator.validate()
    }

    /// Replace the authenticator.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// Replace the service URL.
    #[must_use]
    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = service_url.into();
        self
    }
}

fn env_prefix(service_name: &str) -> String {
    service_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

fn infer_authenticator(var: &dyn Fn(&str) -> Option<String>) -> Authenticator {
    if let Some(api_key) = var("APIKEY") {
        return Authenticator::Iam { api_key, url: var("AUTH_URL") };
    }
    if let Some(token) = var("BEARER_TOKEN") {
        return Authenticator::BearerToken(token);
    }
    match (var("USERNAME"), var("PASSWORD")) {
        // "apikey" as username is how IAM keys were passed through basic auth
        (Some(user), Some(api_key)) if user == "apikey" => {
            Authenticator::Iam { api_key, url: var("AUTH_URL") }
        }
        (Some(username), Some(password)) => Authenticator::Basic { username, password },
        _ => Authenticator::NoAuth,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_prefix() {
        assert_eq!(env_prefix("conversation"), "CONVERSATION");
        assert_eq!(env_prefix("watson_vision-combined"), "WATSON_VISION_COMBINED");
    }

    #[test]
    fn test_from_lookup_infers_iam() {
        let config = Config::from_lookup(
            "conversation",
            "https://example.com",
            "2017-05-26",
            lookup(&[("CONVERSATION_APIKEY", "k"), ("CONVERSATION_URL", "https://eu.example")]),
        )
        .unwrap();
        assert_eq!(config.service_url, "https://eu.example");
        assert_eq!(config.authenticator, Authenticator::Iam { api_key: "k".into(), url: None });
    }

    #[test]
    fn test_from_lookup_apikey_username() {
        let config = Config::from_lookup(
            "conversation",
            "https://example.com",
            "2017-05-26",
            lookup(&[("CONVERSATION_USERNAME", "apikey"), ("CONVERSATION_PASSWORD", "k2")]),
        )
        .unwrap();
        assert_eq!(config.authenticator.kind(), "iam");
    }

    #[test]
    fn test_from_lookup_explicit_type_requires_fields() {
        let result = Config::from_lookup(
            "conversation",
            "https://example.com",
            "2017-05-26",
            lookup(&[("CONVERSATION_AUTH_TYPE", "basic"), ("CONVERSATION_USERNAME", "u")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_version_and_braced_url() {
        let config = Config::for_testing("http://localhost", "");
        assert_eq!(config.validate(), Err(ValidationError::Empty { field: "version" }));

        let config = Config::for_testing("{https://example.com}", "2019-02-11");
        assert!(config.validate().is_err());

        assert!(Config::for_testing("http://localhost", "2019-02-11").validate().is_ok());
    }
}
