//! Shared HTTP client for Watson services.
//!
//! Provides:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for JSON calls
//! - Static or IAM-managed `Authorization` headers
//! - The `version` query parameter on every request
//! - Status code to [`ClientError`] mapping

mod middleware;
mod request;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::Form;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryError, RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use url::Url;

pub use middleware::TracingMiddleware;
pub use request::{JsonBody, Query};

use crate::auth::{Authenticator, IamTokenManager};
use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// HTTP client bound to one service instance.
#[derive(Clone)]
pub struct WatsonClient {
    /// HTTP client with retry and tracing middleware.
    client: ClientWithMiddleware,

    /// Plain client for multipart uploads, whose bodies cannot be replayed.
    uploads: ClientWithMiddleware,

    /// Base URL of the service.
    service_url: Url,

    /// API version date.
    version: String,

    /// Token source when using IAM.
    iam: Option<IamTokenManager>,

    /// Per-request limit, reported back in [`ClientError::Timeout`].
    request_timeout: Duration,

    service_name: String,
}

impl WatsonClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or HTTP client
    /// initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let service_url = Url::parse(config.service_url.trim_end_matches('/'))?;
        if service_url.cannot_be_a_base() {
            anyhow::bail!("service URL must be hierarchical: {service_url}");
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(api::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(value) = config.authenticator.static_header() {
            let mut value = HeaderValue::from_str(&value)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(api::RETRY_MIN_DELAY, api::RETRY_MAX_DELAY)
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(http.clone())
            .with(TracingMiddleware::new(&config.service_name))
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let uploads = ClientBuilder::new(http.clone())
            .with(TracingMiddleware::new(&config.service_name))
            .build();

        let iam = match config.authenticator {
            Authenticator::Iam { api_key, url } => Some(IamTokenManager::new(http, api_key, url)),
            _ => None,
        };

        tracing::debug!(
            service = %config.service_name,
            url = %service_url,
            version = %config.version,
            "Created Watson client"
        );

        Ok(Self {
            client,
            uploads,
            service_url,
            version: config.version,
            iam,
            request_timeout: config.request_timeout,
            service_name: config.service_name,
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn service_url(&self) -> &str {
        self.service_url.as_str()
    }

    /// API version date sent with every request.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Check if IAM token exchange is configured.
    #[must_use]
    pub const fn uses_iam(&self) -> bool {
        self.iam.is_some()
    }

    /// Build an endpoint URL from path segments.
    ///
    /// Each segment is percent-encoded, so IDs and texts containing `/` or
    /// spaces address a single path element.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.service_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.service_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON resource.
    pub async fn get<T>(&self, url: Url, query: &Query) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(url);
        self.send_json(request, query).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post<T>(&self, url: Url, query: &Query, body: &serde_json::Value) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(serde_json::to_vec(body)?);
        self.send_json(request, query).await
    }

    /// POST without a body.
    pub async fn post_empty<T>(&self, url: Url, query: &Query) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.client.post(url);
        self.send_json(request, query).await
    }

    /// POST a multipart form. Not retried.
    pub async fn post_multipart<T>(&self, url: Url, query: &Query, form: Form) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.uploads.post(url).multipart(form);
        self.send_json(request, query).await
    }

    /// DELETE a resource, discarding the response body.
    pub async fn delete(&self, url: Url, query: &Query) -> ClientResult<()> {
        let request = self.client.delete(url);
        self.execute(request, query).await?;
        Ok(())
    }

    /// GET a binary resource with the given `Accept` type.
    pub async fn get_bytes(&self, url: Url, query: &Query, accept: &str) -> ClientResult<Vec<u8>> {
        let request = self.client.get(url).header(ACCEPT, accept);
        let response = self.execute(request, query).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send_json<T>(&self, request: RequestBuilder, query: &Query) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(request, query).await?;
        let bytes = response.bytes().await?;
        // Some endpoints answer 200 with an empty body
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"{}").map_err(ClientError::from);
        }
        serde_json::from_slice(&bytes).map_err(ClientError::from)
    }

    async fn execute(&self, request: RequestBuilder, query: &Query) -> ClientResult<reqwest::Response> {
        let mut request = request.query(&[("version", self.version.as_str())]).query(query.pairs());

        if let Some(iam) = &self.iam {
            let token = iam.token().await?;
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|err| transport_error(err, self.request_timeout))?;
        self.handle_response(response).await
    }

    /// Handle API response status codes.
    async fn handle_response(&self, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 {
            if let Some(iam) = &self.iam {
                // Stale or revoked token; fetch a new one next time
                iam.invalidate().await;
            }
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            tracing::warn!(service = %self.service_name, retry_after, "Rate limited");
            return Err(ClientError::rate_limited(retry_after));
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        tracing::warn!(
            service = %self.service_name,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "Service returned an error"
        );

        let or_default = |default: &str| message.clone().unwrap_or_else(|| default.to_string());
        Err(match status.as_u16() {
            400 => ClientError::bad_request(or_default("Bad Request")),
            401 => ClientError::unauthorized(or_default(
                "Unauthorized: Access is denied due to invalid credentials.",
            )),
            code @ (403 | 406) => {
                ClientError::Forbidden { status: code, message: or_default("Forbidden") }
            }
            404 => ClientError::not_found(or_default("Not found")),
            409 => ClientError::Conflict { message: or_default("Conflict") },
            413 => ClientError::RequestTooLarge { message: or_default("Request too large") },
            415 => ClientError::UnsupportedMediaType { message: or_default("Unsupported media type") },
            500 => ClientError::server(500, or_default("Internal server error")),
            503 => ClientError::server(503, or_default("Service unavailable")),
            code => ClientError::UnexpectedStatus { status: code, message: or_default("") },
        })
    }
}

/// Pull the human-readable message out of an error body.
///
/// Watson services use `error`, `error_message` or `message`, and some
/// gateways answer with plain text.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "error_message", "message"] {
            match map.get(key) {
                Some(serde_json::Value::String(message)) => return Some(message.clone()),
                Some(serde_json::Value::Object(inner)) => {
                    if let Some(serde_json::Value::String(message)) = inner.get("message") {
                        return Some(message.clone());
                    }
                }
                _ => {}
            }
        }
    }
    Some(body.to_string())
}

/// Classify a failed send. A timed-out request is reported with the configured limit.
fn transport_error(err: reqwest_middleware::Error, timeout: Duration) -> ClientError {
    if is_timeout(&err) {
        tracing::warn!(?timeout, "Request timed out");
        return ClientError::Timeout(timeout);
    }
    match err {
        reqwest_middleware::Error::Reqwest(err) => ClientError::Http(err),
        err @ reqwest_middleware::Error::Middleware(_) => ClientError::Middleware(err),
    }
}

/// Look through retry and middleware wrappers for a timed-out transport error.
fn is_timeout(err: &reqwest_middleware::Error) -> bool {
    match err {
        reqwest_middleware::Error::Reqwest(err) => err.is_timeout(),
        reqwest_middleware::Error::Middleware(err) => err.chain().any(|cause| {
            if let Some(RetryError::WithRetries { err, .. } | RetryError::Error(err)) = cause.downcast_ref::<RetryError>() {
                return is_timeout(err);
            }
            cause.downcast_ref::<reqwest::Error>().is_some_and(reqwest::Error::is_timeout)
                || cause
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::TimedOut)
        }),
    }
}

impl std::fmt::Debug for WatsonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatsonClient")
            .field("service_name", &self.service_name)
            .field("service_url", &self.service_url.as_str())
            .field("version", &self.version)
            .field("request_timeout", &self.request_timeout)
            .field("uses_iam", &self.uses_iam())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_keys() {
        assert_eq!(error_message(r#"{"error": "Bad version"}"#).as_deref(), Some("Bad version"));
        assert_eq!(error_message(r#"{"error_message": "nope"}"#).as_deref(), Some("nope"));
        assert_eq!(error_message(r#"{"message": "gone"}"#).as_deref(), Some("gone"));
        assert_eq!(
            error_message(r#"{"error": {"message": "nested"}}"#).as_deref(),
            Some("nested")
        );
        assert_eq!(error_message("plain text").as_deref(), Some("plain text"));
        assert_eq!(error_message("  "), None);
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client =
            WatsonClient::new(Config::for_testing("http://localhost:1/api/", "2017-05-26")).unwrap();
        let url = client.endpoint(&["v1", "workspaces", "ws 1", "counterexamples", "a/b"]).unwrap();
        assert_eq!(url.path(), "/api/v1/workspaces/ws%201/counterexamples/a%2Fb");
    }

    #[test]
    fn test_timeout_found_under_retry_wrapper() {
        let limit = Duration::from_millis(250);
        let timed_out = || {
            reqwest_middleware::Error::Middleware(anyhow::Error::new(std::io::Error::from(
                std::io::ErrorKind::TimedOut,
            )))
        };

        let wrapped = reqwest_middleware::Error::Middleware(
            RetryError::WithRetries { retries: 2, err: timed_out() }.into(),
        );
        assert!(matches!(transport_error(wrapped, limit), ClientError::Timeout(d) if d == limit));

        let refused = reqwest_middleware::Error::Middleware(anyhow::Error::new(std::io::Error::from(
            std::io::ErrorKind::ConnectionRefused,
        )));
        assert!(matches!(transport_error(refused, limit), ClientError::Middleware(_)));
    }
}
