//! Middleware for the HTTP client.
//!
//! Composed with the retry middleware so that every attempt, including
//! retries, is logged with its latency.

use std::time::Instant;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

/// Logs each outgoing request at debug level.
#[derive(Debug, Clone)]
pub struct TracingMiddleware {
    service: String,
}

impl TracingMiddleware {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }
}

#[async_trait::async_trait]
impl Middleware for TracingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let path = req.url().path().to_string();
        let started = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &result {
            Ok(response) => tracing::debug!(
                service = %self.service,
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed_ms,
                "Request completed"
            ),
            Err(err) => tracing::warn!(
                service = %self.service,
                %method,
                %path,
                elapsed_ms,
                error = %err,
                "Request failed"
            ),
        }

        result
    }
}
