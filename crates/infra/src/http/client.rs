//! HTTP client with bounded retry.
//!
//! Both provider integrations share this wrapper. Retries cover timeouts,
//! connect failures, and 5xx responses; client errors are returned to the
//! caller untouched.

use std::time::Duration;

use learnarc_domain::{LearnArcError, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(200);
const MAX_BACKOFF_SHIFT: u32 = 8;

/// HTTP client with built-in retry and timeout support.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let attempts = self.max_attempts.max(1);
        let mut last_error: Option<LearnArcError> = None;

        for attempt in 1..=attempts {
            let cloned = builder.try_clone().ok_or_else(|| {
                LearnArcError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            match self.client.execute(build_request(cloned)?).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %status, "received HTTP response");

                    if status.is_server_error() && attempt < attempts {
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, error = %err, "HTTP request failed");
                    let retryable = err.is_timeout() || err.is_connect() || err.is_request();
                    last_error = Some(LearnArcError::from(InfraError::from(err)));
                    if retryable && attempt < attempts {
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }
                    break;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LearnArcError::Internal("http client exhausted retries without a result".into())
        }))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(MAX_BACKOFF_SHIFT as usize) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn build_request(builder: RequestBuilder) -> Result<reqwest::Request> {
    builder.build().map_err(|err| LearnArcError::from(InfraError::from(err)))
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: DEFAULT_BASE_BACKOFF,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client =
            builder.build().map_err(|err| LearnArcError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}
