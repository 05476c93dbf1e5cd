//! The data source seam: the controller only ever asks "fetch this list
//! request", never how.

use std::time::Duration;

use async_trait::async_trait;
use campusadmin_api::types::ListBody;
use campusadmin_api::{Client, ListQuery};
use rand::Rng;
use thiserror::Error;

/// A list request handed to a [`DataSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Endpoint path relative to the API base, e.g. `/products`.
    pub path: String,
    pub query: ListQuery,
}

/// Why a data source could not produce a body.
#[derive(Error, Debug)]
pub enum SourceError {
    /// No credential is configured; nothing was sent.
    #[error("{0}")]
    AuthRequired(String),
    #[error(transparent)]
    Api(#[from] campusadmin_api::Error),
}

/// Anything that can answer a list request with a raw body.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, request: &ListRequest) -> Result<ListBody, SourceError>;
}

/// Retry policy for transient failures (network errors, 429, 5xx).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// Reads `CAMPUSADMIN_RETRY_MAX`, `CAMPUSADMIN_RETRY_BASE_MS` and
    /// `CAMPUSADMIN_RETRY_MAX_MS`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("CAMPUSADMIN_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("CAMPUSADMIN_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("CAMPUSADMIN_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// [`DataSource`] backed by the REST API client.
pub struct HttpSource {
    client: Client,
    requires_auth: bool,
    retry: RetryConfig,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            requires_auth: false,
            retry: RetryConfig::from_env(),
        }
    }

    /// Refuse to send anything when the client carries no token.
    pub fn requiring_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, request: &ListRequest) -> Result<ListBody, SourceError> {
        if self.requires_auth && !self.client.has_token() {
            return Err(SourceError::AuthRequired(format!(
                "no access token configured for {}",
                request.path
            )));
        }

        let mut attempt = 0usize;
        loop {
            match self.client.get_list(&request.path, &request.query).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !err.is_transient() {
                        return Err(err.into());
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        request.path,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
