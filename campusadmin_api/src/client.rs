//! HTTP client for the campus admin REST API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{ListQuery, Query},
    types::ListBody,
    Error,
};

/// Request timeout for API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the campus admin REST API.
///
/// Holds one `reqwest::Client` with a 30-second timeout. When a bearer token
/// is set it is attached to every request.
pub struct Client {
    client: reqwest::Client,
    /// Base URL for the API, e.g. `https://api.example.edu/api`.
    base_api_url: String,
    token: Option<String>,
}

impl Client {
    /// Creates a new client for the given base URL.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed(e.to_string())
            })?;
        Ok(Self {
            client,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attaches a bearer token to every request.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(e.to_string())
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        let mut request = self
            .client
            .get(url)
            .header("accept", "application/json, text/plain, */*");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            tracing::error!("Request rejected with status {}", status);
            return Err(Error::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Parse(e.to_string())
        })?;

        Ok(parsed)
    }

    /// Fetches one page of a collection endpoint as a raw body.
    pub async fn get_list(&self, path: &str, query: &ListQuery) -> Result<ListBody, Error> {
        self.get::<ListBody, ListQuery>(path, Some(query)).await
    }

    /// Fetches any JSON document, e.g. a dashboard summary.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, Error> {
        self.get::<serde_json::Value, ListQuery>(path, None).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
