use std::fmt;
use std::time::Duration;

use axum::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::Deserialize;

/// Total recorded page visits, as reported by the counter backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct VisitCount(u64);

impl VisitCount {
    pub fn new(visits: u64) -> Self {
        VisitCount(visits)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VisitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to counter backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("counter backend returned status code -> {status}, message -> {body}")]
    Protocol { status: StatusCode, body: String },

    #[error("failed to decode counter response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait CountFetcher {
    async fn fetch_visits(&self) -> Result<VisitCount, FetchError>;
}

#[derive(Deserialize)]
struct CountResponse {
    visits: VisitCount,
}

pub struct VisitCountClient {
    client: reqwest::Client,
    endpoint: String,
}

impl VisitCountClient {
    pub fn new(endpoint: String, origin: Option<&str>) -> Result<Self, anyhow::Error> {
        // the origin is the only header added to the plain GET
        let mut headers = HeaderMap::new();
        if let Some(origin) = origin {
            headers.insert(header::ORIGIN, HeaderValue::from_str(origin)?);
        }

        // no request timeout, a slow backend leaves the widget pending
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(120))
            .build()?;

        Ok(VisitCountClient { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_ref()
    }
}

#[async_trait]
impl CountFetcher for VisitCountClient {
    async fn fetch_visits(&self) -> Result<VisitCount, FetchError> {
        tracing::info!("fetching visit count from {}", self.endpoint);
        let response = self.client.get(self.endpoint.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "none".to_string());
            return Err(FetchError::Protocol { status, body });
        }

        let body = response.text().await?;
        let count = serde_json::from_str::<CountResponse>(&body)?.visits;
        tracing::debug!("counter backend response: {}", body);

        Ok(count)
    }
}
