use crate::event::{RawEvent, Ticket};
use crate::order_builder::OrderRequest;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Backend acknowledgement for a created order. A present `url` means the
/// buyer must be redirected to an external payment page; absence means the
/// order is already fulfilled.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderAck {
    #[serde(default)]
    pub url: Option<String>,
}

#[async_trait]
pub trait EventsApi: Send + Sync {
    async fn fetch_events(&self) -> Result<Vec<RawEvent>, FetchError>;
    async fn fetch_event(&self, id: &str) -> Result<RawEvent, FetchError>;
}

#[async_trait]
pub trait TicketsApi: Send + Sync {
    async fn fetch_tickets(&self, event_id: &str) -> Result<Vec<Ticket>, FetchError>;
}

#[async_trait]
pub trait OrdersApi: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderAck, FetchError>;
}

/// HTTP client for the marketplace backend.
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        // Connection pooling and a conservative timeout; no automatic retry.
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.http_client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new());
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl EventsApi for ApiClient {
    async fn fetch_events(&self) -> Result<Vec<RawEvent>, FetchError> {
        self.get_json("/events/").await
    }

    async fn fetch_event(&self, id: &str) -> Result<RawEvent, FetchError> {
        self.get_json(&format!("/events/{id}")).await
    }
}

#[async_trait]
impl TicketsApi for ApiClient {
    async fn fetch_tickets(&self, event_id: &str) -> Result<Vec<Ticket>, FetchError> {
        self.get_json(&format!("/tickets/event/{event_id}")).await
    }
}

#[async_trait]
impl OrdersApi for ApiClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderAck, FetchError> {
        let url = format!("{}/orders/", self.base_url);
        debug!(%url, line_items = request.line_items.len(), "POST");

        let response = self.http_client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}
