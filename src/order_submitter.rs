use crate::clients::{FetchError, OrdersApi};
use crate::order_builder::OrderRequest;
use std::sync::Arc;
use tracing::{info, warn};

const GENERIC_ORDER_MESSAGE: &str = "failed to process order";

/// Result of a successful order submission.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    /// The backend handed back a payment URL; the order is not complete
    /// until the buyer finishes there.
    RedirectToPayment(String),
    /// No redirect: the order is fulfilled immediately.
    Completed,
}

/// Order failure with a message fit for direct display.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct OrderError {
    pub message: String,
    #[source]
    source: Option<FetchError>,
}

impl OrderError {
    fn from_fetch(err: FetchError) -> Self {
        let message = match &err {
            FetchError::Status { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| GENERIC_ORDER_MESSAGE.to_string()),
            FetchError::Transport(_) => GENERIC_ORDER_MESSAGE.to_string(),
        };
        Self {
            message,
            source: Some(err),
        }
    }
}

/// Posts a normalized order and interprets the response. Does not retry:
/// re-submission is an explicit caller action.
pub struct OrderSubmitter {
    api: Arc<dyn OrdersApi>,
}

impl OrderSubmitter {
    pub fn new(api: Arc<dyn OrdersApi>) -> Self {
        Self { api }
    }

    pub async fn submit(&self, request: &OrderRequest) -> Result<OrderOutcome, OrderError> {
        match self.api.create_order(request).await {
            Ok(ack) => match ack.url {
                Some(url) => {
                    info!(%url, "order created, payment redirect pending");
                    Ok(OrderOutcome::RedirectToPayment(url))
                }
                None => {
                    info!("order created and fulfilled");
                    Ok(OrderOutcome::Completed)
                }
            },
            Err(err) => {
                warn!("order submission failed: {err}");
                Err(OrderError::from_fetch(err))
            }
        }
    }
}
