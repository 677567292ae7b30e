// Notification Gateway Port (Interface)

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a single delivery attempt (at-most-once, no retry queue)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub delivered: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl DeliveryReceipt {
    pub fn delivered(message_id: impl Into<String>) -> Self {
        Self {
            delivered: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            delivered: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Outbound messaging transport, swappable at configuration time.
///
/// Recipient validation is the caller's job (see `application::notify`);
/// the gateway receives only pre-validated addresses.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryReceipt>;
}
