// Recording in-memory gateway (tests and development)

use async_trait::async_trait;
use std::sync::Mutex;
use waitline_core::error::Result;
use waitline_core::port::{DeliveryReceipt, NotificationGateway};

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub message_id: String,
    pub to: String,
    pub body: String,
}

/// Records every message instead of delivering it
pub struct MemorySmsGateway {
    sent: Mutex<Vec<SentMessage>>,
}

impl MemorySmsGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// All messages sent so far (for assertions)
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().expect("gateway lock poisoned").clone()
    }

    pub fn clear(&self) {
        self.sent.lock().expect("gateway lock poisoned").clear();
    }
}

impl Default for MemorySmsGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationGateway for MemorySmsGateway {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryReceipt> {
        let message_id = format!("mock_{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);

        self.sent.lock().expect("gateway lock poisoned").push(SentMessage {
            message_id: message_id.clone(),
            to: to.to_string(),
            body: body.to_string(),
        });

        Ok(DeliveryReceipt::delivered(message_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_messages_in_order() {
        let gateway = MemorySmsGateway::new();

        let receipt = gateway.send("+11111111111", "First message").await.unwrap();
        assert!(receipt.delivered);
        assert!(receipt.message_id.unwrap().starts_with("mock_"));

        gateway.send("+12222222222", "Second message").await.unwrap();

        let sent = gateway.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "+11111111111");
        assert_eq!(sent[1].body, "Second message");
    }

    #[tokio::test]
    async fn test_clear() {
        let gateway = MemorySmsGateway::new();
        gateway.send("+11111111111", "hello").await.unwrap();
        assert_eq!(gateway.sent_messages().len(), 1);

        gateway.clear();
        assert!(gateway.sent_messages().is_empty());
    }
}
