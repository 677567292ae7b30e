// Log-only gateway
//
// Production stand-in while no carrier is configured: reports success and
// writes the message to the log so operators can see what would have
// gone out.

use async_trait::async_trait;
use tracing::info;
use waitline_core::error::Result;
use waitline_core::port::{DeliveryReceipt, NotificationGateway};

pub struct LogSmsGateway;

#[async_trait]
impl NotificationGateway for LogSmsGateway {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryReceipt> {
        let message_id = format!("log_{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
        info!(to = %to, message_id = %message_id, body = %body, "SMS (log gateway)");
        Ok(DeliveryReceipt::delivered(message_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_reports_delivered() {
        let gateway = LogSmsGateway;
        let receipt = gateway.send("+12025550123", "hello").await.unwrap();
        assert!(receipt.delivered);
        assert!(receipt.message_id.unwrap().starts_with("log_"));
    }
}
