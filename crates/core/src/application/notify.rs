// Notification Dispatch
//
// Validates recipients, renders message bodies and hands them to the
// configured gateway. Dispatch is strictly fire-and-forget: the ledger
// mutation is already committed when we run, so gateway failures are
// logged and folded into the returned receipt, never propagated.

use crate::port::{DeliveryReceipt, NotificationGateway};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Recipient must be `+` followed by 10-15 digits
pub fn is_valid_recipient(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

pub struct Notifier {
    gateway: Arc<dyn NotificationGateway>,
    send_timeout: Duration,
}

impl Notifier {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        Self {
            gateway,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_timeout(gateway: Arc<dyn NotificationGateway>, send_timeout: Duration) -> Self {
        Self {
            gateway,
            send_timeout,
        }
    }

    /// Customer joined the queue
    pub async fn entry_joined(
        &self,
        phone: &str,
        business_name: &str,
        position: i64,
        wait_minutes: i64,
    ) -> DeliveryReceipt {
        let body = format!(
            "Welcome to {}! You are in position {}. Estimated wait time: {} minutes. \
             We'll notify you when it's your turn.",
            business_name, position, wait_minutes
        );
        self.dispatch(phone, &body).await
    }

    /// Customer was called to the counter
    pub async fn entry_called(&self, phone: &str, business_name: &str) -> DeliveryReceipt {
        let body = format!(
            "Your turn is ready at {}! Please come to the counter now.",
            business_name
        );
        self.dispatch(phone, &body).await
    }

    /// Customer's position improved. Part of the contract but not yet
    /// triggered by the ledger: cancellations do not cascade.
    pub async fn position_changed(
        &self,
        phone: &str,
        business_name: &str,
        new_position: i64,
        wait_minutes: i64,
    ) -> DeliveryReceipt {
        let body = format!(
            "Update from {}: You are now in position {}. Estimated wait time: {} minutes.",
            business_name, new_position, wait_minutes
        );
        self.dispatch(phone, &body).await
    }

    /// Single bounded delivery attempt. Invalid recipients are rejected
    /// before the transport is ever touched.
    async fn dispatch(&self, to: &str, body: &str) -> DeliveryReceipt {
        if !is_valid_recipient(to) {
            debug!(to = %to, "Skipping notification: invalid recipient");
            return DeliveryReceipt::failed("invalid recipient");
        }

        match tokio::time::timeout(self.send_timeout, self.gateway.send(to, body)).await {
            Ok(Ok(receipt)) => {
                if !receipt.delivered {
                    warn!(to = %to, error = ?receipt.error, "Notification not delivered");
                }
                receipt
            }
            Ok(Err(e)) => {
                warn!(to = %to, error = %e, "Notification gateway failed");
                DeliveryReceipt::failed(e.to_string())
            }
            Err(_) => {
                warn!(to = %to, timeout_ms = %self.send_timeout.as_millis(), "Notification send timed out");
                DeliveryReceipt::failed("send timed out")
            }
        }
    }
}
