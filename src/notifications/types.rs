//! Notification event and transport seam

use crate::errors::DeliveryError;
use async_trait::async_trait;

/// A new-arrival event for one range, consumed immediately by the
/// dispatcher and never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalEvent {
    pub range: String,
    pub phone_number: String,
    pub message: String,
}

/// Outbound transport for rendered notifications
///
/// Production implementation is the Telegram notifier; tests use a
/// recording double.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}
