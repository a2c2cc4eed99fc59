//! Notification dispatcher seam

use async_trait::async_trait;

use crate::domain::entities::otp_record::OtpTransport;

use super::templates::NotificationPayload;

/// Trait for delivering rendered verification messages
///
/// The OTP service calls this from a detached task; an error is logged and
/// never reaches the caller of `send`. Retrying is up to the implementation.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver `payload` to `target` over `transport`, returning a provider message id
    async fn send_message(
        &self,
        transport: OtpTransport,
        target: &str,
        payload: &NotificationPayload,
    ) -> Result<String, String>;
}
