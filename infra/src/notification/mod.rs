//! Notification Module
//!
//! Delivery of rendered verification messages:
//! - **Sender traits**: one interface per transport (mail, SMS)
//! - **Router**: the core `NotificationDispatcher`, routing payloads to senders
//! - **Log senders**: development transports writing deliveries to tracing output

use async_trait::async_trait;
use std::sync::Arc;

use otp_core::services::otp::EmailTemplateData;
use otp_shared::config::NotificationConfig;

use crate::InfrastructureError;

pub mod log_sender;
pub mod router;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use log_sender::{LogMailSender, LogSmsSender};
pub use router::NotificationRouter;

/// Email transport
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send a templated email, returning a provider message id
    async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        data: &EmailTemplateData,
    ) -> Result<String, InfrastructureError>;
}

/// SMS transport
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send a text message, returning a provider message id
    async fn send_sms(&self, to: &str, text: &str) -> Result<String, InfrastructureError>;
}

/// Create the dispatcher for the configured provider
///
/// Unknown providers fall back to the log senders with a warning.
pub fn create_dispatcher(config: &NotificationConfig) -> NotificationRouter {
    match config.provider.as_str() {
        "log" => log_router(config),
        other => {
            tracing::warn!(
                provider = other,
                "Unknown notification provider, using log senders"
            );
            log_router(config)
        }
    }
}

fn log_router(config: &NotificationConfig) -> NotificationRouter {
    NotificationRouter::new(
        Arc::new(LogMailSender::new(config.mail_from.clone())),
        Arc::new(LogSmsSender::new(config.sms_sender_id.clone())),
    )
}
