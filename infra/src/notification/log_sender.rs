//! Log senders
//!
//! Development transports: every delivery is written to the tracing output
//! instead of leaving the process. The code itself is only logged at debug
//! level.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use otp_core::services::otp::EmailTemplateData;
use otp_shared::utils::mask_target;

use super::{MailSender, SmsSender};
use crate::InfrastructureError;

/// Mail sender that logs deliveries
#[derive(Clone)]
pub struct LogMailSender {
    /// Sender address shown in the log
    from: String,
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
}

impl LogMailSender {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            message_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailSender for LogMailSender {
    async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        data: &EmailTemplateData,
    ) -> Result<String, InfrastructureError> {
        if to.trim().is_empty() {
            return Err(InfrastructureError::Notification(
                "Missing email recipient".to_string(),
            ));
        }

        let message_id = format!("log-mail-{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            from = %self.from,
            recipient = %mask_target(to),
            subject = subject,
            template = template,
            message_id = %message_id,
            "Email delivered to log"
        );
        debug!(
            message_id = %message_id,
            username = %data.username,
            code = %data.code,
            expiration_time = %data.expiration_time,
            "Email template data"
        );

        Ok(message_id)
    }
}

/// SMS sender that logs deliveries
#[derive(Clone)]
pub struct LogSmsSender {
    /// Sender id shown in the log
    sender_id: String,
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
}

impl LogSmsSender {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            message_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send_sms(&self, to: &str, text: &str) -> Result<String, InfrastructureError> {
        if to.trim().is_empty() {
            return Err(InfrastructureError::Notification(
                "Missing SMS recipient".to_string(),
            ));
        }

        let message_id = format!("log-sms-{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            sender_id = %self.sender_id,
            recipient = %mask_target(to),
            length = text.len(),
            message_id = %message_id,
            "SMS delivered to log"
        );
        debug!(message_id = %message_id, text = text, "SMS body");

        Ok(message_id)
    }
}
