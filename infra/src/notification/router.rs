//! Routes rendered payloads to the transport senders

use async_trait::async_trait;
use std::sync::Arc;

use otp_core::domain::entities::otp_record::OtpTransport;
use otp_core::services::otp::{NotificationDispatcher, NotificationPayload};

use super::{MailSender, SmsSender};

/// `NotificationDispatcher` over one mail and one SMS sender
#[derive(Clone)]
pub struct NotificationRouter {
    mail: Arc<dyn MailSender>,
    sms: Arc<dyn SmsSender>,
}

impl NotificationRouter {
    pub fn new(mail: Arc<dyn MailSender>, sms: Arc<dyn SmsSender>) -> Self {
        Self { mail, sms }
    }
}

#[async_trait]
impl NotificationDispatcher for NotificationRouter {
    async fn send_message(
        &self,
        transport: OtpTransport,
        target: &str,
        payload: &NotificationPayload,
    ) -> Result<String, String> {
        let result = match (transport, payload) {
            (
                OtpTransport::Email,
                NotificationPayload::Email {
                    subject,
                    template,
                    data,
                },
            ) => self.mail.send_mail(target, subject, template, data).await,
            (OtpTransport::Mobile, NotificationPayload::Sms { text }) => {
                self.sms.send_sms(target, text).await
            }
            (transport, _) => {
                return Err(format!(
                    "Payload does not match transport {}",
                    transport
                ))
            }
        };

        result.map_err(|e| e.to_string())
    }
}
