//! Notification delivery configuration

use serde::{Deserialize, Serialize};

/// Settings for the transports that deliver verification codes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Delivery provider ("log" writes deliveries to the tracing output)
    pub provider: String,

    /// Sender address for email deliveries
    pub mail_from: String,

    /// Sender id shown on SMS deliveries
    pub sms_sender_id: String,

    /// Platform name used in message copy
    pub platform_name: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: String::from("log"),
            mail_from: String::from("no-reply@otp-gate.local"),
            sms_sender_id: String::from("OTPGATE"),
            platform_name: String::from("OTP Gate"),
        }
    }
}

impl NotificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("NOTIFICATION_PROVIDER").unwrap_or(defaults.provider),
            mail_from: std::env::var("MAIL_FROM").unwrap_or(defaults.mail_from),
            sms_sender_id: std::env::var("SMS_SENDER_ID").unwrap_or(defaults.sms_sender_id),
            platform_name: std::env::var("PLATFORM_NAME").unwrap_or(defaults.platform_name),
        }
    }
}
