//! Message copy for verification code deliveries
//!
//! Copy is a static table keyed by [`OtpContext`]; a new purpose is a new
//! table row. Rendering returns the opaque payload handed to the dispatcher.

use otp_shared::utils::{format_duration_ms, TimeUnit};
use serde::Serialize;

use crate::domain::value_objects::otp_context::{ChannelParams, OtpContext};
use crate::errors::OtpError;

/// Data bound into an email template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplateData {
    pub username: String,
    pub code: String,
    pub expiration_time: String,
}

/// Rendered delivery, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotificationPayload {
    Email {
        subject: String,
        template: String,
        data: EmailTemplateData,
    },
    Sms {
        text: String,
    },
}

impl NotificationPayload {
    pub fn is_email(&self) -> bool {
        matches!(self, NotificationPayload::Email { .. })
    }
}

struct ContextCopy {
    context: OtpContext,
    email_subject: &'static str,
    email_template: &'static str,
    sms_purpose: &'static str,
}

const CONTEXT_COPY: &[ContextCopy] = &[
    ContextCopy {
        context: OtpContext::Register,
        email_subject: "Sign up verification code",
        email_template: "register-verification-code",
        sms_purpose: "to register",
    },
    ContextCopy {
        context: OtpContext::ResetPassword,
        email_subject: "Reset password verification code",
        email_template: "reset-password-verification-code",
        sms_purpose: "to reset password",
    },
];

/// Render the delivery of `code` for `context` over the channel described by `channel`
///
/// # Arguments
///
/// * `context` - Purpose of the issuance
/// * `channel` - Transport parameters (email username or mobile)
/// * `code` - The code being delivered
/// * `timeout_ms` - Code lifetime, rendered as a human readable expiry
///
/// # Returns
///
/// * `Ok(NotificationPayload)` - Email or SMS payload
/// * `Err(OtpError::InvalidContext)` - No copy exists for `context`
pub fn render(
    context: OtpContext,
    channel: &ChannelParams,
    code: &str,
    timeout_ms: u64,
) -> Result<NotificationPayload, OtpError> {
    let copy = CONTEXT_COPY
        .iter()
        .find(|copy| copy.context == context)
        .ok_or_else(|| OtpError::InvalidContext {
            context: context.to_string(),
        })?;
    let expiration_time = format_duration_ms(timeout_ms, TimeUnit::Day);

    let payload = match channel {
        ChannelParams::Email { username } => NotificationPayload::Email {
            subject: copy.email_subject.to_string(),
            template: copy.email_template.to_string(),
            data: EmailTemplateData {
                username: username.clone(),
                code: code.to_string(),
                expiration_time,
            },
        },
        ChannelParams::Mobile => NotificationPayload::Sms {
            text: format!(
                "Your one time verification code is {} {}, Please do not share this code to anyone. This verification code will be expired after {}",
                code, copy.sms_purpose, expiration_time
            ),
        },
    };

    Ok(payload)
}
