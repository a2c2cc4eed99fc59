//! Request and result types of the OTP service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::otp_record::OtpTransport;
use crate::domain::value_objects::otp_context::{ChannelParams, OtpContext};

/// A request to issue (or reissue) a code
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendCodeRequest {
    /// Email address or mobile number
    pub target: String,
    /// Purpose of the code, selects the message copy
    pub context: OtpContext,
    /// Transport and its parameters
    pub channel: ChannelParams,
}

impl SendCodeRequest {
    /// Email request addressed to `username`
    pub fn email(
        target: impl Into<String>,
        context: OtpContext,
        username: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            context,
            channel: ChannelParams::email(username),
        }
    }

    pub fn mobile(target: impl Into<String>, context: OtpContext) -> Self {
        Self {
            target: target.into(),
            context,
            channel: ChannelParams::Mobile,
        }
    }

    pub fn transport(&self) -> OtpTransport {
        self.channel.transport()
    }
}

/// Result of a successful issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeResult {
    /// When the code was issued
    pub sent_at: DateTime<Utc>,
    /// Code lifetime in milliseconds
    pub timeout: u64,
    /// Issuances in the current cycle
    pub attempt: u32,
    /// Issuances allowed before blocking
    pub max_attempt: u32,
}

/// Result of a verification
///
/// A wrong code is a normal negative result (`status == false`), not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeResult {
    pub status: bool,
    pub retries: u32,
    pub max_retries: u32,
}
