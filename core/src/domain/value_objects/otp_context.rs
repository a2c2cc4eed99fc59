//! Purpose of an issuance and the per-transport parameters it carries.

use serde::{Deserialize, Serialize};

use crate::domain::entities::otp_record::OtpTransport;
use crate::errors::OtpError;

/// Why a code is being issued; selects the message copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpContext {
    Register,
    ResetPassword,
}

impl OtpContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpContext::Register => "register",
            OtpContext::ResetPassword => "reset_password",
        }
    }
}

impl std::fmt::Display for OtpContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtpContext {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(OtpContext::Register),
            "reset_password" => Ok(OtpContext::ResetPassword),
            other => Err(OtpError::InvalidContext {
                context: other.to_string(),
            }),
        }
    }
}

/// Transport-specific parameters of a send request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum ChannelParams {
    /// Email delivery, addressed to `username` in the message body
    Email { username: String },
    Mobile,
}

impl ChannelParams {
    pub fn email(username: impl Into<String>) -> Self {
        ChannelParams::Email {
            username: username.into(),
        }
    }

    pub fn transport(&self) -> OtpTransport {
        match self {
            ChannelParams::Email { .. } => OtpTransport::Email,
            ChannelParams::Mobile => OtpTransport::Mobile,
        }
    }
}
