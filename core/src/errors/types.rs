//! Error types for the OTP engine and its orchestration entry points
//!
//! `OtpError` is the taxonomy surfaced by `send` and `verify`. A code that
//! simply does not match is not an error; it is reported as `status = false`.

use thiserror::Error;

/// Failures of OTP issuance and verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("{target} temporarily blocked for {retry_after}, due to max wrong attempts or failed retries")]
    Blocked { target: String, retry_after: String },

    #[error("Resend verification code on {target} not allowed within {window}")]
    ResendTooSoon { target: String, window: String },

    #[error("Verification code for {target} expired, try resend")]
    Expired { target: String },

    #[error("No verification code sent on {target}")]
    NotFound { target: String },

    #[error("Unknown otp context: {context}")]
    InvalidContext { context: String },
}

impl OtpError {
    /// Stable machine-readable code for the presentation layer
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::Blocked { .. } => "OTP_BLOCKED",
            OtpError::ResendTooSoon { .. } => "OTP_RESEND_TOO_SOON",
            OtpError::Expired { .. } => "OTP_EXPIRED",
            OtpError::NotFound { .. } => "OTP_NOT_FOUND",
            OtpError::InvalidContext { .. } => "OTP_INVALID_CONTEXT",
        }
    }
}

/// Validation errors
///
/// These errors represent input validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid email: {email}")]
    InvalidEmail { email: String },

    #[error("Invalid mobile: {mobile}")]
    InvalidMobile { mobile: String },
}
