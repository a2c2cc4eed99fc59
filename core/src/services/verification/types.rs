//! Types for multi-channel verification

use serde::{Deserialize, Serialize};

use crate::services::otp::{SendCodeResult, VerifyCodeResult};

/// Codes submitted for a registration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCodes {
    pub email: String,
    pub email_code: String,
    /// Optional second channel
    pub mobile: Option<String>,
    pub mobile_code: Option<String>,
}

impl RegistrationCodes {
    pub fn email_only(email: impl Into<String>, email_code: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            email_code: email_code.into(),
            mobile: None,
            mobile_code: None,
        }
    }

    pub fn with_mobile(mut self, mobile: impl Into<String>, mobile_code: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self.mobile_code = Some(mobile_code.into());
        self
    }
}

/// Aggregated outcome of a registration verification
///
/// `succeeded` is true only when every attempted channel reported
/// `status == true`; per-channel results are kept either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    pub succeeded: bool,
    pub email: VerifyCodeResult,
    pub mobile: Option<VerifyCodeResult>,
}

/// Aggregated outcome of a password reset verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetVerification {
    pub succeeded: bool,
    pub email: Option<VerifyCodeResult>,
    pub mobile: Option<VerifyCodeResult>,
}

/// Codes issued for a password reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetCodesSent {
    pub email: Option<SendCodeResult>,
    pub mobile: Option<SendCodeResult>,
}

/// Outcome of a gated privileged action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<R, T> {
    /// Verification failed; the action did not run
    Rejected(R),
    /// Verification passed and the action ran
    Committed(T),
}

impl<R, T> Gated<R, T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, Gated::Committed(_))
    }
}
