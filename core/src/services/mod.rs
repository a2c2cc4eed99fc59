//! Business services containing domain logic and use cases.

pub mod otp;
pub mod verification;

// Re-export commonly used types
pub use otp::{
    NotificationDispatcher, NotificationPayload, OtpService, OtpServiceConfig, SendCodeRequest,
    SendCodeResult, SendOverrides, VerifyCodeResult, VerifyOverrides,
};
pub use verification::{
    AccountDirectory, AccountProfile, Gated, OrchestrationResult, RegistrationCodes,
    ResetCodesSent, ResetVerification, VerificationOrchestrator,
};
