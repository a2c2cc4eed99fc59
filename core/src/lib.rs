//! # OTP Gate Core
//!
//! One-time verification codes over email and mobile, and the multi-channel
//! orchestration that gates registration and password reset on them.
//! This crate contains the OTP record entity, the issuance and verification
//! policies, repository interfaces with an in-memory store, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::{InMemoryOtpRepository, OtpRepository};
pub use services::{
    AccountDirectory, AccountProfile, Gated, NotificationDispatcher, NotificationPayload,
    OrchestrationResult, OtpService, OtpServiceConfig, RegistrationCodes, ResetCodesSent,
    ResetVerification, SendCodeRequest, SendCodeResult, SendOverrides, VerificationOrchestrator,
    VerifyCodeResult, VerifyOverrides,
};
