//! Multi-channel verification
//!
//! Drives the OTP engine across email and mobile for registration and
//! password reset, and gates the privileged action on every channel passing.

mod directory;
mod orchestrator;
mod types;

#[cfg(test)]
mod tests;

pub use directory::{AccountDirectory, AccountProfile};
pub use orchestrator::VerificationOrchestrator;
pub use types::{Gated, OrchestrationResult, RegistrationCodes, ResetCodesSent, ResetVerification};
