//! OTP engine
//!
//! - Code generation (fixed outside a production app, random digits inside)
//! - Issuance with resend throttling, attempt caps and blocking
//! - Verification with expiry, retry caps and blocking
//! - Context-keyed message rendering and detached delivery

mod config;
mod dispatcher;
mod generator;
mod key_lock;
mod service;
mod templates;
mod types;

#[cfg(test)]
mod tests;

pub use config::{OtpServiceConfig, SendOverrides, VerifyOverrides};
pub use dispatcher::NotificationDispatcher;
pub use generator::CodeGenerator;
pub use key_lock::KeyedLocks;
pub use service::OtpService;
pub use templates::{render, EmailTemplateData, NotificationPayload};
pub use types::{SendCodeRequest, SendCodeResult, VerifyCodeResult};
