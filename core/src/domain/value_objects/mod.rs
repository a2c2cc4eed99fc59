//! Value objects representing immutable domain concepts.

pub mod otp_context;

// Re-export commonly used types
pub use otp_context::{ChannelParams, OtpContext};
