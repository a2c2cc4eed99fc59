//! Common utility functions

pub mod duration;
pub mod validation;

// Re-export commonly used utilities
pub use duration::{format_duration_ms, TimeUnit};
pub use validation::{is_valid_email, is_valid_mobile, mask_target, normalize_mobile};
