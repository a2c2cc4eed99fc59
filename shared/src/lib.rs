//! Shared utilities and common types for the OTP Gate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (environment policy, OTP defaults, storage, notification)
//! - Utility functions (duration formatting, target validation and masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, EnvironmentPolicy, LoggingConfig,
    NotificationConfig, OtpConfig, StoreBackend,
};
pub use utils::{duration, validation};
