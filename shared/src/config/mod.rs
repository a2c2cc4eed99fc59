//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `database` - Record store selection and MySQL pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `notification` - Code delivery transports
//! - `otp` - Verification code lifetimes, caps and block windows

pub mod database;
pub mod environment;
pub mod notification;
pub mod otp;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use database::{DatabaseConfig, StoreBackend};
pub use environment::{Environment, EnvironmentPolicy, LogFormat, LoggingConfig};
pub use notification::NotificationConfig;
pub use otp::OtpConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Runtime and app environment
    pub environment: EnvironmentPolicy,

    /// OTP defaults
    #[serde(default)]
    pub otp: OtpConfig,

    /// Record store selection
    #[serde(default)]
    pub store: StoreBackend,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Notification configuration
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let environment = EnvironmentPolicy::default();
        Self {
            environment,
            otp: OtpConfig::default(),
            store: StoreBackend::default(),
            database: DatabaseConfig::default(),
            notification: NotificationConfig::default(),
            logging: LoggingConfig::for_environment(environment.runtime),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = EnvironmentPolicy::from_env();
        let store = std::env::var("OTP_STORE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();

        Self {
            environment,
            otp: OtpConfig::from_env(),
            store,
            database: DatabaseConfig::from_env(),
            notification: NotificationConfig::from_env(),
            logging: LoggingConfig::for_environment(environment.runtime),
        }
    }
}
