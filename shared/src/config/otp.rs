//! One-time verification code configuration

use serde::{Deserialize, Serialize};

/// Process-wide OTP defaults. Per-call overrides fall back to these values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Code returned by the generator outside production-app mode
    pub default_code: String,

    /// Number of digits in a generated code
    pub length: usize,

    /// Issuances allowed before the target gets blocked
    pub max_attempt: u32,

    /// Failed verifications allowed before the target gets blocked
    pub max_retries: u32,

    /// Code lifetime and resend throttle window in milliseconds
    pub timeout_ms: u64,

    /// Block window in milliseconds, anchored at the last issuance
    pub block_timeout_ms: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            default_code: String::from("000000"),
            length: 6,
            max_attempt: 10,
            max_retries: 5,
            timeout_ms: 120_000,          // 2 minutes
            block_timeout_ms: 86_400_000, // 24 hours
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_code: std::env::var("OTP_DEFAULT_CODE").unwrap_or(defaults.default_code),
            length: env_or("OTP_LENGTH", defaults.length),
            max_attempt: env_or("OTP_MAX_ATTEMPT", defaults.max_attempt),
            max_retries: env_or("OTP_MAX_RETRIES", defaults.max_retries),
            timeout_ms: env_or("OTP_TIMEOUT_MS", defaults.timeout_ms),
            block_timeout_ms: env_or("OTP_BLOCK_TIMEOUT_MS", defaults.block_timeout_ms),
        }
    }

    /// Set the code lifetime in seconds
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_ms = secs.saturating_mul(1000);
        self
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
