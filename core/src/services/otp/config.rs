//! Configuration for the OTP service

use otp_shared::config::{AppConfig, EnvironmentPolicy, OtpConfig};

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Code handed out outside production-app mode
    pub default_code: String,
    /// Number of digits in a generated code
    pub length: usize,
    /// Issuances allowed before the target is blocked
    pub max_attempt: u32,
    /// Failed verifications allowed before the target is blocked
    pub max_retries: u32,
    /// Code lifetime and resend throttle window in milliseconds
    pub timeout_ms: u64,
    /// Block window in milliseconds
    pub block_timeout_ms: u64,
    /// Random codes and real delivery only in a live production deployment
    pub production_app: bool,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self::new(&OtpConfig::default(), &EnvironmentPolicy::default())
    }
}

impl OtpServiceConfig {
    pub fn new(otp: &OtpConfig, environment: &EnvironmentPolicy) -> Self {
        Self {
            default_code: otp.default_code.clone(),
            length: otp.length,
            max_attempt: otp.max_attempt,
            max_retries: otp.max_retries,
            timeout_ms: otp.timeout_ms,
            block_timeout_ms: otp.block_timeout_ms,
            production_app: environment.is_production_app(),
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(&config.otp, &config.environment)
    }

    pub(crate) fn send_policy(&self, overrides: &SendOverrides) -> SendPolicy {
        SendPolicy {
            length: pick(overrides.length, self.length),
            max_attempt: pick(overrides.max_attempt, self.max_attempt),
            timeout_ms: pick(overrides.timeout_ms, self.timeout_ms),
            block_timeout_ms: pick(overrides.block_timeout_ms, self.block_timeout_ms),
        }
    }

    pub(crate) fn verify_policy(&self, overrides: &VerifyOverrides) -> VerifyPolicy {
        VerifyPolicy {
            max_retries: pick(overrides.max_retries, self.max_retries),
            timeout_ms: pick(overrides.timeout_ms, self.timeout_ms),
            block_timeout_ms: pick(overrides.block_timeout_ms, self.block_timeout_ms),
        }
    }
}

/// Per-call overrides for `send`. Absent or zero values use the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOverrides {
    pub length: Option<usize>,
    pub max_attempt: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub block_timeout_ms: Option<u64>,
}

/// Per-call overrides for `verify`. Absent or zero values use the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOverrides {
    pub max_retries: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub block_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SendPolicy {
    pub length: usize,
    pub max_attempt: u32,
    pub timeout_ms: u64,
    pub block_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VerifyPolicy {
    pub max_retries: u32,
    pub timeout_ms: u64,
    pub block_timeout_ms: u64,
}

fn pick<T: Copy + Default + PartialEq>(value: Option<T>, default: T) -> T {
    value.filter(|v| *v != T::default()).unwrap_or(default)
}
