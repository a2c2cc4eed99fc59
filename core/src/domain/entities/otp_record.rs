//! OTP record entity, one per (transport, target) pair.

use chrono::{DateTime, Duration, Utc};
use otp_shared::utils::normalize_mobile;
use serde::{Deserialize, Serialize};

/// Delivery channel of a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpTransport {
    Email,
    Mobile,
}

impl OtpTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpTransport::Email => "email",
            OtpTransport::Mobile => "mobile",
        }
    }
}

impl std::fmt::Display for OtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtpTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(OtpTransport::Email),
            "mobile" => Ok(OtpTransport::Mobile),
            _ => Err(format!("Invalid otp transport: {}", s)),
        }
    }
}

/// Verification code state for a single (transport, target) key
///
/// Expiry, resend throttling and block lifting are all derived from
/// `last_sent_at`; no deadline is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Normalized email address or mobile number, see [`OtpRecord::normalize_target`]
    pub target: String,

    /// Channel the code was sent over
    pub transport: OtpTransport,

    /// Currently active code
    pub code: String,

    /// Timestamp of the last issuance
    pub last_sent_at: DateTime<Utc>,

    /// Issuances since the counter was last reset
    pub attempt: u32,

    /// Failed verifications since the current code was issued
    pub retries: u32,

    /// Whether send and verify are refused for this key
    pub blocked: bool,

    /// Whether the active code has been verified
    pub last_code_verified: bool,
}

impl OtpRecord {
    /// Creates the record for a first issuance
    ///
    /// # Arguments
    ///
    /// * `transport` - Channel the code is sent over
    /// * `target` - Destination, normalized for `transport`
    /// * `code` - The freshly generated code
    /// * `sent_at` - Issuance timestamp
    pub fn new(
        transport: OtpTransport,
        target: &str,
        code: String,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target: Self::normalize_target(transport, target),
            transport,
            code,
            last_sent_at: sent_at,
            attempt: 0,
            retries: 0,
            blocked: false,
            last_code_verified: false,
        }
    }

    /// Record key of `target` on `transport`
    ///
    /// Emails are trimmed and lower-cased; mobile numbers lose their
    /// formatting characters.
    pub fn normalize_target(transport: OtpTransport, target: &str) -> String {
        match transport {
            OtpTransport::Email => target.trim().to_lowercase(),
            OtpTransport::Mobile => normalize_mobile(target),
        }
    }

    /// End of a window of `window_ms` anchored at the last issuance
    fn window_end(&self, window_ms: u64) -> Option<DateTime<Utc>> {
        let ms = i64::try_from(window_ms).ok()?;
        self.last_sent_at
            .checked_add_signed(Duration::milliseconds(ms))
    }

    /// Whether the code lifetime (and resend throttle) window has passed
    pub fn is_timed_out(&self, now: DateTime<Utc>, timeout_ms: u64) -> bool {
        self.window_end(timeout_ms).map_or(false, |end| now > end)
    }

    /// Whether the block window has passed, which lifts a block on the next send
    pub fn is_block_window_elapsed(&self, now: DateTime<Utc>, block_timeout_ms: u64) -> bool {
        self.window_end(block_timeout_ms).map_or(false, |end| now > end)
    }

    /// Milliseconds left in the block window, zero once it has elapsed
    pub fn block_remaining_ms(&self, now: DateTime<Utc>, block_timeout_ms: u64) -> u64 {
        match self.window_end(block_timeout_ms) {
            Some(end) if end > now => (end - now).num_milliseconds().max(0) as u64,
            Some(_) => 0,
            None => block_timeout_ms,
        }
    }

    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: &OtpRecordPatch) {
        if let Some(code) = &patch.code {
            self.code = code.clone();
        }
        if let Some(last_sent_at) = patch.last_sent_at {
            self.last_sent_at = last_sent_at;
        }
        if let Some(attempt) = patch.attempt {
            self.attempt = attempt;
        }
        if let Some(retries) = patch.retries {
            self.retries = retries;
        }
        if let Some(blocked) = patch.blocked {
            self.blocked = blocked;
        }
        if let Some(last_code_verified) = patch.last_code_verified {
            self.last_code_verified = last_code_verified;
        }
    }
}

/// Partial update of an [`OtpRecord`]; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpRecordPatch {
    pub code: Option<String>,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub attempt: Option<u32>,
    pub retries: Option<u32>,
    pub blocked: Option<bool>,
    pub last_code_verified: Option<bool>,
}

impl OtpRecordPatch {
    /// A new issuance: fresh code, counters for the new cycle, flags cleared
    pub fn reissue(code: String, sent_at: DateTime<Utc>, attempt: u32) -> Self {
        Self {
            code: Some(code),
            last_sent_at: Some(sent_at),
            attempt: Some(attempt),
            retries: Some(0),
            blocked: Some(false),
            last_code_verified: Some(false),
        }
    }

    pub fn block() -> Self {
        Self {
            blocked: Some(true),
            ..Default::default()
        }
    }

    /// A failed verification
    pub fn failed_retry(retries: u32, blocked: bool) -> Self {
        Self {
            retries: Some(retries),
            blocked: Some(blocked),
            ..Default::default()
        }
    }

    pub fn verified() -> Self {
        Self {
            last_code_verified: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
