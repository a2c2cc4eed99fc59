//! OTP repository trait defining the interface for OTP record persistence.
//!
//! Records are keyed by (transport, target). Implementations must pass the
//! target through `OtpRecord::normalize_target` before every lookup and
//! write, so emails compare case-insensitively and mobile numbers ignore
//! formatting.

use async_trait::async_trait;

use crate::domain::entities::otp_record::{OtpRecord, OtpRecordPatch, OtpTransport};
use crate::errors::DomainError;

/// Repository trait for OtpRecord persistence operations
///
/// Serializing concurrent read-decide-write sequences on one key is the
/// caller's job; implementations only need single-statement atomicity.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Find the record for a key
    ///
    /// # Arguments
    /// * `transport` - Channel of the record
    /// * `target` - Email address or mobile number, any case
    ///
    /// # Returns
    /// * `Ok(Some(OtpRecord))` - Record found
    /// * `Ok(None)` - No code was ever sent to this key
    /// * `Err(DomainError)` - Storage error occurred
    async fn find(
        &self,
        transport: OtpTransport,
        target: &str,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Create the record for a first issuance
    ///
    /// # Returns
    /// * `Ok(OtpRecord)` - The stored record
    /// * `Err(DomainError)` - A record already exists for the key, or storage failed
    async fn create(&self, record: OtpRecord) -> Result<OtpRecord, DomainError>;

    /// Apply a partial update to an existing record
    ///
    /// # Returns
    /// * `Ok(OtpRecord)` - The record after the update
    /// * `Err(DomainError::NotFound)` - No record for the key
    async fn update(
        &self,
        transport: OtpTransport,
        target: &str,
        patch: OtpRecordPatch,
    ) -> Result<OtpRecord, DomainError>;
}
