//! Account lookup seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::otp_record::OtpTransport;
use crate::errors::DomainResult;

/// The part of an account the verification flows need
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    /// Name used to address the account holder in emails
    pub display_name: String,
}

/// Lookup of existing accounts by email address or mobile number
///
/// Targets arrive normalized by `OtpRecord::normalize_target`.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_account(
        &self,
        transport: OtpTransport,
        target: &str,
    ) -> DomainResult<Option<AccountProfile>>;
}
