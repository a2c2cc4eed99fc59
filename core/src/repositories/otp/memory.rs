//! In-memory implementation of OtpRepository
//!
//! Suitable for single-instance deployments and tests. Records live for the
//! lifetime of the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_record::{OtpRecord, OtpRecordPatch, OtpTransport};
use crate::errors::DomainError;

use super::trait_::OtpRepository;

type RecordKey = (OtpTransport, String);

/// Process-local OTP record store
#[derive(Clone)]
pub struct InMemoryOtpRepository {
    records: Arc<RwLock<HashMap<RecordKey, OtpRecord>>>,
}

impl InMemoryOtpRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn key(transport: OtpTransport, target: &str) -> RecordKey {
        (transport, OtpRecord::normalize_target(transport, target))
    }
}

impl Default for InMemoryOtpRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn find(
        &self,
        transport: OtpTransport,
        target: &str,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&Self::key(transport, target)).cloned())
    }

    async fn create(&self, mut record: OtpRecord) -> Result<OtpRecord, DomainError> {
        record.target = OtpRecord::normalize_target(record.transport, &record.target);
        let key = Self::key(record.transport, &record.target);

        let mut records = self.records.write().await;
        if records.contains_key(&key) {
            return Err(DomainError::BusinessRule {
                message: format!(
                    "OTP record already exists for {} {}",
                    record.transport, record.target
                ),
            });
        }

        records.insert(key, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        transport: OtpTransport,
        target: &str,
        patch: OtpRecordPatch,
    ) -> Result<OtpRecord, DomainError> {
        let mut records = self.records.write().await;

        let record = records
            .get_mut(&Self::key(transport, target))
            .ok_or_else(|| DomainError::NotFound {
                resource: "OtpRecord".to_string(),
            })?;

        record.apply(&patch);
        Ok(record.clone())
    }
}
