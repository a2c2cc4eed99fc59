//! Record store selected at startup

use async_trait::async_trait;

use otp_core::domain::entities::otp_record::{OtpRecord, OtpRecordPatch, OtpTransport};
use otp_core::errors::DomainError;
use otp_core::repositories::{InMemoryOtpRepository, OtpRepository};

use crate::database::MySqlOtpRepository;

/// The configured OTP record store
#[derive(Clone)]
pub enum OtpStore {
    Memory(InMemoryOtpRepository),
    MySql(MySqlOtpRepository),
}

impl OtpStore {
    pub fn memory() -> Self {
        OtpStore::Memory(InMemoryOtpRepository::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            OtpStore::Memory(_) => "memory",
            OtpStore::MySql(_) => "mysql",
        }
    }
}

#[async_trait]
impl OtpRepository for OtpStore {
    async fn find(
        &self,
        transport: OtpTransport,
        target: &str,
    ) -> Result<Option<OtpRecord>, DomainError> {
        match self {
            OtpStore::Memory(store) => store.find(transport, target).await,
            OtpStore::MySql(store) => store.find(transport, target).await,
        }
    }

    async fn create(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        match self {
            OtpStore::Memory(store) => store.create(record).await,
            OtpStore::MySql(store) => store.create(record).await,
        }
    }

    async fn update(
        &self,
        transport: OtpTransport,
        target: &str,
        patch: OtpRecordPatch,
    ) -> Result<OtpRecord, DomainError> {
        match self {
            OtpStore::Memory(store) => store.update(transport, target, patch).await,
            OtpStore::MySql(store) => store.update(transport, target, patch).await,
        }
    }
}
