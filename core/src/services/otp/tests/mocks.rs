//! Mock implementations for testing the OTP service

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use otp_shared::config::{EnvironmentPolicy, OtpConfig};

use crate::domain::entities::otp_record::OtpTransport;
use crate::repositories::otp::memory::InMemoryOtpRepository;
use crate::services::otp::{
    NotificationDispatcher, NotificationPayload, OtpService, OtpServiceConfig,
};

/// A delivery seen by the recording dispatcher
#[derive(Debug, Clone)]
pub struct Delivery {
    pub transport: OtpTransport,
    pub target: String,
    pub payload: NotificationPayload,
}

// Mock dispatcher that records every delivery
pub struct RecordingDispatcher {
    pub deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self {
            deliveries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Poll until `count` deliveries arrived or a second passed
    pub async fn wait_for(&self, count: usize) -> Vec<Delivery> {
        for _ in 0..100 {
            let deliveries = self.deliveries();
            if deliveries.len() >= count {
                return deliveries;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.deliveries()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send_message(
        &self,
        transport: OtpTransport,
        target: &str,
        payload: &NotificationPayload,
    ) -> Result<String, String> {
        self.deliveries.lock().unwrap().push(Delivery {
            transport,
            target: target.to_string(),
            payload: payload.clone(),
        });
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }
}

// Mock dispatcher whose transport is always down
pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn send_message(
        &self,
        _transport: OtpTransport,
        _target: &str,
        _payload: &NotificationPayload,
    ) -> Result<String, String> {
        Err("Transport unavailable".to_string())
    }
}

pub type TestService = OtpService<InMemoryOtpRepository, RecordingDispatcher>;

pub struct Harness {
    pub service: Arc<TestService>,
    pub repository: Arc<InMemoryOtpRepository>,
    pub dispatcher: Arc<RecordingDispatcher>,
}

pub fn harness(config: OtpServiceConfig) -> Harness {
    let repository = Arc::new(InMemoryOtpRepository::new());
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let service = Arc::new(OtpService::new(
        Arc::clone(&repository),
        Arc::clone(&dispatcher),
        config,
    ));
    Harness {
        service,
        repository,
        dispatcher,
    }
}

/// Fixed code "000000", no delivery
pub fn development_config() -> OtpServiceConfig {
    OtpServiceConfig::default()
}

/// Random codes and real delivery
pub fn production_config() -> OtpServiceConfig {
    OtpServiceConfig::new(&OtpConfig::default(), &EnvironmentPolicy::production())
}
