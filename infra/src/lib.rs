//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for OTP Gate. It provides
//! concrete implementations for the collaborators the core depends on and
//! wires them into a ready-to-use OTP service.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Config**: `.env`, per-environment TOML file and `OTP_GATE_*` overrides
//! - **Telemetry**: `tracing-subscriber` initialisation
//! - **Database**: MySQL record store using SQLx
//! - **Notification**: email and SMS transports behind the core dispatcher

// Re-export core types for convenience
pub use otp_core::errors::*;

pub mod config;
pub mod database;
pub mod notification;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use otp_core::services::otp::{OtpService, OtpServiceConfig};
use otp_shared::config::{AppConfig, StoreBackend};

use database::{DatabasePool, MySqlOtpRepository};
use notification::NotificationRouter;
use store::OtpStore;

/// The OTP service as wired by [`initialize`]
pub type AppOtpService = OtpService<OtpStore, NotificationRouter>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Effective configuration
    pub config: Arc<AppConfig>,
    /// OTP engine over the selected store and transports
    pub otp_service: Arc<AppOtpService>,
    /// Connection pool, present when the MySQL store is selected
    pub database: Option<DatabasePool>,
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - Configuration from `.env`, config file and environment
/// - Tracing output
/// - The record store (in-memory or MySQL, with schema bootstrap)
/// - Notification transports
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    let config = config::load_config()?;
    telemetry::init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment.runtime,
        app_environment = %config.environment.app,
        store = ?config.store,
        "Initializing infrastructure services..."
    );

    let services = build_services(config).await?;

    tracing::info!("Infrastructure services initialized successfully");
    Ok(services)
}

/// Wire the services for an already loaded configuration
pub async fn build_services(config: AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    let (store, database) = match config.store {
        StoreBackend::Memory => (OtpStore::memory(), None),
        StoreBackend::MySql => {
            let pool = DatabasePool::new(config.database.clone()).await?;
            let repository = MySqlOtpRepository::new(pool.get_pool().clone());
            repository.ensure_schema().await?;
            (OtpStore::MySql(repository), Some(pool))
        }
    };

    tracing::info!(store = store.backend_name(), "OTP record store ready");

    let dispatcher = notification::create_dispatcher(&config.notification);
    let otp_service = OtpService::new(
        Arc::new(store),
        Arc::new(dispatcher),
        OtpServiceConfig::from_app_config(&config),
    );

    Ok(InfrastructureServices {
        config: Arc::new(config),
        otp_service: Arc::new(otp_service),
        database,
    })
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification transport error
    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<::config::ConfigError> for InfrastructureError {
    fn from(error: ::config::ConfigError) -> Self {
        InfrastructureError::Config(error.to_string())
    }
}
