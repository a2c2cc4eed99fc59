//! Configuration loading for infrastructure services
//!
//! Layers, lowest precedence first:
//! - Environment variables read by `AppConfig::from_env` (after `.env`)
//! - `config.<environment>.toml` in the working directory, if present
//! - `OTP_GATE_*` variables, `__` separating nested keys
//!   (e.g. `OTP_GATE_OTP__TIMEOUT_MS=60000`)

use ::config::{Config, Environment, File};
use otp_shared::config::AppConfig;

use crate::InfrastructureError;

/// Prefix of layered environment overrides
pub const ENV_PREFIX: &str = "OTP_GATE";

/// Load the application configuration
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok(); // Load .env file if present

    let base = AppConfig::from_env();
    let config_file = base.environment.runtime.config_file().to_string();

    let config = layer(&base)?
        .add_source(File::with_name(&config_file).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<AppConfig>()?;

    tracing::debug!(
        config_file = %config_file,
        store = ?config.store,
        production_app = config.environment.is_production_app(),
        "Configuration loaded"
    );

    Ok(config)
}

/// Builder seeded with `base` as the lowest-precedence source
fn layer(
    base: &AppConfig,
) -> Result<::config::ConfigBuilder<::config::builder::DefaultState>, InfrastructureError> {
    Ok(Config::builder().add_source(Config::try_from(base)?))
}
