//! Configuration loading.
//!
//! Sources, later ones overriding earlier ones:
//!  1. `/etc/wazzup-podio/service.yaml`
//!  2. `./config/service.yaml`
//!  3. the file named by `RELAY_CONFIG_FILE`
//!  4. environment variables prefixed `RELAY__`, e.g. `RELAY__SERVER__PORT`
//!  5. the flat variable names of earlier deployments (`PORT`,
//!     `WAZZUP_API_KEY`, `PODIO_APP_ID`, ...)
//!
//! Every field has a serde default, so missing files produce a usable
//! configuration. A malformed file or a value of the wrong type is an error.

use std::path::Path;
use tracing::info;
use wazzup_podio_api::{ConfigError, ServiceConfig};

/// Variable naming an explicit configuration file
pub const CONFIG_FILE_ENV: &str = "RELAY_CONFIG_FILE";

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "RELAY";

/// Base names (without extension) of the default configuration files
pub const DEFAULT_CONFIG_FILES: &[&str] = &["/etc/wazzup-podio/service", "config/service"];

/// Flat environment variables and the configuration keys they set
pub const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("WAZZUP_WEBHOOK_SECRET", "wazzup.webhook_secret"),
    ("WAZZUP_API_KEY", "wazzup.api_key"),
    ("WAZZUP_CHANNEL_ID", "wazzup.channel_id"),
    ("WAZZUP_API_URL", "wazzup.api_url"),
    ("PODIO_CLIENT_ID", "podio.client_id"),
    ("PODIO_CLIENT_SECRET", "podio.client_secret"),
    ("PODIO_APP_ID", "podio.app_id"),
    ("PODIO_APP_TOKEN", "podio.app_token"),
    ("PODIO_SPACE_ID", "podio.space_id"),
    ("REPLY_FALLBACK_CHAT_ID", "relay.reply_fallback_chat_id"),
    ("LOG_LEVEL", "logging.level"),
];

/// Load and validate the service configuration from the default locations.
pub fn load_config() -> Result<ServiceConfig, ConfigError> {
    load_config_from(DEFAULT_CONFIG_FILES)
}

/// Load and validate the service configuration, reading the given optional
/// YAML files before the explicit file and the environment.
pub fn load_config_from(base_files: &[&str]) -> Result<ServiceConfig, ConfigError> {
    let mut builder = config::Config::builder();

    for base in base_files {
        builder = builder.add_source(
            config::File::with_name(base)
                .required(false)
                .format(config::FileFormat::Yaml),
        );
    }

    if let Some(explicit_path) = env_value(CONFIG_FILE_ENV) {
        if !Path::new(&explicit_path).is_file() {
            return Err(ConfigError::Missing {
                key: format!("{} ({})", CONFIG_FILE_ENV, explicit_path),
            });
        }
        info!(path = %explicit_path, "Loading configuration from explicit path");
        builder = builder.add_source(
            config::File::with_name(&explicit_path)
                .required(true)
                .format(config::FileFormat::Yaml),
        );
    }

    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    for (variable, key) in LEGACY_ENV_KEYS {
        builder = builder
            .set_override_option(*key, env_value(variable))
            .map_err(|e| ConfigError::Load {
                message: e.to_string(),
            })?;
    }

    let service_config: ServiceConfig = builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| ConfigError::Load {
            message: e.to_string(),
        })?;

    service_config.validate()?;
    Ok(service_config)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
