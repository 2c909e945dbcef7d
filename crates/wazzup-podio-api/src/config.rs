//! Configuration types for the HTTP service

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use wazzup_podio_clients::{validate_base_url, PodioConfig, WazzupConfig};

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Wazzup API and webhook settings
    pub wazzup: WazzupConfig,

    /// Podio API settings
    pub podio: PodioConfig,

    /// Reverse-path settings
    pub relay: RelayConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be non-zero".to_string(),
            });
        }

        if self.wazzup.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "wazzup.timeout_seconds must be non-zero".to_string(),
            });
        }

        if self.podio.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "podio.timeout_seconds must be non-zero".to_string(),
            });
        }

        for (field, value) in [
            ("wazzup.api_url", &self.wazzup.api_url),
            ("podio.api_url", &self.podio.api_url),
            ("podio.web_url", &self.podio.web_url),
        ] {
            validate_base_url(field, value).map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum request size in bytes
    pub max_body_size: usize,

    /// Enable CORS
    pub enable_cors: bool,

    /// Enable compression
    pub enable_compression: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_size: 10 * 1024 * 1024, // 10MB
            enable_cors: true,
            enable_compression: true,
        }
    }
}

/// Settings for forwarding Podio comments back to chat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Chat id used when a comment carries none of its own.
    ///
    /// Unset by default, in which case such comments are rejected.
    pub reply_fallback_chat_id: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
