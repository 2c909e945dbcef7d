//! # Wazzup-Podio Service
//!
//! Binary entry point for the Wazzup-Podio relay.
//!
//! This executable:
//! - Loads configuration from files and the environment
//! - Initializes logging
//! - Creates the Podio and Wazzup clients
//! - Starts the HTTP server from wazzup-podio-api

mod logging;
mod settings;

use std::sync::Arc;
use tracing::{error, info, warn};
use wazzup_podio_api::{start_server, AppState, ServiceError};
use wazzup_podio_clients::{PodioClient, WazzupClient};
use wazzup_podio_core::HmacSignatureValidator;

#[tokio::main]
async fn main() {
    let loaded = settings::load_config();

    let logging_config = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    logging::init_tracing(&logging_config);

    info!("Starting Wazzup-Podio Service");

    let service_config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Service configuration is invalid; aborting");
            std::process::exit(3);
        }
    };

    if !service_config.podio.is_configured() {
        warn!("Podio credentials are incomplete; item creation will fail until configured");
    }
    if service_config.wazzup.api_key.is_empty() {
        warn!("Wazzup API key is not set; replies to chat will fail until configured");
    }

    let podio_client = match PodioClient::new(service_config.podio.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create Podio client; aborting");
            std::process::exit(3);
        }
    };

    let wazzup_client = match WazzupClient::new(service_config.wazzup.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create Wazzup client; aborting");
            std::process::exit(3);
        }
    };

    let signature_validator =
        HmacSignatureValidator::new(service_config.wazzup.webhook_secret.clone());

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        "Starting HTTP server"
    );

    let state = AppState::new(
        service_config,
        Arc::new(signature_validator),
        Arc::new(podio_client),
        Arc::new(wazzup_client),
    );

    if let Err(e) = start_server(state).await {
        error!("Server stopped with error: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }
}
