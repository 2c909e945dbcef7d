//! # Wazzup-Podio HTTP Service
//!
//! HTTP server that relays Wazzup chat webhooks into Podio and forwards
//! Podio comments back to chat.
//!
//! This service provides:
//! - Wazzup webhook endpoint with HMAC signature validation
//! - Podio webhook endpoint for the reverse path
//! - A direct outbound send endpoint
//! - Liveness and connection status endpoints

pub mod config;
pub mod errors;
pub mod handlers;
pub mod responses;

pub use config::{LoggingConfig, RelayConfig, ServerConfig, ServiceConfig};
pub use errors::{ConfigError, HandlerError, ServiceError};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};
use wazzup_podio_core::{MessageSender, RecordStore, SignatureValidator};

/// Header carrying the per-request correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: ServiceConfig,

    /// Checks `X-Wazzup-Signature` on inbound Wazzup webhooks
    pub signature_validator: Arc<dyn SignatureValidator>,

    /// Destination for relayed records (Podio)
    pub record_store: Arc<dyn RecordStore>,

    /// Outbound chat delivery (Wazzup)
    pub message_sender: Arc<dyn MessageSender>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        signature_validator: Arc<dyn SignatureValidator>,
        record_store: Arc<dyn RecordStore>,
        message_sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            config,
            signature_validator,
            record_store,
            message_sender,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the HTTP router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/", get(handlers::handle_index))
        .route("/status", get(handlers::handle_status));

    let webhook_routes = Router::new()
        .route("/webhook/wazzup", post(handlers::handle_wazzup_webhook))
        .route("/webhook/podio", post(handlers::handle_podio_webhook))
        .route("/webhook/test", post(handlers::handle_webhook_test));

    let api_routes = Router::new().route("/send_message", post(handlers::handle_send_message));

    let server = &state.config.server;

    let mut router = Router::new()
        .merge(health_routes)
        .merge(webhook_routes)
        .merge(api_routes)
        .fallback(handlers::handle_not_found)
        .layer(DefaultBodyLimit::max(server.max_body_size));

    if server.enable_compression {
        router = router.layer(CompressionLayer::new());
    }
    if server.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .into_inner(),
        )
        .with_state(state)
}

// ============================================================================
// Server
// ============================================================================

/// Bind the configured address and serve until SIGINT or SIGTERM.
pub async fn start_server(state: AppState) -> Result<(), ServiceError> {
    let address = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: address.clone(),
            message: e.to_string(),
        })?;

    info!("Starting HTTP server on {}", address);

    // In-flight requests complete before the server stops.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Assign or propagate a correlation id and log each request's outcome.
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());
    request.extensions_mut().insert(correlation_id.clone());

    info!(
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }

    let status = response.status();
    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
