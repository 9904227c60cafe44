// Server mode - HTTP backend for the configuration wizard
//
// Serves the reference tables the wizard renders and turns submitted
// Configurations into CloudFormation templates:
// - GET  /services           - enabled service catalog
// - GET  /config-options     - regions, instance types, runtimes, launch types
// - POST /generate-config    - Configuration -> YAML/JSON template
// - POST /generate-artifacts - Project Profile -> Terraform/IAM/CLI bundle
// - GET  /health             - liveness
//
// Features:
// - Axum HTTP server (HTTP/1.1, HTTP/2)
// - Structured logging with tracing
// - Optional permissive CORS for browser clients
// - Graceful shutdown

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use infragen_config::RuntimeConfig;
use infragen_core::{ArtifactRenderer, ReferenceData, TemplateProcessor};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

mod handlers;
mod init;

pub mod generate;
pub mod wizard;

use handlers::{config_options, generate_artifacts, generate_config, health_check, list_services};
pub use init::init_tracing;

/// Application state shared across all requests
#[derive(Clone)]
pub(crate) struct AppState {
    pub processor: Arc<TemplateProcessor>,
    pub renderer: Arc<ArtifactRenderer>,
    pub reference: &'static ReferenceData,
}

/// Error type that implements IntoResponse
///
/// Renders the same `{success: false, error}` body the generation endpoints
/// use for rejected Configurations.
pub(crate) struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request error: {:?}", self.error);
        } else {
            warn!("Rejected request: {}", self.error);
        }
        (
            self.status,
            Json(json!({
                "success": false,
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}

impl AppError {
    pub fn bad_request<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
        }
    }
}

/// Build the application router from a resolved configuration
pub fn build_router(config: &RuntimeConfig) -> Result<Router> {
    let renderer = ArtifactRenderer::with_images(config.generator.image_table())
        .context("Failed to load artifact templates")?;

    let state = AppState {
        processor: Arc::new(config.generator.processor()),
        renderer: Arc::new(renderer),
        reference: ReferenceData::builtin(),
    };

    let mut app = Router::new()
        .route("/services", get(list_services))
        .route("/config-options", get(config_options))
        .route("/generate-config", post(generate_config))
        .route("/generate-artifacts", post(generate_artifacts))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.request.max_payload_bytes))
        .with_state(state);

    if config.server.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}

/// Entry point for server mode (loads config automatically)
pub async fn run() -> Result<()> {
    let config = RuntimeConfig::load().context("Failed to load configuration")?;
    run_with_config(config).await
}

/// Entry point for server mode with pre-loaded configuration (for CLI usage)
pub async fn run_with_config(config: RuntimeConfig) -> Result<()> {
    init_tracing(&config);

    let addr = config.server.listen_addr.clone();
    let app = build_router(&config)?;

    let enabled: Vec<&str> = config
        .generator
        .enabled_services
        .iter()
        .map(|service| service.id())
        .collect();
    info!(
        services = ?enabled,
        format = %config.generator.output_format,
        cors = config.server.cors_enabled,
        "Template generation configured"
    );
    info!(
        "Max payload size set to {} bytes",
        config.request.max_payload_bytes
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    info!("infragen HTTP endpoint listening on http://{}", addr);
    info!("Routes:");
    info!("  GET  http://{}/services           - Service catalog", addr);
    info!("  GET  http://{}/config-options     - Wizard reference data", addr);
    info!("  POST http://{}/generate-config    - Template generation", addr);
    info!("  POST http://{}/generate-artifacts - Project artifact bundle", addr);
    info!("  GET  http://{}/health             - Health check", addr);
    info!("Press Ctrl+C or send SIGTERM to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");

    Ok(())
}
