// HTTP request handlers for server mode
//
// Reference data, template generation and artifact bundle endpoints

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use infragen_core::{Configuration, GenerateResponse, ProjectProfile};
use metrics::{counter, histogram};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{AppError, AppState};

/// GET /services - Enabled entries of the service catalog
pub(crate) async fn list_services(State(state): State<AppState>) -> impl IntoResponse {
    let services: Vec<_> = state
        .reference
        .services()
        .iter()
        .filter(|info| state.processor.is_enabled(info.id))
        .collect();
    Json(json!({ "services": services }))
}

/// GET /config-options - Reference tables for the wizard's pickers
pub(crate) async fn config_options(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.reference.config_options())
}

/// POST /generate-config - Validate a Configuration and build its template
pub(crate) async fn generate_config(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let start = Instant::now();
    counter!("infragen.generate.requests", 1);
    histogram!("infragen.generate.bytes", body.len() as f64);

    let config: Configuration = parse_body(&body)?;
    debug!(fields = config.len(), "Received configuration");

    let response = state.processor.handle(&config);
    match &response {
        GenerateResponse::Success(template) => {
            counter!("infragen.generate.success", 1, "service" => template.service.id());
            info!(
                service = %template.service,
                app_name = %template.app_name,
                filename = %template.filename(),
                "Generated template"
            );
        }
        GenerateResponse::Failure(err) => {
            counter!("infragen.generate.rejected", 1, "reason" => err.error_type());
            warn!(
                error_type = err.error_type(),
                missing = ?err.missing_fields(),
                "Rejected configuration: {}",
                err
            );
        }
    }

    histogram!(
        "infragen.generate.duration_ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let status = StatusCode::from_u16(response.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    Ok((status, Json(response)).into_response())
}

/// POST /generate-artifacts - Render the Terraform/IAM/CLI bundle for a project
pub(crate) async fn generate_artifacts(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    counter!("infragen.artifacts.requests", 1);

    let profile: ProjectProfile = parse_body(&body)?;
    let bundle = state.renderer.bundle(&profile).map_err(|err| {
        counter!("infragen.artifacts.rejected", 1, "reason" => err.error_type());
        AppError::bad_request(err)
    })?;

    info!(
        project = %profile.project_name,
        files = bundle.len(),
        components = ?profile.components(),
        "Rendered project artifacts"
    );

    Ok(Json(json!({
        "success": true,
        "files": bundle,
    }))
    .into_response())
}

/// GET /health - Basic health check
pub(crate) async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "healthy"})))
}

/// Decode a JSON request body, answering malformed input with a 400
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        counter!("infragen.requests.malformed", 1);
        AppError::bad_request(anyhow::anyhow!("Invalid JSON body: {}", e))
    })
}
