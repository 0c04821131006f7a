use axum::extract::{Path, State};
use axum::Json;
use stack_core::Envelope;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Services reported by the orchestrator, or an error envelope", body = Envelope)
    ),
    tag = "stack"
)]
pub async fn get_status(State(state): State<AppState>) -> Result<Json<Envelope>, AppError> {
    debug!("Listing stack services");
    Ok(Json(state.stack.status().await?))
}

#[utoipa::path(
    post,
    path = "/api/deploy",
    responses(
        (status = 200, description = "Pull and up result", body = Envelope)
    ),
    tag = "stack"
)]
pub async fn deploy_stack(State(state): State<AppState>) -> Result<Json<Envelope>, AppError> {
    Ok(Json(state.stack.deploy().await?))
}

#[utoipa::path(
    post,
    path = "/api/stop",
    responses(
        (status = 200, description = "Teardown result", body = Envelope)
    ),
    tag = "stack"
)]
pub async fn stop_stack(State(state): State<AppState>) -> Result<Json<Envelope>, AppError> {
    Ok(Json(state.stack.stop().await?))
}

#[utoipa::path(
    get,
    path = "/api/logs/{service}",
    params(
        ("service" = String, Path, description = "Service name from the configured service list")
    ),
    responses(
        (status = 200, description = "Recent log lines for the service", body = Envelope)
    ),
    tag = "stack"
)]
pub async fn get_logs(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<Json<Envelope>, AppError> {
    debug!(service = %service, "Fetching service logs");
    Ok(Json(state.stack.logs(&service).await?))
}

#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Environment file contents and expected services", body = Envelope)
    ),
    tag = "stack"
)]
pub async fn get_config(State(state): State<AppState>) -> Result<Json<Envelope>, AppError> {
    Ok(Json(state.stack.env_config().await?))
}
