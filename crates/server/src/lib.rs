pub mod config;
pub mod error;
pub mod routes;
pub mod stack_service;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stack Control API",
        version = "0.1.0",
        description = "Status, deploy, stop, logs and configuration for the local container stack"
    ),
    paths(
        routes::health_check,
        routes::get_status,
        routes::deploy_stack,
        routes::stop_stack,
        routes::get_logs,
        routes::get_config,
    ),
    components(schemas(
        routes::HealthResponse,
        stack_core::Envelope,
        stack_core::ResponseStatus,
        stack_core::ErrorKind,
        stack_core::ServiceRecord,
        stack_core::DecodeFailure,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "stack", description = "Stack control endpoints"),
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let dashboard_dir = state.dashboard_dir.clone();

    let api_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health_check))
        .route("/api/status", get(routes::get_status))
        .route("/api/deploy", post(routes::deploy_stack))
        .route("/api/stop", post(routes::stop_stack))
        .route("/api/logs/{service}", get(routes::get_logs))
        .route("/api/config", get(routes::get_config));

    let app = if let Some(dashboard_dir) = dashboard_dir {
        let index_file = dashboard_dir.join("index.html");
        let serve_dir =
            ServeDir::new(&dashboard_dir).not_found_service(ServeFile::new(&index_file));
        api_router.fallback_service(serve_dir)
    } else {
        api_router.route("/", get(routes::dashboard))
    };

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
