use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use log::{debug, warn};

/// Liveness check handler
#[utoipa::path(
    get,
    path = "/healthz",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is alive", body = String)
    )
)]
pub(crate) async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness check handler, verifies the resource stores
#[utoipa::path(
    get,
    path = "/readyz",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready", body = String),
        (status = 503, description = "Service is not ready", body = String)
    )
)]
pub(crate) async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match state.health_check().await {
        Ok(()) => {
            debug!("Readiness check passed");
            (StatusCode::OK, "ok".to_string())
        }
        Err(e) => {
            warn!("Readiness check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, format!("storage: {e}"))
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
