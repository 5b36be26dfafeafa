//! Service instance routes.
//!
//! The instance name and app host arrive in the path but every instance maps
//! onto the same manager, so they are only logged.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use redisapi_common::error::AppError;
use redisapi_common::types::BindResult;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resources", post(add_instance))
        .route("/resources/{name}", post(bind))
        .route("/resources/{name}", delete(remove_instance))
        .route("/resources/{name}/hostname/{host}", delete(unbind))
        .route("/resources/{name}/status", get(status))
}

/// POST /resources: provision an instance.
async fn add_instance(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.manager.add_instance().await?;
    tracing::info!(manager = state.manager.name(), "Instance added");
    Ok(StatusCode::CREATED)
}

/// POST /resources/:name: bind an app and return the variables it should export.
async fn bind(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<BindResult>), AppError> {
    let envs = state.manager.bind().await?;
    tracing::info!(instance = %name, "Instance bound");
    Ok((StatusCode::CREATED, Json(envs)))
}

/// DELETE /resources/:name/hostname/:host
async fn unbind(
    State(state): State<AppState>,
    Path((name, host)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.manager.unbind().await?;
    tracing::info!(instance = %name, host = %host, "Instance unbound");
    Ok(StatusCode::OK)
}

/// DELETE /resources/:name
async fn remove_instance(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.manager.remove_instance().await?;
    tracing::info!(instance = %name, "Instance removed");
    Ok(StatusCode::OK)
}

/// GET /resources/:name/status: 204 when the backend answers, 500 with the reason otherwise.
async fn status(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let health = state.manager.is_ok().await;
    if health.ok {
        StatusCode::NO_CONTENT.into_response()
    } else {
        tracing::warn!(instance = %name, reason = %health.message, "Instance is down");
        (StatusCode::INTERNAL_SERVER_ERROR, health.message).into_response()
    }
}
