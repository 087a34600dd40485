//! HTTP routes
//!
//! | method | path                   | handler          |
//! |--------|------------------------|------------------|
//! | POST   | `/api/launch/{app_id}` | [`launch_app`]   |
//! | GET    | `/api/apps`            | [`list_apps`]    |
//! | GET    | `/api/system/status`   | [`system_status`]|
//! | POST   | `/api/system/power`    | [`system_power`] |
//! | GET    | `/install.sh`          | [`install_script`] |

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use nexus_core::SystemStatus;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};

use crate::protocol::{AppsResponse, LaunchResponse, PowerRequest, PowerResponse};
use crate::state::AppState;

/// Plain-text body when the install script cannot be served
pub const INSTALL_SCRIPT_ERROR: &str = "Failed to download install script";

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/launch/{app_id}", post(launch_app))
        .route("/api/apps", get(list_apps))
        .route("/api/system/status", get(system_status))
        .route("/api/system/power", post(system_power))
        .route("/install.sh", get(install_script))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Domain errors mapped onto HTTP replies
pub struct ApiError(nexus_core::Error);

impl From<nexus_core::Error> for ApiError {
    fn from(e: nexus_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use nexus_core::Error;

        match self.0 {
            Error::UnknownApp { app, available } => (
                StatusCode::NOT_FOUND,
                Json(LaunchResponse::unknown(&app, available)),
            )
                .into_response(),
            Error::Spawn { app, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LaunchResponse::failed(&app)),
            )
                .into_response(),
            Error::InvalidPowerAction(_) => {
                (StatusCode::BAD_REQUEST, Json(PowerResponse::invalid())).into_response()
            }
            other => {
                error!(error = %other, "Unhandled request error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "success": false, "error": "Internal error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Launch an app; the spawned process is deliberately not awaited
async fn launch_app(
    State(state): State<Arc<AppState>>,
    Path(app_id): Path<String>,
) -> Result<Json<LaunchResponse>, ApiError> {
    let process = state.dispatcher.launch(&app_id)?;
    debug!(launch_id = %process.id, "Detaching launched process");
    Ok(Json(LaunchResponse::launched(&app_id)))
}

async fn list_apps(State(state): State<Arc<AppState>>) -> Json<AppsResponse> {
    Json(AppsResponse {
        apps: state.dispatcher.apps(),
    })
}

async fn system_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    Json(state.status.status().await)
}

/// Acknowledge first; the power command fires after the configured delay
///
/// Only `application/json` bodies are read. Any other content type, or a
/// body that does not parse, is an invalid action.
async fn system_power(
    State(state): State<Arc<AppState>>,
    request: Result<Json<PowerRequest>, JsonRejection>,
) -> Result<Json<PowerResponse>, ApiError> {
    let action = match request {
        Ok(Json(request)) => request.action.unwrap_or_default(),
        Err(rejection) => {
            debug!(error = %rejection, "Rejected power request body");
            String::new()
        }
    };
    let scheduled = state.power.power(&action)?;
    Ok(Json(PowerResponse::accepted(scheduled.message())))
}

async fn install_script(State(state): State<Arc<AppState>>) -> Response {
    match tokio::fs::File::open(&state.install_script).await {
        Ok(file) => {
            let body = Body::from_stream(ReaderStream::new(file));
            (
                [
                    (header::CONTENT_TYPE, "application/x-sh"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"install.sh\"",
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            error!(
                path = %state.install_script.display(),
                error = %e,
                "Failed to open install script"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, INSTALL_SCRIPT_ERROR).into_response()
        }
    }
}

/// Unknown routes get a bare 404, still passing through the request log
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Log every request with status and duration
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request"
    );
    response
}
