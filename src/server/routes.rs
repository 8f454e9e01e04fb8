//! Axum route handlers for the telemetry server.
//!
//! # Routes
//!
//! - `GET /health`: Returns `{"status": "ok", "version": "..."}`
//! - `GET /state`: Latest `TelemetrySnapshot`, 503 before the first cycle
//! - `GET /decision`: Latest `TelemetryFrame`, 503 before the first cycle

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::runtime::TelemetryFrame;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Frames published by the life loop.
    pub frames: watch::Receiver<Option<TelemetryFrame>>,
}

impl AppState {
    pub fn new(frames: watch::Receiver<Option<TelemetryFrame>>) -> Self {
        Self { frames }
    }

    fn latest(&self) -> Option<TelemetryFrame> {
        self.frames.borrow().clone()
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/state", get(state_handler))
        .route("/decision", get(decision_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until the task is dropped or the listener fails.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Telemetry server listening on {}", listener.local_addr()?);
    axum::serve(listener, app_router(state)).await
}

/// GET /health: liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "pixi",
    }))
}

/// GET /state: drive telemetry of the last completed cycle.
async fn state_handler(State(state): State<AppState>) -> Response {
    match state.latest() {
        Some(frame) => Json(frame.state).into_response(),
        None => not_ready(),
    }
}

/// GET /decision: last completed cycle.
async fn decision_handler(State(state): State<AppState>) -> Response {
    match state.latest() {
        Some(frame) => Json(frame).into_response(),
        None => not_ready(),
    }
}

fn not_ready() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": "no cycle has completed yet" })),
    )
        .into_response()
}
