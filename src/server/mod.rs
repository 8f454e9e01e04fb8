//! Read-only HTTP telemetry surface.
//!
//! Serves the most recent frame published by the life loop.
//!
//! # Endpoints
//!
//! - `GET /health`: Liveness probe
//! - `GET /state`: Latest drive telemetry
//! - `GET /decision`: Latest full frame (decision plus state)

pub mod routes;

pub use routes::{app_router, serve, AppState};
