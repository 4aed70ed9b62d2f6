//! HTTP Layer
//!
//! The mutation gateway, the live query stream and the standard layers.

mod error;
mod events;
mod todo_handlers;

use axum::http::Request;
use axum::routing::{any, get};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::AppState;

pub use error::{ApiError, ErrorBody, MessageBody};
pub use events::{todo_events, SNAPSHOT_EVENT};
pub use todo_handlers::{todo_collection, todo_item};

/// Todo payloads are one short string
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// All API routes bound to `state`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/todo", any(todo_collection))
        .route("/api/todo/{id}", any(todo_item))
        .route("/api/events", get(todo_events))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub fn apply_standard_layers(router: Router) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    router
        .layer(trace)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}
