//! Response bodies shared by the gateway handlers.

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

/// A fixed, client-safe error. The underlying cause is logged, never returned.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    pub fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    pub fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// Map any store failure to a 500 with `message`
pub fn store_failure(message: &'static str) -> impl FnOnce(DomainError) -> ApiError {
    move |err| {
        tracing::error!(error = %err, "{}", message);
        ApiError::internal(message)
    }
}

pub fn success() -> Response {
    (StatusCode::OK, Json(MessageBody { message: "success" })).into_response()
}

/// 405 with a plain-text body and the route's `Allow` list
pub fn method_not_allowed(method: &Method, allow: &'static str) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, allow)],
        format!("Method {} Not Allowed", method),
    )
        .into_response()
}
