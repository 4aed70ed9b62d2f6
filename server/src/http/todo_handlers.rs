//! Todo collection and item handlers
//!
//! Each route takes every verb and dispatches on the method itself, so that
//! unsupported verbs get the 405 body and `Allow` header of that route.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use super::error::{method_not_allowed, store_failure, success, ApiError};
use crate::domain::{normalize_text, DomainError, DomainResult, TodoDraft, TodoId};
use crate::repository::Repository;
use crate::AppState;

const FETCH_FAILED: &str = "Failed to fetch todos";
const CREATE_FAILED: &str = "Failed to create todo";
const UPDATE_FAILED: &str = "Failed to update todo";
const DELETE_FAILED: &str = "Failed to delete todo";
const TEXT_REQUIRED: &str = "Todo text required";
const INVALID_BODY: &str = "Invalid request body";

const COLLECTION_ALLOW: &str = "GET, POST";
const ITEM_ALLOW: &str = "PUT, DELETE";

/// `isCompleted` on create follows JavaScript truthiness, so `1` or `"yes"` count
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fields of a create body. `None` means the text is missing or falsy.
fn create_fields(body: &Value) -> DomainResult<Option<TodoDraft>> {
    let is_completed = body.get("isCompleted").is_some_and(truthy);
    match body.get("todo") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if normalize_text(text).is_empty() => Ok(None),
        Some(Value::String(text)) => {
            Ok(Some(TodoDraft::new(text.as_str()).completed(is_completed)))
        }
        Some(Value::Bool(false)) => Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(other) => Err(DomainError::InvalidInput(format!("todo is not text: {}", other))),
    }
}

/// Fields of an overwrite body; both must be present and well typed
fn update_fields(body: &Value) -> DomainResult<TodoDraft> {
    let text = body
        .get("todo")
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::InvalidInput("todo must be text".into()))?;
    let is_completed = body
        .get("isCompleted")
        .and_then(Value::as_bool)
        .ok_or_else(|| DomainError::InvalidInput("isCompleted must be a boolean".into()))?;
    Ok(TodoDraft::new(text).completed(is_completed))
}

/// `/api/todo`
pub async fn todo_collection(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    match method {
        Method::GET => list_todos(&state).await.into_response(),
        Method::POST => create_todo(&state, &body).await.into_response(),
        _ => method_not_allowed(&method, COLLECTION_ALLOW),
    }
}

/// `/api/todo/{id}`
pub async fn todo_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    method: Method,
    body: Bytes,
) -> Response {
    let id = TodoId::from(id);
    match method {
        Method::PUT => update_todo(&state, &id, &body).await.into_response(),
        Method::DELETE => delete_todo(&state, &id).await.into_response(),
        _ => method_not_allowed(&method, ITEM_ALLOW),
    }
}

async fn list_todos(state: &AppState) -> Result<Response, ApiError> {
    let todos = state.store.list().await.map_err(store_failure(FETCH_FAILED))?;
    Ok(Json(todos).into_response())
}

async fn create_todo(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let body = parse_body(body)?;
    let draft = create_fields(&body)
        .map_err(store_failure(CREATE_FAILED))?
        .ok_or(ApiError::bad_request(TEXT_REQUIRED))?;

    let created = state.store.create(draft).await.map_err(store_failure(CREATE_FAILED))?;
    tracing::info!(id = %created.id, "todo created");
    Ok(success())
}

async fn update_todo(state: &AppState, id: &TodoId, body: &[u8]) -> Result<Response, ApiError> {
    let body = parse_body(body)?;
    let draft = update_fields(&body).map_err(store_failure(UPDATE_FAILED))?;

    state.store.update(id, draft).await.map_err(store_failure(UPDATE_FAILED))?;
    tracing::info!(%id, "todo updated");
    Ok(success())
}

async fn delete_todo(state: &AppState, id: &TodoId) -> Result<Response, ApiError> {
    state.store.delete(id).await.map_err(store_failure(DELETE_FAILED))?;
    tracing::info!(%id, "todo deleted");
    Ok(success())
}

/// Only a body that is not JSON at all is a client error; an empty one reads as `{}`
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejected request body");
        ApiError::bad_request(INVALID_BODY)
    })
}
