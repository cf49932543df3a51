use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::{NewTodo, TodoResponse},
    AppState,
};

const INVALID_TEXT: &str = "Todo text must be a non-empty string.";
const INVALID_ID: &str = "A valid ID is required.";
const TODO_NOT_FOUND: &str = "Todo not found.";
const TODO_ALREADY_DELETED: &str = "Todo already deleted or not found.";

/// Query string pairs, kept as a list so a repeated `id` can be rejected.
pub type QueryPairs = Vec<(String, String)>;

/// The `/api/todos` endpoint. Every method lands here and is dispatched by hand.
pub async fn todos(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<QueryPairs>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    match method {
        Method::GET => list(&state),
        Method::POST => create(&state, &body.map_err(AppError::Body)?),
        Method::PUT => toggle(&state, &query),
        Method::DELETE => remove(&state, &query),
        other => Err(AppError::MethodNotAllowed(other)),
    }
}

fn list(state: &AppState) -> Result<Response, AppError> {
    let todos = state
        .repository()
        .find_many()
        .map_err(|err| AppError::from_store(err, TODO_NOT_FOUND))?;
    let todos: Vec<TodoResponse> = todos.into_iter().map(TodoResponse::from).collect();
    Ok(Json(todos).into_response())
}

fn create(state: &AppState, body: &[u8]) -> Result<Response, AppError> {
    let text = todo_text(body).ok_or(AppError::Validation(INVALID_TEXT))?;
    let created = state
        .repository()
        .create(NewTodo::new(text))
        .map_err(|err| AppError::from_store(err, TODO_NOT_FOUND))?;
    tracing::info!(id = %created.id, "todo created");
    Ok((StatusCode::CREATED, Json(TodoResponse::from(created))).into_response())
}

fn toggle(state: &AppState, query: &[(String, String)]) -> Result<Response, AppError> {
    let id = todo_id(query).ok_or(AppError::Validation(INVALID_ID))?;
    let updated = state
        .repository()
        .toggle(id)
        .map_err(|err| AppError::from_store(err, TODO_NOT_FOUND))?;
    tracing::debug!(id, completed = updated.completed, "todo toggled");
    Ok(Json(TodoResponse::from(updated)).into_response())
}

fn remove(state: &AppState, query: &[(String, String)]) -> Result<Response, AppError> {
    let id = todo_id(query).ok_or(AppError::Validation(INVALID_ID))?;
    state
        .repository()
        .delete(id)
        .map_err(|err| AppError::from_store(err, TODO_ALREADY_DELETED))?;
    tracing::info!(id, "todo deleted");
    Ok(Json(json!({ "message": "Todo deleted successfully." })).into_response())
}

/// The `text` of a create body, if it is a string with visible content.
fn todo_text(body: &[u8]) -> Option<String> {
    let body: Value = serde_json::from_slice(body).ok()?;
    match body.get("text")? {
        Value::String(text) if !is_blank(text) => Some(text.clone()),
        _ => None,
    }
}

/// Blank under JS trimming rules, which also strip the byte order mark.
fn is_blank(text: &str) -> bool {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}

/// The single non-empty `id` query parameter. Repeated ids are rejected.
fn todo_id(query: &[(String, String)]) -> Option<&str> {
    let mut ids = query
        .iter()
        .filter(|(key, _)| key == "id")
        .map(|(_, value)| value.as_str());
    let id = ids.next()?;
    if id.is_empty() || ids.next().is_some() {
        return None;
    }
    Some(id)
}
