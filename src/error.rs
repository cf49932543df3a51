use axum::{
    extract::rejection::BytesRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::repository::StoreError;

/// Methods served by the todo endpoint, as advertised in `Allow`.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

const INTERNAL_MESSAGE: &str = "Server error.";

/// Every failure a request can end in. Rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input.
    Validation(&'static str),
    /// The referenced record does not exist.
    NotFound(&'static str),
    MethodNotAllowed(Method),
    /// The request body could not be read, e.g. it is over the size limit.
    Body(BytesRejection),
    /// Store or unexpected failure. Logged, never shown to the caller.
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Body(rejection) => rejection.status(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.to_string(),
            AppError::MethodNotAllowed(method) => format!("Method {method} not supported."),
            AppError::Body(rejection) => rejection.body_text(),
            AppError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    /// Maps a store error, treating a missing record as `NotFound(message)`.
    pub fn from_store(err: StoreError, not_found: &'static str) -> Self {
        match err {
            StoreError::RecordNotFound(_) => AppError::NotFound(not_found),
            StoreError::Backend(err) => AppError::Internal(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(err) => tracing::error!(error = ?err, "todo request failed"),
            other => tracing::warn!(status = %other.status(), reason = %other.message(), "todo request rejected"),
        }
        let mut response = (self.status(), Json(json!({ "error": self.message() }))).into_response();
        if let AppError::MethodNotAllowed(_) = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        response
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}
