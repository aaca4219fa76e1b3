/*
 * Responsibility
 * - shared AppError for every handler / middleware / extractor
 * - IntoResponse (HTTP status + body)
 *   - 400: field -> [messages] map, or {"detail"|"error": message}
 *   - 403 / 404: empty body
 *   - 401: {"detail"} + WWW-Authenticate
 * - unified conversion of RepoError / validator errors
 */
use std::collections::BTreeMap;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::repos::error::RepoError;

/// field name -> messages, rendered as-is for 400 responses
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),
    #[error("{key}: {message}")]
    BadRequest { key: &'static str, message: String },
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(key: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            key,
            message: message.into(),
        }
    }

    pub fn detail(message: impl Into<String>) -> Self {
        Self::bad_request("detail", message)
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        Self::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::BadRequest { key, message } => {
                let mut body = serde_json::Map::new();
                body.insert(key.to_string(), serde_json::Value::String(message));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::UnsupportedMediaType(detail) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            AppError::Unauthorized(detail) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Token")],
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            AppError::Forbidden => StatusCode::FORBIDDEN.into_response(),
            AppError::NotFound => StatusCode::NOT_FOUND.into_response(),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "internal server error" })),
            )
                .into_response(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(err) => {
                tracing::error!(error = ?err, "storage failure");
                AppError::Internal
            }
            // Handlers check references first; this is the lost race.
            RepoError::ForeignKey => AppError::detail("Referenced object does not exist."),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(field_errors(&e))
    }
}

/// Flatten validator output into the wire map (message, falling back to the code).
pub fn field_errors(e: &ValidationErrors) -> FieldErrors {
    e.field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, Vec<u8>, Option<String>) {
        let res = err.into_response();
        let status = res.status();
        let www = res
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec(), www)
    }

    #[tokio::test]
    async fn forbidden_and_not_found_have_empty_bodies() {
        let (status, body, _) = body_of(AppError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());

        let (status, body, _) = body_of(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn validation_renders_field_map() {
        let (status, body, _) = body_of(AppError::field("text", REQUIRED)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "text": [REQUIRED] }));
    }

    #[tokio::test]
    async fn bad_request_uses_given_key() {
        let (status, body, _) = body_of(AppError::bad_request("error", "nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "nope" }));
    }

    #[tokio::test]
    async fn unauthorized_carries_challenge_header() {
        let (status, body, www) = body_of(AppError::Unauthorized("Invalid token.")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(www.as_deref(), Some("Token"));
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "detail": "Invalid token." }));
    }

    #[tokio::test]
    async fn foreign_key_maps_to_bad_request() {
        let (status, _, _) = body_of(AppError::from(RepoError::ForeignKey)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
