use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::ValidationErrors;

use crate::forecast::SeriesError;

/// Body returned for every upstream failure, whatever the cause.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch weather data.";

const VALIDATION_FAILURE_MESSAGE: &str = "The given data was invalid.";

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(ValidationErrors),

    #[error("Upstream error: {0}")]
    UpstreamError(String),
}

/// Generic error body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Field-level validation failure body
#[derive(Debug, Serialize)]
struct ValidationErrorResponse {
    message: &'static str,
    errors: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    /// Wrap a failed upstream call, keeping the whole context chain for the log.
    pub fn upstream(error: anyhow::Error) -> Self {
        ApiError::UpstreamError(format!("{error:#}"))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UpstreamError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Messages per offending field, sorted by field name.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), |m| m.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            ApiError::ValidationError(errors) => {
                tracing::debug!(error = %errors, "rejected request parameters");
                let body = ValidationErrorResponse {
                    message: VALIDATION_FAILURE_MESSAGE,
                    errors: field_messages(&errors),
                };
                (status, Json(body)).into_response()
            }
            ApiError::UpstreamError(detail) => {
                tracing::error!(error = %detail, "weather upstream failed");
                let body = ErrorResponse {
                    error: UPSTREAM_FAILURE_MESSAGE.to_string(),
                    message: None,
                };
                (status, Json(body)).into_response()
            }
            ApiError::BadRequest(detail) => {
                tracing::debug!(error = %detail, "Client error");
                let body = ErrorResponse {
                    error: "BadRequest".to_string(),
                    message: Some(format!("Bad request: {detail}")),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

/// A malformed upstream payload is reported the same way as a failed call.
impl From<SeriesError> for ApiError {
    fn from(error: SeriesError) -> Self {
        ApiError::UpstreamError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ValidationError(ValidationErrors::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::UpstreamError("timeout".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_upstream_error_hides_detail() {
        let response = ApiError::upstream(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Failed to fetch weather data." })
        );
    }

    #[tokio::test]
    async fn test_upstream_context_chain_is_not_exposed() {
        let error = anyhow::anyhow!("HTTP 502").context("forecast GET failed");
        let api_error = ApiError::upstream(error);
        assert_eq!(
            api_error.to_string(),
            "Upstream error: forecast GET failed: HTTP 502"
        );

        let response = api_error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Failed to fetch weather data." })
        );
    }

    #[tokio::test]
    async fn test_series_error_maps_to_upstream_failure() {
        let response = ApiError::from(SeriesError::Missing("daily")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to fetch weather data.");
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "longitude",
            ValidationError::new("required").with_message("The longitude field is required.".into()),
        );
        errors.add("latitude", ValidationError::new("numeric"));

        let response = ApiError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "message": "The given data was invalid.",
                "errors": {
                    "latitude": ["numeric"],
                    "longitude": ["The longitude field is required."]
                }
            })
        );
    }
}
