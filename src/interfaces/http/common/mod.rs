//! Common API types: response envelope and the error boundary.

pub mod validated_json;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::shared::DomainError;

pub use validated_json::ValidatedJson;

/// Standard response envelope.
///
/// Every REST endpoint returns `{"success": ..., "message"?, "data"?,
/// "count"?}`; list endpoints set `count` to the number of returned rows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            count: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len() as u64;
        Self {
            success: true,
            message: None,
            data: Some(items),
            count: Some(count),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
        }
    }
}

/// The single boundary translator from [`DomainError`] to an HTTP response.
///
/// Infrastructure errors are logged here and replaced with a generic message;
/// raw driver errors never reach the caller. Conflicts carry `existingId`
/// when the validator identified the clashing record.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, existing_id) = match self.0 {
            DomainError::Validation(m) => (StatusCode::BAD_REQUEST, m, None),
            DomainError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m, None),
            DomainError::NotFound(m) => (StatusCode::NOT_FOUND, m, None),
            DomainError::Conflict {
                message,
                existing_id,
            } => (StatusCode::CONFLICT, message, existing_id),
            DomainError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
            DomainError::Internal(m) => {
                tracing::error!(error = %m, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let Some(id) = existing_id {
            body["existingId"] = json!(id);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_carries_count() {
        let resp = ApiResponse::list(vec![1, 2, 3]);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 3);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn conflict_response_carries_existing_id() {
        let err = ApiError(DomainError::conflict("EPC already exists", Some("a1".into())));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_errors_are_not_exposed() {
        let err = ApiError(DomainError::Database(sea_orm::DbErr::Custom(
            "secret detail".into(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
