use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::store::StoreError;

/// A single failed field check. The validator chains aggregate these so one
/// response reports every structural problem with the request at once.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// # API Error Taxonomy
///
/// Every failure a handler can produce, mapped onto the JSON envelope the
/// service speaks: `{"success": false, "msg": ...}` plus optional detail.
///
/// ## Status mapping
/// - `InvalidInput`, `Validation`, `Conflict` → 400
/// - `NotFound` → 404
/// - `Unexpected` → 500, with the store error echoed in `error`
///
/// Errors never propagate past the handler boundary; actix renders them
/// through [`ResponseError`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("request validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("unexpected storage error")]
    Unexpected(#[from] StoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::Validation(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => HttpResponse::build(self.status_code()).json(json!({
                "success": false,
                "msg": self.to_string(),
                "errors": errors,
            })),
            ApiError::Unexpected(source) => {
                tracing::error!(error = %source, "store operation failed");
                HttpResponse::build(self.status_code()).json(json!({
                    "success": false,
                    "msg": self.to_string(),
                    "error": source.to_string(),
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(json!({
                "success": false,
                "msg": self.to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidInput("bad date".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("gone".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("double booking".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unexpected(StoreError::Malformed("oops".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_validation_body_lists_field_errors() {
        let error = ApiError::Validation(vec![
            FieldError::new("date", "is required"),
            FieldError::new("pet", "is not a valid document id"),
        ]);

        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["msg"], "request validation failed");
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
        assert_eq!(json["errors"][0]["field"], "date");
    }

    #[actix_web::test]
    async fn test_unexpected_echoes_detail() {
        let error = ApiError::Unexpected(StoreError::Malformed("missing _id".to_string()));

        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "stored document is malformed: missing _id");
    }
}
