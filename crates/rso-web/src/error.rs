//! HTTP 错误响应

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use rso_core::RsoError;
use serde_json::json;
use tracing::error;

/// 处理器返回的错误：核心错误加上对外的操作描述
#[derive(Debug)]
pub struct ApiError {
    error: RsoError,
    operation: &'static str,
}

impl ApiError {
    pub fn new(error: RsoError, operation: &'static str) -> Self {
        Self { error, operation }
    }

    pub fn error(&self) -> &RsoError {
        &self.error
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            RsoError::Validation(_) | RsoError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            RsoError::Conflict(_) => StatusCode::CONFLICT,
            RsoError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 给存储操作附上对外的失败描述，如 `.map_err(failed("Failed to fetch surveys"))`
pub fn failed(operation: &'static str) -> impl FnOnce(RsoError) -> ApiError {
    move |error| ApiError::new(error, operation)
}

impl From<RsoError> for ApiError {
    fn from(error: RsoError) -> Self {
        ApiError::new(error, "Request failed")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        RsoError::MalformedInput(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        RsoError::MalformedInput(rejection.body_text()).into()
    }
}

/// 错误处理
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.error.kind();

        let body = match self.error {
            RsoError::Validation(fields) => json!({
                "error": format!("Validation failed: {} invalid field(s)", fields.len()),
                "kind": kind,
                "status": status.as_u16(),
                "fields": fields,
            }),
            RsoError::MalformedInput(message)
            | RsoError::Conflict(message)
            | RsoError::NotFound(message) => json!({
                "error": message,
                "kind": kind,
                "status": status.as_u16(),
            }),
            other => {
                // 细节只进日志
                error!("{}: {}", self.operation, other);
                json!({
                    "error": self.operation,
                    "kind": kind,
                    "status": status.as_u16(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rso_core::FieldError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(RsoError::validation("area", "required")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(RsoError::MalformedInput("eof".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(RsoError::Conflict("PT001".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            failed("Failed to fetch surveys")(RsoError::Database("timeout".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_store_error_hides_detail() {
        let response =
            failed("Failed to fetch surveys")(RsoError::Database("password leaked".into()))
                .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "Failed to fetch surveys");
        assert_eq!(body["kind"], "store");
        assert_eq!(body["status"], 500);
        assert!(!bytes.windows(8).any(|w| w == b"password"));
    }

    #[tokio::test]
    async fn test_validation_lists_fields() {
        let response = ApiError::from(RsoError::Validation(vec![
            FieldError::new("area", "is required"),
            FieldError::new("radiation_reading", "must be a finite number >= 0"),
        ]))
        .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["kind"], "validation");
        assert_eq!(body["fields"].as_array().unwrap().len(), 2);
        assert_eq!(body["fields"][0]["field"], "area");
    }
}
