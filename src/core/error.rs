//! 核心错误处理模块

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::app::product::repository::RepositoryError;

/// 字段名 -> 违反的约束信息
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("malformed JSON")]
    MalformedJson,
    #[error("{0}")]
    BadRequest(String),
    #[error("data integrity violation")]
    DataIntegrity,
    #[error("{0}")]
    Conflict(String),
    #[error("request timed out")]
    Timeout,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    pub status: u16,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Validation(_) | CoreError::MalformedJson | CoreError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            CoreError::DataIntegrity | CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::Timeout => StatusCode::REQUEST_TIMEOUT,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message, fields) = match self {
            CoreError::NotFound(msg) => ("NOT_FOUND", msg, None),
            CoreError::Validation(fields) => {
                ("BAD_REQUEST", "Validation failed".to_string(), Some(fields))
            }
            CoreError::MalformedJson => ("BAD_REQUEST", "Malformed JSON".to_string(), None),
            CoreError::BadRequest(msg) => ("BAD_REQUEST", msg, None),
            CoreError::DataIntegrity => {
                ("CONFLICT", "Data integrity violation".to_string(), None)
            }
            CoreError::Conflict(msg) => ("CONFLICT", msg, None),
            CoreError::Timeout => ("REQUEST_TIMEOUT", "Request timed out".to_string(), None),
            CoreError::Internal(detail) => {
                // 细节只写日志，不返回给客户端
                error!("Unhandled failure: {}", detail);
                ("INTERNAL_SERVER_ERROR", "Unexpected error".to_string(), None)
            }
        };

        let body = ErrorResponse {
            error,
            message,
            status: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            fields,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, violations)| {
                let messages = violations
                    .iter()
                    .map(|violation| {
                        violation
                            .message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| violation.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        CoreError::Validation(fields)
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        CoreError::MalformedJson
    }
}

impl From<PathRejection> for CoreError {
    fn from(rejection: PathRejection) -> Self {
        CoreError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::BadRequest(format!("Invalid query parameter: {}", rejection.body_text()))
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Integrity(detail) => {
                warn!("Data integrity violation: {}", detail);
                CoreError::DataIntegrity
            }
            RepositoryError::Missing(id) => CoreError::NotFound(format!("Product {} not found", id)),
            other => CoreError::Internal(other.to_string()),
        }
    }
}
