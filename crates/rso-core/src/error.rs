//! 错误定义模块

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// RSO系统统一错误类型
#[derive(Error, Debug)]
pub enum RsoError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("验证错误: {} 个字段无效", .0.len())]
    Validation(Vec<FieldError>),

    #[error("请求格式错误: {0}")]
    MalformedInput(String),

    #[error("记录冲突: {0}")]
    Conflict(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

impl RsoError {
    /// 对外暴露的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            RsoError::Config(_) => "config",
            RsoError::Database(_) => "store",
            RsoError::Validation(_) => "validation",
            RsoError::MalformedInput(_) => "malformed_input",
            RsoError::Conflict(_) => "conflict",
            RsoError::NotFound(_) => "not_found",
            RsoError::Io(_) | RsoError::Serialization(_) | RsoError::Internal(_) => "internal",
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RsoError::Validation(vec![FieldError::new(field, message)])
    }
}

/// 患者编号重复时对外的固定消息
pub const DUPLICATE_PATIENT_ID: &str = "patient_id already exists";

/// 唯一约束冲突的对外消息，约束名和原始数据库消息只进日志
pub fn unique_violation(constraint: Option<&str>) -> RsoError {
    match constraint {
        Some("patients_patient_id_key") => RsoError::Conflict(DUPLICATE_PATIENT_ID.to_string()),
        _ => RsoError::Conflict("record already exists".to_string()),
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for RsoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // 23505 = unique_violation
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                tracing::warn!("Unique constraint violated: {}", db_err.message());
                unique_violation(db_err.constraint())
            }
            sqlx::Error::RowNotFound => RsoError::NotFound(err.to_string()),
            _ => RsoError::Database(err.to_string()),
        }
    }
}

/// RSO系统统一结果类型
pub type Result<T> = std::result::Result<T, RsoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(RsoError::Database("boom".into()).kind(), "store");
        assert_eq!(RsoError::validation("area", "required").kind(), "validation");
        assert_eq!(RsoError::MalformedInput("eof".into()).kind(), "malformed_input");
        assert_eq!(RsoError::Conflict("PT001".into()).kind(), "conflict");
    }

    #[test]
    fn test_unique_violation_hides_constraint() {
        match unique_violation(Some("patients_patient_id_key")) {
            RsoError::Conflict(message) => assert_eq!(message, DUPLICATE_PATIENT_ID),
            other => panic!("expected conflict, got {:?}", other),
        }
        match unique_violation(None) {
            RsoError::Conflict(message) => assert!(!message.contains("constraint")),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_message_counts_fields() {
        let err = RsoError::Validation(vec![
            FieldError::new("area", "required"),
            FieldError::new("radiation_reading", "must be >= 0"),
        ]);
        assert_eq!(err.to_string(), "验证错误: 2 个字段无效");
    }
}
