use domain::DomainError;
use thiserror::Error;

/// 应用层错误类型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("事件需要已登录的身份")]
    Unauthenticated,
}

impl ApplicationError {
    /// 错误对应的线上错误码
    pub fn code(&self) -> &'static str {
        match self {
            ApplicationError::Domain(DomainError::Validation { .. }) => "VALIDATION_ERROR",
            ApplicationError::Domain(DomainError::NotFound { .. }) => "NOT_FOUND",
            ApplicationError::Domain(DomainError::Conflict { .. }) => "CONFLICT",
            ApplicationError::Domain(DomainError::Forbidden { .. }) => "FORBIDDEN",
            ApplicationError::Domain(DomainError::Internal { .. }) => "SERVER_ERROR",
            ApplicationError::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

/// 应用层结果类型
pub type ApplicationResult<T> = Result<T, ApplicationError>;
