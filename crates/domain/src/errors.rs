//! 领域模型错误定义
//!
//! 定义了系统中所有可能的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 验证错误
    #[error("验证失败: {field}: {message}")]
    Validation { field: String, message: String },

    /// 资源不存在错误
    #[error("资源不存在: {resource_type} ID {resource_id}")]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    /// 唯一性冲突错误
    #[error("资源已存在: {resource_type} {identifier}")]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    /// 业务规则拒绝错误
    #[error("操作被拒绝: {action}")]
    Forbidden { action: String },

    /// 存储层内部错误
    #[error("内部错误: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建资源不存在错误
    pub fn not_found(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// 创建唯一性冲突错误
    pub fn conflict(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// 创建业务规则拒绝错误
    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;
