//! 统一配置中心
//!
//! 提供应用的全局配置管理，包括：
//! - 服务监听地址
//! - 消息策略（好友门禁）
//! - 连接策略（单连接模式）

use serde::{Deserialize, Serialize};
use std::env;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务配置
    pub server: ServerConfig,
    /// 消息策略配置
    pub messaging: MessagingConfig,
    /// 连接策略配置
    pub connection: ConnectionConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 消息策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// 好友门禁：私聊是否要求已接受的好友关系
    pub friend_gate: bool,
}

/// 连接策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// 单连接模式：同一用户的新连接挤掉旧连接
    pub single_connection: bool,
}

impl AppConfig {
    /// 从环境变量加载配置，缺失的变量回落到默认值。
    /// 端口同时识别 `SERVER_PORT` 和托管平台惯用的 `PORT`。
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT")?
                    .or(parse_var("PORT")?)
                    .unwrap_or(5000),
            },
            messaging: MessagingConfig {
                friend_gate: parse_var("FRIEND_GATE")?.unwrap_or(true),
            },
            connection: ConnectionConfig {
                single_connection: parse_var("SINGLE_CONNECTION")?.unwrap_or(false),
            },
        })
    }

    /// 监听地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            messaging: MessagingConfig { friend_gate: true },
            connection: ConnectionConfig {
                single_connection: false,
            },
        }
    }
}

/// 读取并解析单个环境变量，未设置返回 None，设置但无法解析返回错误
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        Err(_) => Ok(None),
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
