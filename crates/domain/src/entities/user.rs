//! 用户实体定义
//!
//! 用户在首次登录时创建，显示名不区分大小写且全局唯一。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 用户在线状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserStatus {
    /// 在线
    Online,
    /// 离开
    Away,
    /// 请勿打扰（旧版客户端发送 "dnd"）
    #[serde(alias = "dnd")]
    DoNotDisturb,
    /// 离线
    Offline,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Online => write!(f, "online"),
            UserStatus::Away => write!(f, "away"),
            UserStatus::DoNotDisturb => write!(f, "doNotDisturb"),
            UserStatus::Offline => write!(f, "offline"),
        }
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Offline
    }
}

/// 用户实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一ID
    pub id: Uuid,
    /// 显示名（不区分大小写唯一）
    pub display_name: String,
    /// 在线状态
    pub status: UserStatus,
    /// 最后在线时间
    pub last_seen: DateTime<Utc>,
    /// 头像URL
    pub avatar_url: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 创建新用户，显示名会被去除首尾空白后校验
    pub fn new(display_name: impl Into<String>) -> DomainResult<Self> {
        let display_name = display_name.into().trim().to_string();
        Self::validate_display_name(&display_name)?;

        let now = Utc::now();
        let avatar_url = Self::default_avatar_url(&display_name);

        Ok(Self {
            id: Uuid::new_v4(),
            display_name,
            status: UserStatus::Online,
            last_seen: now,
            avatar_url,
            created_at: now,
        })
    }

    /// 显示名规范化形式，用于唯一性比较
    pub fn normalized_name(&self) -> String {
        Self::normalize_name(&self.display_name)
    }

    /// 规范化显示名（不区分大小写比较的基准）
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// 更新在线状态，离线时同时记录最后在线时间
    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
        if status == UserStatus::Offline {
            self.last_seen = Utc::now();
        }
    }

    /// 标记上线
    pub fn mark_online(&mut self) {
        self.status = UserStatus::Online;
        self.last_seen = Utc::now();
    }

    /// 标记离线
    pub fn mark_offline(&mut self) {
        self.set_status(UserStatus::Offline);
    }

    /// 检查用户是否在线（任意非离线状态均视为在线）
    pub fn is_online(&self) -> bool {
        self.status != UserStatus::Offline
    }

    /// 基于显示名生成默认头像URL
    fn default_avatar_url(display_name: &str) -> String {
        format!(
            "https://ui-avatars.com/api/?name={}&background=667eea&color=fff",
            display_name.replace(' ', "+")
        )
    }

    /// 验证显示名格式
    fn validate_display_name(name: &str) -> DomainResult<()> {
        if name.is_empty() {
            return Err(DomainError::validation("displayName", "显示名不能为空"));
        }

        if name.chars().count() < 2 {
            return Err(DomainError::validation(
                "displayName",
                "显示名长度至少2个字符",
            ));
        }

        if name.chars().count() > 50 {
            return Err(DomainError::validation(
                "displayName",
                "显示名长度不能超过50个字符",
            ));
        }

        Ok(())
    }
}
