//! 出站事件载荷的数据传输对象
//!
//! 历史客户端读取 `username`、`isOnline`、`senderName`、`avatar` 等字段，
//! DTO 层负责把领域实体映射成这些线上字段名。

use chrono::{DateTime, Utc};
use domain::{Friendship, Message, User, UserStatus};
use serde::Serialize;
use uuid::Uuid;

/// 用户摘要视图
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    #[serde(rename = "username")]
    pub display_name: String,
    pub status: UserStatus,
    pub is_online: bool,
    pub last_seen: DateTime<Utc>,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    /// 搜索结果注解：是否已是好友
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_friend: Option<bool>,
    /// 搜索结果注解：是否已有未答复的出站请求
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_pending_request: Option<bool>,
}

impl UserSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            status: user.status,
            is_online: user.is_online(),
            last_seen: user.last_seen,
            avatar_url: user.avatar_url.clone(),
            is_friend: None,
            has_pending_request: None,
        }
    }

    /// 带好友关系注解的视图，用于搜索结果
    pub fn annotated(user: &User, is_friend: bool, has_pending_request: bool) -> Self {
        Self {
            is_friend: Some(is_friend),
            has_pending_request: Some(has_pending_request),
            ..Self::from_user(user)
        }
    }
}

/// 消息视图：实体字段加发送者显示名
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub sender_name: String,
}

impl MessageView {
    pub fn new(message: Message, sender_name: impl Into<String>) -> Self {
        Self {
            message,
            sender_name: sender_name.into(),
        }
    }
}

/// 待处理好友请求视图
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestView {
    pub friendship_id: Uuid,
    pub requester: UserSummary,
}

impl PendingRequestView {
    pub fn new(friendship: &Friendship, requester: &User) -> Self {
        Self {
            friendship_id: friendship.id,
            requester: UserSummary::from_user(requester),
        }
    }
}
