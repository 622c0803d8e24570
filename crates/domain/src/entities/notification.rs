//! 通知实体定义
//!
//! 通知是追加写入的记录，除已读标记外不会被修改。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    /// 收到好友请求
    FriendRequest,
    /// 收到新消息
    NewMessage,
}

/// 通知实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// 通知唯一ID
    pub id: Uuid,
    /// 通知类型
    pub kind: NotificationKind,
    /// 触发通知的用户ID
    pub from_user_id: Uuid,
    /// 通知接收者ID
    pub to_user_id: Uuid,
    /// 通知文案
    pub message: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 已读标记
    pub read: bool,
}

impl Notification {
    /// 创建新通知
    pub fn new(
        kind: NotificationKind,
        from_user_id: Uuid,
        to_user_id: Uuid,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            from_user_id,
            to_user_id,
            message: message.into(),
            created_at: Utc::now(),
            read: false,
        }
    }

    /// 标记为已读
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_creation() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let mut notification =
            Notification::new(NotificationKind::FriendRequest, from, to, "alice 请求加好友");

        assert!(!notification.read);
        assert_eq!(notification.to_user_id, to);

        notification.mark_read();
        assert!(notification.read);
    }
}
