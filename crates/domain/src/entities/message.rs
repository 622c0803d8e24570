//! 消息实体定义
//!
//! 消息创建后，发送者、接收目标、正文和时间戳均不可变；
//! 只有表情回应集合和已读集合可以变化。消息在本系统范围内不会被删除。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    /// 普通文本消息
    Text,
    /// 系统消息
    System,
}

impl Default for MessageKind {
    fn default() -> Self {
        Self::Text
    }
}

/// 消息投递目标：私聊接收者或群组，二者必居其一
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    /// 私聊消息，目标为单个用户
    Direct(Uuid),
    /// 群聊消息，目标为群组
    Group(Uuid),
}

/// 表情回应，(user_id, emoji) 对唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub user_id: Uuid,
    pub emoji: String,
}

/// 消息实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 消息唯一ID
    pub id: Uuid,
    /// 发送者ID
    pub sender_id: Uuid,
    /// 私聊接收者ID（与 group_id 互斥）
    pub recipient_id: Option<Uuid>,
    /// 群组ID（与 recipient_id 互斥）
    pub group_id: Option<Uuid>,
    /// 消息正文
    pub text: String,
    /// 消息类型
    pub kind: MessageKind,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 表情回应集合
    pub reactions: Vec<Reaction>,
    /// 已读用户集合，创建时始终包含发送者
    pub read_by: Vec<Uuid>,
}

impl Message {
    /// 创建新消息，正文去除首尾空白后不能为空
    pub fn new(
        sender_id: Uuid,
        target: MessageTarget,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> DomainResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::validation("text", "消息内容不能为空"));
        }

        let (recipient_id, group_id) = match target {
            MessageTarget::Direct(user_id) => (Some(user_id), None),
            MessageTarget::Group(group_id) => (None, Some(group_id)),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            group_id,
            text,
            kind,
            created_at: Utc::now(),
            reactions: Vec::new(),
            read_by: vec![sender_id],
        })
    }

    /// 消息投递目标
    pub fn target(&self) -> MessageTarget {
        match (self.recipient_id, self.group_id) {
            (Some(user_id), None) => MessageTarget::Direct(user_id),
            (None, Some(group_id)) => MessageTarget::Group(group_id),
            // new() 保证二者必居其一
            _ => unreachable!("message must have exactly one target"),
        }
    }

    /// 切换表情回应：已存在则移除，不存在则添加。交替重复调用幂等。
    pub fn toggle_reaction(&mut self, user_id: Uuid, emoji: &str) {
        if let Some(index) = self
            .reactions
            .iter()
            .position(|r| r.user_id == user_id && r.emoji == emoji)
        {
            self.reactions.remove(index);
        } else {
            self.reactions.push(Reaction {
                user_id,
                emoji: emoji.to_string(),
            });
        }
    }

    /// 标记已读。返回是否发生了变化；重复调用不会产生重复记录。
    pub fn mark_read(&mut self, user_id: Uuid) -> bool {
        if self.read_by.contains(&user_id) {
            false
        } else {
            self.read_by.push(user_id);
            true
        }
    }

    /// 检查用户是否已读
    pub fn is_read_by(&self, user_id: Uuid) -> bool {
        self.read_by.contains(&user_id)
    }
}
