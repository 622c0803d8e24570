//! 消息仓储的内存实现
//!
//! 消息日志按追加顺序保存，历史查询直接按该顺序返回，
//! 无需重新排序。

use async_trait::async_trait;
use domain::{DomainError, DomainResult, Message, MessageRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    messages: HashMap<Uuid, Message>,
    /// 追加顺序
    order: Vec<Uuid>,
}

/// 消息仓储的内存实现
#[derive(Default)]
pub struct InMemoryMessageRepository {
    inner: RwLock<Inner>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &Message) -> DomainResult<Message> {
        let mut inner = self.inner.write().await;
        inner.messages.insert(message.id, message.clone());
        inner.order.push(message.id);
        Ok(message.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Message>> {
        let inner = self.inner.read().await;
        Ok(inner.messages.get(&id).cloned())
    }

    async fn find_for_user(&self, user_id: Uuid, group_ids: &[Uuid]) -> DomainResult<Vec<Message>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.messages.get(id))
            .filter(|m| {
                m.sender_id == user_id
                    || m.recipient_id == Some(user_id)
                    || m.group_id.map(|g| group_ids.contains(&g)).unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn toggle_reaction(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        emoji: &str,
    ) -> DomainResult<Message> {
        let mut inner = self.inner.write().await;
        let message = inner
            .messages
            .get_mut(&message_id)
            .ok_or_else(|| DomainError::not_found("Message", message_id.to_string()))?;

        message.toggle_reaction(user_id, emoji);
        Ok(message.clone())
    }

    async fn mark_read(&self, message_id: Uuid, user_id: Uuid) -> DomainResult<(Message, bool)> {
        let mut inner = self.inner.write().await;
        let message = inner
            .messages
            .get_mut(&message_id)
            .ok_or_else(|| DomainError::not_found("Message", message_id.to_string()))?;

        let changed = message.mark_read(user_id);
        Ok((message.clone(), changed))
    }

    async fn count(&self) -> DomainResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.messages.len() as u64)
    }
}
