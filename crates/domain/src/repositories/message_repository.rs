//! 消息Repository接口定义

use crate::entities::message::Message;
use crate::errors::DomainResult;
use async_trait::async_trait;
use uuid::Uuid;

/// 消息Repository接口
///
/// 消息的可变字段只有表情回应集合和已读集合，对应的两个变更操作
/// 在仓储内部以单实体原子方式执行。
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 追加新消息
    async fn create(&self, message: &Message) -> DomainResult<Message>;

    /// 根据ID查找消息
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Message>>;

    /// 查找与用户相关的全部消息：用户为发送者、接收者，
    /// 或消息属于 group_ids 中任一群组。按插入顺序返回。
    async fn find_for_user(&self, user_id: Uuid, group_ids: &[Uuid]) -> DomainResult<Vec<Message>>;

    /// 原子切换表情回应，返回更新后的消息
    async fn toggle_reaction(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        emoji: &str,
    ) -> DomainResult<Message>;

    /// 原子标记已读，返回 (更新后的消息, 是否发生变化)
    async fn mark_read(&self, message_id: Uuid, user_id: Uuid) -> DomainResult<(Message, bool)>;

    /// 消息总数
    async fn count(&self) -> DomainResult<u64>;
}
