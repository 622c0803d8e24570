//! 好友关系Repository接口定义

use crate::entities::friendship::{Friendship, FriendshipStatus};
use crate::errors::DomainResult;
use async_trait::async_trait;
use uuid::Uuid;

/// 好友关系Repository接口
///
/// 无序用户对的唯一性由仓储强制：同一对用户在任何状态下
/// 最多存在一条记录。
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// 创建好友请求记录，该用户对已存在记录时返回 Conflict
    async fn create(&self, friendship: &Friendship) -> DomainResult<Friendship>;

    /// 根据ID查找记录
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Friendship>>;

    /// 查找无序用户对的记录
    async fn find_pair(&self, a: Uuid, b: Uuid) -> DomainResult<Option<Friendship>>;

    /// 列出与用户相关的记录，可按状态过滤
    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<FriendshipStatus>,
    ) -> DomainResult<Vec<Friendship>>;

    /// 更新记录状态
    async fn update_status(&self, id: Uuid, status: FriendshipStatus) -> DomainResult<Friendship>;

    /// 删除记录，释放该用户对以便重新发起请求
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
