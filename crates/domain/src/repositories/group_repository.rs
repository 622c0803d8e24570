//! 群组Repository接口定义

use crate::entities::group::Group;
use crate::errors::DomainResult;
use async_trait::async_trait;
use uuid::Uuid;

/// 群组Repository接口
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// 创建新群组
    async fn create(&self, group: &Group) -> DomainResult<Group>;

    /// 根据ID查找群组
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Group>>;

    /// 列出用户所属的全部群组
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Group>>;
}
