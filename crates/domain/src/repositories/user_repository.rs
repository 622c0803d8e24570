//! 用户Repository接口定义

use crate::entities::user::User;
use crate::errors::DomainResult;
use async_trait::async_trait;
use uuid::Uuid;

/// 用户Repository接口
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建新用户，规范化显示名冲突时返回 Conflict
    async fn create(&self, user: &User) -> DomainResult<User>;

    /// 更新用户信息
    async fn update(&self, user: &User) -> DomainResult<User>;

    /// 根据ID查找用户
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// 根据显示名查找用户（不区分大小写的精确匹配）
    async fn find_by_name(&self, display_name: &str) -> DomainResult<Option<User>>;

    /// 列出所有用户，按创建顺序
    async fn list_all(&self) -> DomainResult<Vec<User>>;

    /// 用户总数
    async fn count(&self) -> DomainResult<u64>;
}
