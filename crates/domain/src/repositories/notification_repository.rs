//! 通知Repository接口定义

use crate::entities::notification::Notification;
use crate::errors::DomainResult;
use async_trait::async_trait;
use uuid::Uuid;

/// 通知Repository接口
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// 追加新通知
    async fn create(&self, notification: &Notification) -> DomainResult<Notification>;

    /// 列出用户收到的全部通知，按创建顺序
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Notification>>;
}
