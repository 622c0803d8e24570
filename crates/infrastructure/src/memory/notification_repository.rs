//! 通知仓储的内存实现

use async_trait::async_trait;
use domain::{DomainResult, Notification, NotificationRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

/// 通知仓储的内存实现，追加写入的日志
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    log: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: &Notification) -> DomainResult<Notification> {
        let mut log = self.log.write().await;
        log.push(notification.clone());
        Ok(notification.clone())
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Notification>> {
        let log = self.log.read().await;
        Ok(log
            .iter()
            .filter(|n| n.to_user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::NotificationKind;

    #[tokio::test]
    async fn test_list_scoped_to_recipient() {
        let repo = InMemoryNotificationRepository::new();
        let (from, to, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        repo.create(&Notification::new(
            NotificationKind::FriendRequest,
            from,
            to,
            "request",
        ))
        .await
        .unwrap();

        assert_eq!(repo.list_for_user(to).await.unwrap().len(), 1);
        assert!(repo.list_for_user(other).await.unwrap().is_empty());
    }
}
