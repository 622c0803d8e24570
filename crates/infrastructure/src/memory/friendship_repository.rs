//! 好友关系仓储的内存实现
//!
//! 无序用户对索引在写锁内检查并更新，保证同一对用户最多一条记录。

use async_trait::async_trait;
use domain::{DomainError, DomainResult, Friendship, FriendshipRepository, FriendshipStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    records: HashMap<Uuid, Friendship>,
    /// 无序用户对 -> 记录ID
    pair_index: HashMap<(Uuid, Uuid), Uuid>,
}

/// 好友关系仓储的内存实现
#[derive(Default)]
pub struct InMemoryFriendshipRepository {
    inner: RwLock<Inner>,
}

impl InMemoryFriendshipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FriendshipRepository for InMemoryFriendshipRepository {
    async fn create(&self, friendship: &Friendship) -> DomainResult<Friendship> {
        let mut inner = self.inner.write().await;
        let pair = friendship.pair();

        if inner.pair_index.contains_key(&pair) {
            return Err(DomainError::conflict(
                "Friendship",
                format!("{}-{}", pair.0, pair.1),
            ));
        }

        inner.pair_index.insert(pair, friendship.id);
        inner.records.insert(friendship.id, friendship.clone());
        Ok(friendship.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Friendship>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&id).cloned())
    }

    async fn find_pair(&self, a: Uuid, b: Uuid) -> DomainResult<Option<Friendship>> {
        let inner = self.inner.read().await;
        Ok(inner
            .pair_index
            .get(&Friendship::pair_key(a, b))
            .and_then(|id| inner.records.get(id))
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<FriendshipStatus>,
    ) -> DomainResult<Vec<Friendship>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .values()
            .filter(|f| f.involves(user_id))
            .filter(|f| status.map(|s| f.status == s).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: Uuid, status: FriendshipStatus) -> DomainResult<Friendship> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Friendship", id.to_string()))?;

        record.status = status;
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("Friendship", id.to_string()))?;

        inner.pair_index.remove(&record.pair());
        Ok(())
    }
}
