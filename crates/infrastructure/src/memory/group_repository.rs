//! 群组仓储的内存实现

use async_trait::async_trait;
use domain::{DomainResult, Group, GroupRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    groups: HashMap<Uuid, Group>,
    order: Vec<Uuid>,
}

/// 群组仓储的内存实现
#[derive(Default)]
pub struct InMemoryGroupRepository {
    inner: RwLock<Inner>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn create(&self, group: &Group) -> DomainResult<Group> {
        let mut inner = self.inner.write().await;
        inner.groups.insert(group.id, group.clone());
        inner.order.push(group.id);
        Ok(group.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Group>> {
        let inner = self.inner.read().await;
        Ok(inner.groups.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Group>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.groups.get(id))
            .filter(|g| g.is_member(user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_for_user_only_memberships() {
        let repo = InMemoryGroupRepository::new();
        let creator = Uuid::new_v4();
        let outsider = Uuid::new_v4();

        let group = Group::new("team", creator, vec![]).unwrap();
        repo.create(&group).await.unwrap();

        assert_eq!(repo.list_for_user(creator).await.unwrap().len(), 1);
        assert!(repo.list_for_user(outsider).await.unwrap().is_empty());
    }
}
