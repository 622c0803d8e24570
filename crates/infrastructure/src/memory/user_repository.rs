//! 用户仓储的内存实现

use async_trait::async_trait;
use domain::{DomainError, DomainResult, User, UserRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    /// 规范化显示名 -> 用户ID，强制不区分大小写的唯一性
    name_index: HashMap<String, Uuid>,
    /// 插入顺序
    order: Vec<Uuid>,
}

/// 用户仓储的内存实现
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Inner>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> DomainResult<User> {
        let mut inner = self.inner.write().await;
        let normalized = user.normalized_name();

        if inner.name_index.contains_key(&normalized) {
            return Err(DomainError::conflict("User", user.display_name.clone()));
        }

        inner.name_index.insert(normalized, user.id);
        inner.users.insert(user.id, user.clone());
        inner.order.push(user.id);
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> DomainResult<User> {
        let mut inner = self.inner.write().await;

        let existing = inner
            .users
            .get(&user.id)
            .ok_or_else(|| DomainError::not_found("User", user.id.to_string()))?;

        // 显示名变更时维护唯一性索引
        let old_normalized = existing.normalized_name();
        let new_normalized = user.normalized_name();
        if old_normalized != new_normalized {
            if inner.name_index.contains_key(&new_normalized) {
                return Err(DomainError::conflict("User", user.display_name.clone()));
            }
            inner.name_index.remove(&old_normalized);
            inner.name_index.insert(new_normalized, user.id);
        }

        inner.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_name(&self, display_name: &str) -> DomainResult<Option<User>> {
        let inner = self.inner.read().await;
        let normalized = User::normalize_name(display_name);
        Ok(inner
            .name_index
            .get(&normalized)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn list_all(&self) -> DomainResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.users.get(id))
            .cloned()
            .collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.users.len() as u64)
    }
}
