//! 连接注册表
//!
//! 维护逻辑用户ID与在线连接句柄之间的双向索引。连接在套接字建立时
//! 注册（此时尚未认证），在 login 事件成功后绑定用户身份。注册表
//! 是唯一被多个连接生命周期并发修改的结构，由单个读写锁保护。
//! 进程内存结构，重启后重建为空，所有用户视为离线直到重新绑定。

use crate::events::{ConnectionId, ServerEvent};
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use uuid::Uuid;

/// 单条连接的注册信息
struct Connection {
    user_id: Option<Uuid>,
    sender: UnboundedSender<ServerEvent>,
}

#[derive(Default)]
struct RegistryInner {
    connections: HashMap<ConnectionId, Connection>,
    user_index: HashMap<Uuid, HashSet<ConnectionId>>,
}

/// 连接注册表
pub struct ConnectionRegistry {
    /// 单连接模式：同一用户的新连接会挤掉旧连接
    single_connection: bool,
    inner: RwLock<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new(single_connection: bool) -> Self {
        Self {
            single_connection,
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// 注册新连接（尚未绑定用户身份）
    pub async fn register(&self, conn_id: ConnectionId, sender: UnboundedSender<ServerEvent>) {
        let mut inner = self.inner.write().await;
        inner.connections.insert(
            conn_id,
            Connection {
                user_id: None,
                sender,
            },
        );
    }

    /// 将连接绑定到用户身份。
    ///
    /// 多连接模式下追加绑定；单连接模式下挤掉该用户已有的连接，
    /// 向被挤掉的连接发送 `forcedLogout` 后将其从索引中移除。
    /// 已绑定的连接可以重新登录为其他用户，旧身份的索引项随之摘除。
    pub async fn bind(&self, conn_id: ConnectionId, user_id: Uuid) {
        let mut inner = self.inner.write().await;

        if self.single_connection {
            let existing: Vec<ConnectionId> = inner
                .user_index
                .get(&user_id)
                .map(|set| set.iter().copied().filter(|id| *id != conn_id).collect())
                .unwrap_or_default();

            for evicted_id in existing {
                if let Some(conn) = inner.connections.get_mut(&evicted_id) {
                    let _ = conn.sender.send(ServerEvent::ForcedLogout);
                    conn.user_id = None;
                }
                if let Some(set) = inner.user_index.get_mut(&user_id) {
                    set.remove(&evicted_id);
                }
                tracing::info!(user_id = %user_id, connection_id = %evicted_id, "单连接模式：旧连接被挤下线");
            }
        }

        // 同一连接以新身份重新登录：双向索引必须同步，否则发给旧用户
        // 的事件仍会解析到这条连接
        let previous = inner.connections.get(&conn_id).and_then(|c| c.user_id);
        if let Some(previous) = previous {
            if previous != user_id {
                if let Some(set) = inner.user_index.get_mut(&previous) {
                    set.remove(&conn_id);
                    if set.is_empty() {
                        inner.user_index.remove(&previous);
                    }
                }
            }
        }

        if let Some(conn) = inner.connections.get_mut(&conn_id) {
            conn.user_id = Some(user_id);
            inner.user_index.entry(user_id).or_default().insert(conn_id);
        }
    }

    /// 解除连接注册。
    ///
    /// 返回该连接绑定的用户ID以及它是否是该用户的最后一条连接。
    /// 无论连接处于何种状态，清理都会执行。
    pub async fn unbind(&self, conn_id: ConnectionId) -> Option<(Uuid, bool)> {
        let mut inner = self.inner.write().await;

        let connection = inner.connections.remove(&conn_id)?;
        let user_id = connection.user_id?;

        let was_last = match inner.user_index.get_mut(&user_id) {
            Some(set) => {
                set.remove(&conn_id);
                if set.is_empty() {
                    inner.user_index.remove(&user_id);
                    true
                } else {
                    false
                }
            }
            None => true,
        };

        Some((user_id, was_last))
    }

    /// 连接当前绑定的用户身份
    pub async fn identity(&self, conn_id: ConnectionId) -> Option<Uuid> {
        let inner = self.inner.read().await;
        inner.connections.get(&conn_id).and_then(|c| c.user_id)
    }

    /// 解析用户的全部在线连接，离线用户返回空集合
    pub async fn resolve(&self, user_id: Uuid) -> Vec<UnboundedSender<ServerEvent>> {
        let inner = self.inner.read().await;
        inner
            .user_index
            .get(&user_id)
            .map(|set| {
                set.iter()
                    .filter_map(|id| inner.connections.get(id))
                    .map(|c| c.sender.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 解析指定连接的发送端
    pub async fn resolve_connection(
        &self,
        conn_id: ConnectionId,
    ) -> Option<UnboundedSender<ServerEvent>> {
        let inner = self.inner.read().await;
        inner.connections.get(&conn_id).map(|c| c.sender.clone())
    }

    /// 解析全部在线连接（全局广播用）
    pub async fn resolve_all(&self) -> Vec<UnboundedSender<ServerEvent>> {
        let inner = self.inner.read().await;
        inner
            .connections
            .values()
            .map(|c| c.sender.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn new_conn() -> (
        ConnectionId,
        UnboundedSender<ServerEvent>,
        mpsc::UnboundedReceiver<ServerEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Uuid::new_v4(), tx, rx)
    }

    #[tokio::test]
    async fn test_bind_and_resolve() {
        let registry = ConnectionRegistry::new(false);
        let user_id = Uuid::new_v4();
        let (conn_id, tx, _rx) = new_conn();

        registry.register(conn_id, tx).await;
        assert_eq!(registry.identity(conn_id).await, None);

        registry.bind(conn_id, user_id).await;
        assert_eq!(registry.identity(conn_id).await, Some(user_id));
        assert_eq!(registry.resolve(user_id).await.len(), 1);
        // 未知用户解析为空集合
        assert!(registry.resolve(Uuid::new_v4()).await.is_empty());
    }

    #[tokio::test]
    async fn test_multi_connection_adds() {
        let registry = ConnectionRegistry::new(false);
        let user_id = Uuid::new_v4();

        let (conn_a, tx_a, _rx_a) = new_conn();
        let (conn_b, tx_b, _rx_b) = new_conn();
        registry.register(conn_a, tx_a).await;
        registry.register(conn_b, tx_b).await;
        registry.bind(conn_a, user_id).await;
        registry.bind(conn_b, user_id).await;

        assert_eq!(registry.resolve(user_id).await.len(), 2);

        // 第一条连接断开后用户仍在线
        let (found, was_last) = registry.unbind(conn_a).await.unwrap();
        assert_eq!(found, user_id);
        assert!(!was_last);

        let (_, was_last) = registry.unbind(conn_b).await.unwrap();
        assert!(was_last);
        assert!(registry.resolve(user_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_single_connection_evicts_prior() {
        let registry = ConnectionRegistry::new(true);
        let user_id = Uuid::new_v4();

        let (conn_a, tx_a, mut rx_a) = new_conn();
        let (conn_b, tx_b, _rx_b) = new_conn();
        registry.register(conn_a, tx_a).await;
        registry.register(conn_b, tx_b).await;

        registry.bind(conn_a, user_id).await;
        registry.bind(conn_b, user_id).await;

        // 旧连接收到强制下线信号且不再归属该用户
        assert_eq!(rx_a.recv().await, Some(ServerEvent::ForcedLogout));
        assert_eq!(registry.identity(conn_a).await, None);
        assert_eq!(registry.resolve(user_id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_rebind_to_new_user_clears_old_index() {
        let registry = ConnectionRegistry::new(false);
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let (conn_id, tx, _rx) = new_conn();

        registry.register(conn_id, tx).await;
        registry.bind(conn_id, user_a).await;
        registry.bind(conn_id, user_b).await;

        // 旧身份的索引被摘除，发给旧用户的事件不会串入新会话
        assert!(registry.resolve(user_a).await.is_empty());
        assert_eq!(registry.identity(conn_id).await, Some(user_b));
        assert_eq!(registry.resolve(user_b).await.len(), 1);

        // 断开时不会把旧用户误报为仍有连接
        let (found, was_last) = registry.unbind(conn_id).await.unwrap();
        assert_eq!(found, user_b);
        assert!(was_last);
    }

    #[tokio::test]
    async fn test_rebind_same_user_is_idempotent() {
        let registry = ConnectionRegistry::new(false);
        let user_id = Uuid::new_v4();
        let (conn_id, tx, _rx) = new_conn();

        registry.register(conn_id, tx).await;
        registry.bind(conn_id, user_id).await;
        registry.bind(conn_id, user_id).await;

        assert_eq!(registry.resolve(user_id).await.len(), 1);
        let (_, was_last) = registry.unbind(conn_id).await.unwrap();
        assert!(was_last);
    }

    #[tokio::test]
    async fn test_unbind_unauthenticated_connection() {
        let registry = ConnectionRegistry::new(false);
        let (conn_id, tx, _rx) = new_conn();
        registry.register(conn_id, tx).await;

        // 未登录的连接断开不产生用户信息
        assert_eq!(registry.unbind(conn_id).await, None);
        assert_eq!(registry.unbind(conn_id).await, None);
    }
}
