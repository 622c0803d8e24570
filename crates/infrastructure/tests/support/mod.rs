//! 集成测试支撑：组装完整的服务栈并模拟客户端连接
#![allow(dead_code)]

use application::services::{
    MessagingService, MessagingServiceDependencies, PresenceService,
    PresenceServiceDependencies, SocialService,
};
use application::{ClientEvent, ConnectionId, ConnectionRegistry, EventRouter, ServerEvent, UserSummary};
use domain::{
    FriendshipRepository, GroupRepository, MessageRepository, NotificationRepository,
    UserRepository,
};
use infrastructure::{
    InMemoryFriendshipRepository, InMemoryGroupRepository, InMemoryMessageRepository,
    InMemoryNotificationRepository, InMemoryUserRepository,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// 完整组装的测试应用
pub struct TestApp {
    pub router: Arc<EventRouter>,
    pub registry: Arc<ConnectionRegistry>,
}

impl TestApp {
    /// 默认配置：好友门禁开启，多连接模式
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(friend_gate: bool, single_connection: bool) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let messages: Arc<dyn MessageRepository> = Arc::new(InMemoryMessageRepository::new());
        let friendships: Arc<dyn FriendshipRepository> =
            Arc::new(InMemoryFriendshipRepository::new());
        let groups: Arc<dyn GroupRepository> = Arc::new(InMemoryGroupRepository::new());
        let notifications: Arc<dyn NotificationRepository> =
            Arc::new(InMemoryNotificationRepository::new());

        let registry = Arc::new(ConnectionRegistry::new(single_connection));

        let social = Arc::new(SocialService::new(
            users.clone(),
            friendships.clone(),
            notifications.clone(),
        ));
        let messaging = Arc::new(MessagingService::new(MessagingServiceDependencies {
            users: users.clone(),
            messages,
            friendships,
            groups,
            notifications: notifications.clone(),
            friend_gate,
        }));
        let presence = Arc::new(PresenceService::new(PresenceServiceDependencies {
            users,
            notifications,
            registry: registry.clone(),
            social: social.clone(),
            messaging: messaging.clone(),
        }));

        let router = Arc::new(EventRouter::new(registry.clone(), presence, social, messaging));

        Self { router, registry }
    }

    /// 打开一条未认证的连接
    pub async fn connect(&self) -> TestConn {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.registry.register(id, tx).await;
        TestConn { id, rx }
    }

    /// 打开连接并登录，返回连接、用户摘要和登录快照的其余事件
    pub async fn login(&self, name: &str) -> (TestConn, UserSummary, Vec<ServerEvent>) {
        let mut conn = self.connect().await;
        self.router
            .handle_event(
                conn.id,
                ClientEvent::Login {
                    display_name: name.to_string(),
                },
            )
            .await;

        let mut events = conn.drain();
        let user = match events.first() {
            Some(ServerEvent::LoginSuccess { user }) => user.clone(),
            other => panic!("expected loginSuccess, got {other:?}"),
        };
        events.remove(0);

        (conn, user, events)
    }

    pub async fn send(&self, conn: &TestConn, event: ClientEvent) {
        self.router.handle_event(conn.id, event).await;
    }

    pub async fn disconnect(&self, conn: &TestConn) {
        self.router.handle_disconnect(conn.id).await;
    }

    /// 建立两个已登录用户之间的好友关系并清空双方事件队列
    pub async fn befriend(
        &self,
        a: &mut TestConn,
        b: &mut TestConn,
        b_user: &UserSummary,
    ) {
        self.send(
            a,
            ClientEvent::AddFriend {
                target_user_id: b_user.id,
            },
        )
        .await;

        let friendship_id = b
            .drain()
            .into_iter()
            .find_map(|e| match e {
                ServerEvent::FriendRequest { friendship_id, .. } => Some(friendship_id),
                _ => None,
            })
            .expect("target should receive friendRequest");

        self.send(b, ClientEvent::AcceptFriend { friendship_id }).await;
        a.drain();
        b.drain();
    }
}

/// 模拟客户端连接
pub struct TestConn {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<ServerEvent>,
}

impl TestConn {
    /// 取出已缓冲的全部出站事件
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// 断言没有任何事件送达
    pub fn assert_silent(&mut self) {
        let events = self.drain();
        assert!(events.is_empty(), "unexpected events: {events:?}");
    }
}

/// 在事件列表中查找首个匹配项
pub fn find_event<F>(events: &[ServerEvent], pred: F) -> Option<&ServerEvent>
where
    F: Fn(&ServerEvent) -> bool,
{
    events.iter().find(|e| pred(e))
}
