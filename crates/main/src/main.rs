//! 主应用程序入口
//!
//! 组装内存仓储、应用层服务和事件路由器，启动 Axum Web 服务。

use application::{
    services::{
        MessagingService, MessagingServiceDependencies, PresenceService,
        PresenceServiceDependencies, SocialService,
    },
    ConnectionRegistry, EventRouter,
};
use config::AppConfig;
use domain::{
    FriendshipRepository, GroupRepository, MessageRepository, NotificationRepository,
    UserRepository,
};
use infrastructure::{
    InMemoryFriendshipRepository, InMemoryGroupRepository, InMemoryMessageRepository,
    InMemoryNotificationRepository, InMemoryUserRepository,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env()?;

    // 内存仓储，重启后状态清空
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let messages: Arc<dyn MessageRepository> = Arc::new(InMemoryMessageRepository::new());
    let friendships: Arc<dyn FriendshipRepository> = Arc::new(InMemoryFriendshipRepository::new());
    let groups: Arc<dyn GroupRepository> = Arc::new(InMemoryGroupRepository::new());
    let notifications: Arc<dyn NotificationRepository> =
        Arc::new(InMemoryNotificationRepository::new());

    let registry = Arc::new(ConnectionRegistry::new(config.connection.single_connection));

    // 应用层服务
    let social = Arc::new(SocialService::new(
        users.clone(),
        friendships.clone(),
        notifications.clone(),
    ));
    let messaging = Arc::new(MessagingService::new(MessagingServiceDependencies {
        users: users.clone(),
        messages: messages.clone(),
        friendships,
        groups,
        notifications: notifications.clone(),
        friend_gate: config.messaging.friend_gate,
    }));
    let presence = Arc::new(PresenceService::new(PresenceServiceDependencies {
        users: users.clone(),
        notifications,
        registry: registry.clone(),
        social: social.clone(),
        messaging: messaging.clone(),
    }));

    let event_router = Arc::new(EventRouter::new(
        registry.clone(),
        presence,
        social,
        messaging,
    ));

    // 启动 Web 服务器
    let state = AppState::new(event_router, registry, users, messages);
    let app = router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        friend_gate = config.messaging.friend_gate,
        single_connection = config.connection.single_connection,
        "消息服务器启动在 http://{address}"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
