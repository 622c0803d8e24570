//! 在线状态服务
//!
//! 处理登录（按显示名查找或创建用户）、状态变更和断开连接。
//! userStatusUpdate 采用全局广播而非好友范围广播，与既有客户端
//! 行为保持一致。

use crate::dto::UserSummary;
use crate::error::ApplicationResult;
use crate::events::{ConnectionId, Outbound, ServerEvent};
use crate::registry::ConnectionRegistry;
use crate::services::{MessagingService, SocialService};
use domain::{DomainError, NotificationRepository, User, UserRepository, UserStatus};
use std::sync::Arc;
use uuid::Uuid;

/// 在线状态服务依赖
pub struct PresenceServiceDependencies {
    pub users: Arc<dyn UserRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub registry: Arc<ConnectionRegistry>,
    pub social: Arc<SocialService>,
    pub messaging: Arc<MessagingService>,
}

/// 在线状态服务
pub struct PresenceService {
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
    registry: Arc<ConnectionRegistry>,
    social: Arc<SocialService>,
    messaging: Arc<MessagingService>,
}

impl PresenceService {
    pub fn new(deps: PresenceServiceDependencies) -> Self {
        Self {
            users: deps.users,
            notifications: deps.notifications,
            registry: deps.registry,
            social: deps.social,
            messaging: deps.messaging,
        }
    }

    /// 登录：按规范化显示名查找或创建用户，置为在线并绑定连接，
    /// 向发起连接推送完整快照，向全部连接广播状态更新。
    ///
    /// 与已存在的离线用户重名不是错误——那就是再次登录。
    pub async fn login(
        &self,
        conn_id: ConnectionId,
        display_name: &str,
    ) -> ApplicationResult<Vec<Outbound>> {
        let user = match self.users.find_by_name(display_name).await? {
            Some(mut user) => {
                user.mark_online();
                self.users.update(&user).await?
            }
            None => {
                let user = User::new(display_name)?;
                self.users.create(&user).await?
            }
        };

        self.registry.bind(conn_id, user.id).await;
        tracing::info!(user_id = %user.id, display_name = %user.display_name, "用户登录");

        let messages = self.messaging.history(user.id).await?;
        let friends = self.social.friends_of(user.id).await?;
        let pending = self.social.pending_inbound(user.id).await?;
        let groups = self.messaging.groups_for(user.id).await?;
        let notifications = self.notifications.list_for_user(user.id).await?;
        let users = self
            .users
            .list_all()
            .await?
            .iter()
            .map(UserSummary::from_user)
            .collect();

        let summary = UserSummary::from_user(&user);

        Ok(vec![
            Outbound::to_origin(ServerEvent::LoginSuccess {
                user: summary.clone(),
            }),
            Outbound::to_origin(ServerEvent::MessageHistory { messages }),
            Outbound::to_origin(ServerEvent::UsersList { users }),
            Outbound::to_origin(ServerEvent::FriendsList { friends }),
            Outbound::to_origin(ServerEvent::PendingRequests { requests: pending }),
            Outbound::to_origin(ServerEvent::GroupsList { groups }),
            Outbound::to_origin(ServerEvent::Notifications { notifications }),
            Outbound::broadcast(ServerEvent::UserStatusUpdate { user: summary }),
        ])
    }

    /// 更新在线状态并全局广播
    pub async fn update_status(
        &self,
        user_id: Uuid,
        status: UserStatus,
    ) -> ApplicationResult<Vec<Outbound>> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id.to_string()))?;

        user.set_status(status);
        let user = self.users.update(&user).await?;

        Ok(vec![Outbound::broadcast(ServerEvent::UserStatusUpdate {
            user: UserSummary::from_user(&user),
        })])
    }

    /// 连接断开。注册表清理无条件执行；如果这是该用户的最后
    /// 一条连接，则将其置为离线并广播状态更新。
    pub async fn disconnect(&self, conn_id: ConnectionId) -> ApplicationResult<Vec<Outbound>> {
        let Some((user_id, was_last)) = self.registry.unbind(conn_id).await else {
            return Ok(Vec::new());
        };

        if !was_last {
            return Ok(Vec::new());
        }

        let Some(mut user) = self.users.find_by_id(user_id).await? else {
            return Ok(Vec::new());
        };

        user.mark_offline();
        let user = self.users.update(&user).await?;
        tracing::info!(user_id = %user.id, "用户离线");

        Ok(vec![Outbound::broadcast(ServerEvent::UserStatusUpdate {
            user: UserSummary::from_user(&user),
        })])
    }
}
