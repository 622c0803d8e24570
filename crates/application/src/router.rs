//! 事件路由器
//!
//! 每次接收一个入站事件：确认连接身份，调用对应的服务操作，
//! 把服务产生的出站事件通过连接注册表解析为目标连接并逐一投递。
//! 业务失败不会自动重试，而是转换为仅发给发起连接的错误事件；
//! 任何错误都不会导致路由器进程终止。

use crate::error::{ApplicationError, ApplicationResult};
use crate::events::{ClientEvent, ConnectionId, Outbound, Recipient, ServerEvent};
use crate::registry::ConnectionRegistry;
use crate::services::{MessagingService, PresenceService, SocialService};
use std::sync::Arc;
use uuid::Uuid;

/// 事件路由器
pub struct EventRouter {
    registry: Arc<ConnectionRegistry>,
    presence: Arc<PresenceService>,
    social: Arc<SocialService>,
    messaging: Arc<MessagingService>,
}

impl EventRouter {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        presence: Arc<PresenceService>,
        social: Arc<SocialService>,
        messaging: Arc<MessagingService>,
    ) -> Self {
        Self {
            registry,
            presence,
            social,
            messaging,
        }
    }

    /// 处理一个入站事件：分发到服务，把结果（或错误事件）投递出去
    pub async fn handle_event(&self, conn_id: ConnectionId, event: ClientEvent) {
        match self.dispatch(conn_id, &event).await {
            Ok(outbounds) => self.deliver(conn_id, outbounds).await,
            Err(err) => {
                tracing::debug!(connection_id = %conn_id, error = %err, "入站事件处理失败");
                let event = Self::error_event(&event, &err);
                self.deliver(conn_id, vec![Outbound::to_origin(event)]).await;
            }
        }
    }

    /// 连接断开（传输层触发，非客户端事件）
    pub async fn handle_disconnect(&self, conn_id: ConnectionId) {
        match self.presence.disconnect(conn_id).await {
            Ok(outbounds) => self.deliver(conn_id, outbounds).await,
            Err(err) => {
                tracing::warn!(connection_id = %conn_id, error = %err, "断开连接清理失败");
            }
        }
    }

    /// 分发入站事件。login 是唯一不要求已绑定身份的事件。
    async fn dispatch(
        &self,
        conn_id: ConnectionId,
        event: &ClientEvent,
    ) -> ApplicationResult<Vec<Outbound>> {
        if let ClientEvent::Login { display_name } = event {
            return self.presence.login(conn_id, display_name).await;
        }

        let user_id = self
            .registry
            .identity(conn_id)
            .await
            .ok_or(ApplicationError::Unauthenticated)?;

        self.dispatch_authenticated(user_id, event).await
    }

    async fn dispatch_authenticated(
        &self,
        user_id: Uuid,
        event: &ClientEvent,
    ) -> ApplicationResult<Vec<Outbound>> {
        match event {
            // 已在 dispatch 中处理
            ClientEvent::Login { .. } => Ok(Vec::new()),
            ClientEvent::SearchUsers { term } => self.social.search(user_id, term).await,
            ClientEvent::AddFriend { target_user_id } => {
                self.social.send_request(user_id, *target_user_id).await
            }
            ClientEvent::AcceptFriend { friendship_id } => {
                self.social.accept(*friendship_id, user_id).await
            }
            ClientEvent::RejectFriend { friendship_id } => {
                self.social.reject(*friendship_id, user_id).await
            }
            ClientEvent::RemoveFriend { friend_user_id } => {
                self.social.remove(user_id, *friend_user_id).await
            }
            ClientEvent::GetPendingRequests => {
                let requests = self.social.pending_inbound(user_id).await?;
                Ok(vec![Outbound::to_origin(ServerEvent::PendingRequests {
                    requests,
                })])
            }
            ClientEvent::GetFriends => {
                let friends = self.social.friends_of(user_id).await?;
                Ok(vec![Outbound::to_origin(ServerEvent::FriendsList {
                    friends,
                })])
            }
            ClientEvent::GetGroups => {
                let groups = self.messaging.groups_for(user_id).await?;
                Ok(vec![Outbound::to_origin(ServerEvent::GroupsList { groups })])
            }
            ClientEvent::CreateGroup { name, member_ids } => {
                self.messaging
                    .create_group(user_id, name, member_ids.clone())
                    .await
            }
            ClientEvent::SendMessage {
                recipient_id,
                group_id,
                text,
                kind,
            } => {
                self.messaging
                    .send(
                        user_id,
                        *recipient_id,
                        *group_id,
                        text,
                        kind.unwrap_or_default(),
                    )
                    .await
            }
            ClientEvent::AddReaction { message_id, emoji } => {
                self.messaging
                    .toggle_reaction(*message_id, user_id, emoji)
                    .await
            }
            ClientEvent::MarkAsRead { message_id } => {
                self.messaging.mark_read(*message_id, user_id).await
            }
            ClientEvent::UpdateStatus { status } => {
                self.presence.update_status(user_id, *status).await
            }
        }
    }

    /// 把出站事件解析为目标连接并按序投递。
    /// 发送端已关闭的连接直接丢弃事件。
    pub async fn deliver(&self, origin: ConnectionId, outbounds: Vec<Outbound>) {
        for Outbound { to, event } in outbounds {
            let senders = match to {
                Recipient::Origin => self
                    .registry
                    .resolve_connection(origin)
                    .await
                    .into_iter()
                    .collect(),
                Recipient::User(user_id) => self.registry.resolve(user_id).await,
                Recipient::Users(user_ids) => {
                    let mut senders = Vec::new();
                    for user_id in user_ids {
                        senders.extend(self.registry.resolve(user_id).await);
                    }
                    senders
                }
                Recipient::AllConnections => self.registry.resolve_all().await,
            };

            for sender in senders {
                if sender.send(event.clone()).is_err() {
                    tracing::debug!("目标连接已关闭，出站事件被丢弃");
                }
            }
        }
    }

    /// 业务失败转换为发给发起连接的错误事件。
    /// sendMessage 的失败按既有协议用 messageError 上报。
    fn error_event(event: &ClientEvent, err: &ApplicationError) -> ServerEvent {
        match event {
            ClientEvent::SendMessage { .. } => ServerEvent::MessageError {
                reason: err.to_string(),
            },
            _ => ServerEvent::Error {
                code: err.code().to_string(),
                message: err.to_string(),
            },
        }
    }
}
