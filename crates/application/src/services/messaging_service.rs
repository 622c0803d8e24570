//! 消息服务
//!
//! 负责消息创建与授权（好友门禁、群组成员门禁）、群组扇出、
//! 表情回应切换和已读回执。好友门禁是部署策略开关，
//! 通过配置传入而不是代码分支。

use crate::dto::MessageView;
use crate::error::ApplicationResult;
use crate::events::{Outbound, ServerEvent};
use domain::{
    DomainError, FriendshipRepository, Group, GroupRepository, Message, MessageKind,
    MessageRepository, MessageTarget, Notification, NotificationKind, NotificationRepository,
    User, UserRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 消息服务依赖
pub struct MessagingServiceDependencies {
    pub users: Arc<dyn UserRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub friendships: Arc<dyn FriendshipRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    /// 好友门禁：私聊是否要求已接受的好友关系
    pub friend_gate: bool,
}

/// 消息服务
pub struct MessagingService {
    users: Arc<dyn UserRepository>,
    messages: Arc<dyn MessageRepository>,
    friendships: Arc<dyn FriendshipRepository>,
    groups: Arc<dyn GroupRepository>,
    notifications: Arc<dyn NotificationRepository>,
    friend_gate: bool,
}

impl MessagingService {
    pub fn new(deps: MessagingServiceDependencies) -> Self {
        Self {
            users: deps.users,
            messages: deps.messages,
            friendships: deps.friendships,
            groups: deps.groups,
            notifications: deps.notifications,
            friend_gate: deps.friend_gate,
        }
    }

    /// 发送消息。
    ///
    /// recipientId 与 groupId 必居其一。私聊受好友门禁约束，
    /// 群聊要求发送者是群组成员。消息回显只发给发起连接，
    /// 其余接收者通过各自的全部在线连接收到 newMessage 和 newNotification。
    pub async fn send(
        &self,
        sender_id: Uuid,
        recipient_id: Option<Uuid>,
        group_id: Option<Uuid>,
        text: &str,
        kind: MessageKind,
    ) -> ApplicationResult<Vec<Outbound>> {
        let target = match (recipient_id, group_id) {
            (Some(user_id), None) => MessageTarget::Direct(user_id),
            (None, Some(group_id)) => MessageTarget::Group(group_id),
            _ => {
                return Err(DomainError::validation(
                    "recipientId",
                    "recipientId 与 groupId 必须恰好设置一个",
                )
                .into())
            }
        };

        let sender = self.find_user(sender_id).await?;
        let recipients = self.authorize_and_resolve(sender_id, target).await?;

        let message = Message::new(sender_id, target, text, kind)?;
        let message = self.messages.create(&message).await?;
        let view = MessageView::new(message, sender.display_name.clone());

        tracing::info!(message_id = %view.message.id, sender = %sender_id, "消息已持久化");

        // 发送者只通过发起连接收到回显，不向其它设备重复广播
        let mut outbounds = vec![Outbound::to_origin(ServerEvent::NewMessage {
            message: view.clone(),
        })];

        for recipient_id in recipients {
            let notification = Notification::new(
                NotificationKind::NewMessage,
                sender_id,
                recipient_id,
                format!("New message from {}", sender.display_name),
            );
            let notification = self.notifications.create(&notification).await?;

            outbounds.push(Outbound::to_user(
                recipient_id,
                ServerEvent::NewMessage {
                    message: view.clone(),
                },
            ));
            outbounds.push(Outbound::to_user(
                recipient_id,
                ServerEvent::NewNotification { notification },
            ));
        }

        Ok(outbounds)
    }

    /// 用户相关的全部历史消息，按创建顺序
    pub async fn history(&self, user_id: Uuid) -> ApplicationResult<Vec<MessageView>> {
        let group_ids: Vec<Uuid> = self
            .groups
            .list_for_user(user_id)
            .await?
            .iter()
            .map(|g| g.id)
            .collect();
        let messages = self.messages.find_for_user(user_id, &group_ids).await?;

        let names: HashMap<Uuid, String> = self
            .users
            .list_all()
            .await?
            .into_iter()
            .map(|u| (u.id, u.display_name))
            .collect();

        Ok(messages
            .into_iter()
            .map(|message| {
                let sender_name = names.get(&message.sender_id).cloned().unwrap_or_default();
                MessageView::new(message, sender_name)
            })
            .collect())
    }

    /// 切换表情回应并向参与者集合广播更新后的完整消息
    pub async fn toggle_reaction(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        emoji: &str,
    ) -> ApplicationResult<Vec<Outbound>> {
        let message = self
            .messages
            .toggle_reaction(message_id, user_id, emoji)
            .await?;
        let participants = self.participants_of(&message).await?;
        let sender_name = self
            .users
            .find_by_id(message.sender_id)
            .await?
            .map(|u| u.display_name)
            .unwrap_or_default();

        Ok(vec![Outbound::to_users(
            participants,
            ServerEvent::MessageUpdated {
                message: MessageView::new(message, sender_name),
            },
        )])
    }

    /// 标记消息已读。重复调用是无操作；只有非发送者的首次已读
    /// 才向发送者推送回执。
    pub async fn mark_read(
        &self,
        message_id: Uuid,
        user_id: Uuid,
    ) -> ApplicationResult<Vec<Outbound>> {
        let (message, changed) = self.messages.mark_read(message_id, user_id).await?;

        if changed && user_id != message.sender_id {
            Ok(vec![Outbound::to_user(
                message.sender_id,
                ServerEvent::MessageRead {
                    message_id,
                    reader_id: user_id,
                },
            )])
        } else {
            Ok(Vec::new())
        }
    }

    /// 创建群组并通知全部成员
    pub async fn create_group(
        &self,
        creator_id: Uuid,
        name: &str,
        member_ids: Vec<Uuid>,
    ) -> ApplicationResult<Vec<Outbound>> {
        let group = Group::new(name, creator_id, member_ids)?;
        let group = self.groups.create(&group).await?;

        Ok(vec![Outbound::to_users(
            group.members.clone(),
            ServerEvent::GroupCreated { group },
        )])
    }

    /// 用户所属的全部群组
    pub async fn groups_for(&self, user_id: Uuid) -> ApplicationResult<Vec<Group>> {
        Ok(self.groups.list_for_user(user_id).await?)
    }

    /// 校验发送权限并解析除发送者外的接收用户集合
    async fn authorize_and_resolve(
        &self,
        sender_id: Uuid,
        target: MessageTarget,
    ) -> ApplicationResult<Vec<Uuid>> {
        match target {
            MessageTarget::Direct(recipient_id) => {
                self.find_user(recipient_id).await?;

                if self.friend_gate {
                    let accepted = self
                        .friendships
                        .find_pair(sender_id, recipient_id)
                        .await?
                        .map(|f| f.is_accepted())
                        .unwrap_or(false);
                    if !accepted {
                        return Err(
                            DomainError::forbidden("只能给已接受的好友发送私聊消息").into()
                        );
                    }
                }

                Ok(vec![recipient_id])
            }
            MessageTarget::Group(group_id) => {
                let group = self
                    .groups
                    .find_by_id(group_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Group", group_id.to_string()))?;
                if !group.is_member(sender_id) {
                    return Err(DomainError::forbidden("只有群组成员可以发送群消息").into());
                }

                Ok(group
                    .members
                    .iter()
                    .copied()
                    .filter(|member| *member != sender_id)
                    .collect())
            }
        }
    }

    /// 消息的参与者集合：私聊为发送者和接收者，群聊为全部成员
    async fn participants_of(&self, message: &Message) -> ApplicationResult<Vec<Uuid>> {
        match message.target() {
            MessageTarget::Direct(recipient_id) => Ok(vec![message.sender_id, recipient_id]),
            MessageTarget::Group(group_id) => Ok(self
                .groups
                .find_by_id(group_id)
                .await?
                .map(|g| g.members)
                .unwrap_or_else(|| vec![message.sender_id])),
        }
    }

    async fn find_user(&self, user_id: Uuid) -> ApplicationResult<User> {
        Ok(self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id.to_string()))?)
    }
}
