//! 线上事件定义
//!
//! 入站事件由客户端以 `{"type": "...", ...}` 形式的JSON发送，
//! 出站事件以同样的形式推送。字段名一律使用 camelCase，
//! 与历史客户端保持兼容。

use crate::dto::{MessageView, PendingRequestView, UserSummary};
use domain::{Group, MessageKind, Notification, UserStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 连接句柄标识
pub type ConnectionId = Uuid;

/// 客户端入站事件
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// 登录（按显示名查找或创建用户）
    Login { display_name: String },
    /// 按显示名子串搜索用户
    SearchUsers { term: String },
    /// 发送好友请求
    AddFriend { target_user_id: Uuid },
    /// 接受好友请求
    AcceptFriend { friendship_id: Uuid },
    /// 拒绝好友请求
    RejectFriend { friendship_id: Uuid },
    /// 解除好友关系
    RemoveFriend { friend_user_id: Uuid },
    /// 查询收到的待处理请求
    GetPendingRequests,
    /// 查询好友列表
    GetFriends,
    /// 查询所属群组
    GetGroups,
    /// 创建群组
    CreateGroup {
        name: String,
        #[serde(default)]
        member_ids: Vec<Uuid>,
    },
    /// 发送消息，recipientId 与 groupId 必居其一
    SendMessage {
        #[serde(default)]
        recipient_id: Option<Uuid>,
        #[serde(default)]
        group_id: Option<Uuid>,
        text: String,
        #[serde(default)]
        kind: Option<MessageKind>,
    },
    /// 切换消息表情回应
    AddReaction { message_id: Uuid, emoji: String },
    /// 标记消息已读
    MarkAsRead { message_id: Uuid },
    /// 更新在线状态
    UpdateStatus { status: UserStatus },
}

/// 服务端出站事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    LoginSuccess { user: UserSummary },
    MessageHistory { messages: Vec<MessageView> },
    UsersList { users: Vec<UserSummary> },
    FriendsList { friends: Vec<UserSummary> },
    GroupsList { groups: Vec<Group> },
    Notifications { notifications: Vec<Notification> },
    SearchResults { users: Vec<UserSummary> },
    PendingRequests { requests: Vec<PendingRequestView> },
    FriendRequestSent { target: UserSummary },
    FriendRequest {
        friendship_id: Uuid,
        requester: UserSummary,
    },
    FriendAccepted { other: UserSummary },
    FriendRequestRejected { friendship_id: Uuid },
    FriendRemoved { user_id: Uuid },
    NewMessage { message: MessageView },
    MessageUpdated { message: MessageView },
    MessageRead {
        message_id: Uuid,
        reader_id: Uuid,
    },
    MessageError { reason: String },
    UserStatusUpdate { user: UserSummary },
    NewNotification { notification: Notification },
    GroupCreated { group: Group },
    ForcedLogout,
    Error { code: String, message: String },
}

/// 出站事件的投递范围
#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    /// 仅发起本次事件的连接
    Origin,
    /// 指定用户的全部在线连接
    User(Uuid),
    /// 一组用户的全部在线连接
    Users(Vec<Uuid>),
    /// 全部在线连接（全局广播）
    AllConnections,
}

/// 待投递的出站事件
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Recipient,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(to: Recipient, event: ServerEvent) -> Self {
        Self { to, event }
    }

    /// 发给发起连接
    pub fn to_origin(event: ServerEvent) -> Self {
        Self::new(Recipient::Origin, event)
    }

    /// 发给指定用户的全部连接
    pub fn to_user(user_id: Uuid, event: ServerEvent) -> Self {
        Self::new(Recipient::User(user_id), event)
    }

    /// 发给一组用户的全部连接
    pub fn to_users(user_ids: Vec<Uuid>, event: ServerEvent) -> Self {
        Self::new(Recipient::Users(user_ids), event)
    }

    /// 全局广播
    pub fn broadcast(event: ServerEvent) -> Self {
        Self::new(Recipient::AllConnections, event)
    }
}
