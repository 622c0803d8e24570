//! 社交关系服务
//!
//! 负责好友关系的完整生命周期：请求、接受、拒绝、解除，
//! 以及好友列表与待处理请求的查询。双方同时互发请求的竞争
//! 由无序用户对的唯一性约束化解：后到的请求观察到已有记录，
//! 以 Conflict 返回。

use crate::dto::{PendingRequestView, UserSummary};
use crate::error::ApplicationResult;
use crate::events::{Outbound, ServerEvent};
use domain::{
    DomainError, Friendship, FriendshipRepository, FriendshipStatus, Notification,
    NotificationKind, NotificationRepository, User, UserRepository,
};
use std::sync::Arc;
use uuid::Uuid;

/// 社交关系服务
pub struct SocialService {
    users: Arc<dyn UserRepository>,
    friendships: Arc<dyn FriendshipRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl SocialService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        friendships: Arc<dyn FriendshipRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            users,
            friendships,
            notifications,
        }
    }

    /// 按显示名子串搜索用户（不区分大小写），排除自己，
    /// 并为每条结果注解好友关系状态。
    pub async fn search(&self, by_user_id: Uuid, term: &str) -> ApplicationResult<Vec<Outbound>> {
        let needle = term.trim().to_lowercase();
        let mut results = Vec::new();

        if !needle.is_empty() {
            for user in self.users.list_all().await? {
                if user.id == by_user_id {
                    continue;
                }
                if !user.display_name.to_lowercase().contains(&needle) {
                    continue;
                }

                let pair = self.friendships.find_pair(by_user_id, user.id).await?;
                let is_friend = pair.as_ref().map(|f| f.is_accepted()).unwrap_or(false);
                let has_pending_request = pair
                    .as_ref()
                    .map(|f| {
                        f.status == FriendshipStatus::Pending && f.requester_id == by_user_id
                    })
                    .unwrap_or(false);

                results.push(UserSummary::annotated(&user, is_friend, has_pending_request));
            }
        }

        Ok(vec![Outbound::to_origin(ServerEvent::SearchResults {
            users: results,
        })])
    }

    /// 发送好友请求。该用户对已存在任何状态的记录时返回 Conflict。
    pub async fn send_request(&self, from_id: Uuid, to_id: Uuid) -> ApplicationResult<Vec<Outbound>> {
        let requester = self.find_user(from_id).await?;
        let target = self.find_user(to_id).await?;

        let friendship = Friendship::new(from_id, to_id)?;
        let friendship = self.friendships.create(&friendship).await?;

        let notification = Notification::new(
            NotificationKind::FriendRequest,
            from_id,
            to_id,
            format!("{} sent you a friend request", requester.display_name),
        );
        let notification = self.notifications.create(&notification).await?;

        tracing::info!(from = %from_id, to = %to_id, friendship_id = %friendship.id, "好友请求已创建");

        Ok(vec![
            Outbound::to_origin(ServerEvent::FriendRequestSent {
                target: UserSummary::from_user(&target),
            }),
            Outbound::to_user(
                to_id,
                ServerEvent::FriendRequest {
                    friendship_id: friendship.id,
                    requester: UserSummary::from_user(&requester),
                },
            ),
            Outbound::to_user(to_id, ServerEvent::NewNotification { notification }),
        ])
    }

    /// 接受好友请求。只有请求的接收方有权接受。
    pub async fn accept(
        &self,
        friendship_id: Uuid,
        by_user_id: Uuid,
    ) -> ApplicationResult<Vec<Outbound>> {
        let mut friendship = self.find_friendship(friendship_id).await?;
        friendship.accept(by_user_id)?;
        let friendship = self
            .friendships
            .update_status(friendship.id, FriendshipStatus::Accepted)
            .await?;

        let requester = self.find_user(friendship.requester_id).await?;
        let target = self.find_user(friendship.target_id).await?;

        // 双方各自收到对方的确认事件和刷新后的好友列表；
        // 两次刷新之间的短暂不一致由客户端重新查询容忍。
        let requester_friends = self.friends_of(requester.id).await?;
        let target_friends = self.friends_of(target.id).await?;

        Ok(vec![
            Outbound::to_user(
                requester.id,
                ServerEvent::FriendAccepted {
                    other: UserSummary::from_user(&target),
                },
            ),
            Outbound::to_user(
                requester.id,
                ServerEvent::FriendsList {
                    friends: requester_friends,
                },
            ),
            Outbound::to_user(
                target.id,
                ServerEvent::FriendAccepted {
                    other: UserSummary::from_user(&requester),
                },
            ),
            Outbound::to_user(
                target.id,
                ServerEvent::FriendsList {
                    friends: target_friends,
                },
            ),
        ])
    }

    /// 拒绝好友请求：直接删除记录，该用户对之后可以重新发起请求。
    pub async fn reject(
        &self,
        friendship_id: Uuid,
        by_user_id: Uuid,
    ) -> ApplicationResult<Vec<Outbound>> {
        let friendship = self.find_friendship(friendship_id).await?;
        friendship.ensure_can_reject(by_user_id)?;
        self.friendships.delete(friendship.id).await?;

        Ok(vec![Outbound::to_user(
            friendship.requester_id,
            ServerEvent::FriendRequestRejected { friendship_id },
        )])
    }

    /// 解除好友关系，删除记录并向双方推送刷新后的好友列表。
    pub async fn remove(&self, user_id: Uuid, friend_id: Uuid) -> ApplicationResult<Vec<Outbound>> {
        let friendship = self
            .friendships
            .find_pair(user_id, friend_id)
            .await?
            .filter(|f| f.is_accepted())
            .ok_or_else(|| DomainError::not_found("Friendship", friend_id.to_string()))?;

        self.friendships.delete(friendship.id).await?;

        let user_friends = self.friends_of(user_id).await?;
        let friend_friends = self.friends_of(friend_id).await?;

        Ok(vec![
            Outbound::to_user(user_id, ServerEvent::FriendRemoved { user_id: friend_id }),
            Outbound::to_user(
                user_id,
                ServerEvent::FriendsList {
                    friends: user_friends,
                },
            ),
            Outbound::to_user(friend_id, ServerEvent::FriendRemoved { user_id }),
            Outbound::to_user(
                friend_id,
                ServerEvent::FriendsList {
                    friends: friend_friends,
                },
            ),
        ])
    }

    /// 用户的全部已接受好友
    pub async fn friends_of(&self, user_id: Uuid) -> ApplicationResult<Vec<UserSummary>> {
        let mut friends = Vec::new();
        for friendship in self
            .friendships
            .list_for_user(user_id, Some(FriendshipStatus::Accepted))
            .await?
        {
            let other_id = friendship.counterparty(user_id);
            if let Some(other) = self.users.find_by_id(other_id).await? {
                friends.push(UserSummary::from_user(&other));
            }
        }
        Ok(friends)
    }

    /// 用户收到的待处理好友请求
    pub async fn pending_inbound(
        &self,
        user_id: Uuid,
    ) -> ApplicationResult<Vec<PendingRequestView>> {
        let mut requests = Vec::new();
        for friendship in self
            .friendships
            .list_for_user(user_id, Some(FriendshipStatus::Pending))
            .await?
        {
            if friendship.target_id != user_id {
                continue;
            }
            if let Some(requester) = self.users.find_by_id(friendship.requester_id).await? {
                requests.push(PendingRequestView::new(&friendship, &requester));
            }
        }
        Ok(requests)
    }

    async fn find_user(&self, user_id: Uuid) -> ApplicationResult<User> {
        Ok(self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id.to_string()))?)
    }

    async fn find_friendship(&self, friendship_id: Uuid) -> ApplicationResult<Friendship> {
        Ok(self
            .friendships
            .find_by_id(friendship_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Friendship", friendship_id.to_string()))?)
    }
}
