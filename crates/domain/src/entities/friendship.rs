//! 好友关系实体定义
//!
//! 每对用户（无序对）最多存在一条记录。方向仅对待处理的请求有意义：
//! requester 发起请求，target 负责答复。拒绝或解除好友会直接删除记录，
//! 使该用户对可以重新发起请求。

use crate::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 好友关系状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FriendshipStatus {
    /// 等待对方答复
    Pending,
    /// 已成为好友
    Accepted,
    /// 已拒绝
    Rejected,
}

/// 好友关系实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    /// 记录唯一ID
    pub id: Uuid,
    /// 发起方用户ID
    pub requester_id: Uuid,
    /// 接收方用户ID
    pub target_id: Uuid,
    /// 当前状态
    pub status: FriendshipStatus,
}

impl Friendship {
    /// 创建待处理的好友请求
    pub fn new(requester_id: Uuid, target_id: Uuid) -> DomainResult<Self> {
        if requester_id == target_id {
            return Err(DomainError::validation(
                "targetUserId",
                "不能向自己发送好友请求",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            requester_id,
            target_id,
            status: FriendshipStatus::Pending,
        })
    }

    /// 无序对键，用于唯一性索引
    pub fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// 本记录对应的无序对键
    pub fn pair(&self) -> (Uuid, Uuid) {
        Self::pair_key(self.requester_id, self.target_id)
    }

    /// 检查记录是否关联指定用户
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.requester_id == user_id || self.target_id == user_id
    }

    /// 返回与指定用户相对的另一方
    pub fn counterparty(&self, user_id: Uuid) -> Uuid {
        if self.requester_id == user_id {
            self.target_id
        } else {
            self.requester_id
        }
    }

    /// 接受请求，只有 target 有权接受
    pub fn accept(&mut self, by_user_id: Uuid) -> DomainResult<()> {
        if by_user_id != self.target_id {
            return Err(DomainError::forbidden("只有接收方可以接受好友请求"));
        }
        self.status = FriendshipStatus::Accepted;
        Ok(())
    }

    /// 校验拒绝操作权限，记录本身由仓储删除
    pub fn ensure_can_reject(&self, by_user_id: Uuid) -> DomainResult<()> {
        if by_user_id != self.target_id {
            return Err(DomainError::forbidden("只有接收方可以拒绝好友请求"));
        }
        Ok(())
    }

    /// 检查是否为已生效的好友关系
    pub fn is_accepted(&self) -> bool {
        self.status == FriendshipStatus::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendship_creation() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let friendship = Friendship::new(a, b).unwrap();
        assert_eq!(friendship.requester_id, a);
        assert_eq!(friendship.target_id, b);
        assert_eq!(friendship.status, FriendshipStatus::Pending);
        assert!(!friendship.is_accepted());
    }

    #[test]
    fn test_self_request_rejected() {
        let a = Uuid::new_v4();
        assert!(Friendship::new(a, a).is_err());
    }

    #[test]
    fn test_pair_key_is_unordered() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(Friendship::pair_key(a, b), Friendship::pair_key(b, a));
    }

    #[test]
    fn test_only_target_can_accept() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut friendship = Friendship::new(a, b).unwrap();

        // 发起方不能自己接受
        assert!(friendship.accept(a).is_err());
        assert_eq!(friendship.status, FriendshipStatus::Pending);

        friendship.accept(b).unwrap();
        assert!(friendship.is_accepted());
    }

    #[test]
    fn test_only_target_can_reject() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let friendship = Friendship::new(a, b).unwrap();

        assert!(friendship.ensure_can_reject(a).is_err());
        assert!(friendship.ensure_can_reject(b).is_ok());
    }

    #[test]
    fn test_counterparty() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let friendship = Friendship::new(a, b).unwrap();

        assert_eq!(friendship.counterparty(a), b);
        assert_eq!(friendship.counterparty(b), a);
        assert!(friendship.involves(a));
        assert!(friendship.involves(b));
        assert!(!friendship.involves(Uuid::new_v4()));
    }
}
