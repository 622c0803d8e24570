//! Repository 接口定义
//!
//! 仓储只负责数据访问，不包含业务逻辑。所有操作在单实体级别原子，
//! 核心不要求跨实体事务。

pub mod friendship_repository;
pub mod group_repository;
pub mod message_repository;
pub mod notification_repository;
pub mod user_repository;

pub use friendship_repository::FriendshipRepository;
pub use group_repository::GroupRepository;
pub use message_repository::MessageRepository;
pub use notification_repository::NotificationRepository;
pub use user_repository::UserRepository;

#[cfg(feature = "testing")]
pub use friendship_repository::MockFriendshipRepository;
#[cfg(feature = "testing")]
pub use group_repository::MockGroupRepository;
#[cfg(feature = "testing")]
pub use message_repository::MockMessageRepository;
#[cfg(feature = "testing")]
pub use notification_repository::MockNotificationRepository;
#[cfg(feature = "testing")]
pub use user_repository::MockUserRepository;
