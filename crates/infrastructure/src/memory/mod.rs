//! 内存存储实现
//!
//! 每个仓储由单个读写锁保护的映射构成，所有单实体操作在写锁内
//! 完成，天然满足单实体原子性要求。进程重启后数据清空。

pub mod friendship_repository;
pub mod group_repository;
pub mod message_repository;
pub mod notification_repository;
pub mod user_repository;

pub use friendship_repository::InMemoryFriendshipRepository;
pub use group_repository::InMemoryGroupRepository;
pub use message_repository::InMemoryMessageRepository;
pub use notification_repository::InMemoryNotificationRepository;
pub use user_repository::InMemoryUserRepository;
