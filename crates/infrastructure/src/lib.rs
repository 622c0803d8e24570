//! 基础设施层
//!
//! 提供 Repository 接口的内存实现。核心只通过领域层的仓储接口
//! 访问存储，换用其它存储后端不影响上层服务。

pub mod memory;

pub use memory::{
    InMemoryFriendshipRepository, InMemoryGroupRepository, InMemoryMessageRepository,
    InMemoryNotificationRepository, InMemoryUserRepository,
};
