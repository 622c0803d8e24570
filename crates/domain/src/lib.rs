//! 即时通讯系统核心领域模型
//!
//! 包含用户、好友关系、消息、群组等核心实体，以及相关的业务规则。

pub mod entities;
pub mod errors;
pub mod repositories;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use repositories::*;
