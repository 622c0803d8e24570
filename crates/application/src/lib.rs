//! 应用层
//!
//! 承载实时事件路由与社交关系状态引擎：在线状态、好友关系、
//! 消息收发三个服务，连接注册表，以及把入站事件分发到服务、
//! 把出站事件扇出到目标连接的事件路由器。

pub mod dto;
pub mod error;
pub mod events;
pub mod registry;
pub mod router;
pub mod services;

pub use dto::{MessageView, PendingRequestView, UserSummary};
pub use error::{ApplicationError, ApplicationResult};
pub use events::{ClientEvent, ConnectionId, Outbound, Recipient, ServerEvent};
pub use registry::ConnectionRegistry;
pub use router::EventRouter;
pub use services::{MessagingService, PresenceService, SocialService};
