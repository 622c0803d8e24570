//! 应用层服务

pub mod messaging_service;
pub mod presence_service;
pub mod social_service;

pub use messaging_service::{MessagingService, MessagingServiceDependencies};
pub use presence_service::{PresenceService, PresenceServiceDependencies};
pub use social_service::SocialService;
