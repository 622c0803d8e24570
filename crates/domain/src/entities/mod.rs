//! 领域实体定义

pub mod friendship;
pub mod group;
pub mod message;
pub mod notification;
pub mod user;

pub use friendship::{Friendship, FriendshipStatus};
pub use group::Group;
pub use message::{Message, MessageKind, MessageTarget, Reaction};
pub use notification::{Notification, NotificationKind};
pub use user::{User, UserStatus};
