use std::sync::Arc;

use application::{ConnectionRegistry, EventRouter};
use domain::{MessageRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<EventRouter>,
    pub registry: Arc<ConnectionRegistry>,
    pub users: Arc<dyn UserRepository>,
    pub messages: Arc<dyn MessageRepository>,
}

impl AppState {
    pub fn new(
        router: Arc<EventRouter>,
        registry: Arc<ConnectionRegistry>,
        users: Arc<dyn UserRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            router,
            registry,
            users,
            messages,
        }
    }
}
