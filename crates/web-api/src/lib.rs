//! Web API 层。
//!
//! 提供 Axum 路由：状态探针和 WebSocket 升级入口，
//! 升级后的连接把线上事件委托给应用层的事件路由器。

mod routes;
mod state;
mod websocket;

pub use routes::router;
pub use state::AppState;
