use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::websocket;

/// 状态探针响应
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub users: u64,
    pub messages: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/ws", get(websocket::upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET / —— 运行状态和累计计数
async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let users = state.users.count().await.map_err(internal_error)?;
    let messages = state.messages.count().await.map_err(internal_error)?;

    Ok(Json(StatusResponse {
        message: "Messenger server is running".to_string(),
        users,
        messages,
    }))
}

fn internal_error(err: domain::DomainError) -> StatusCode {
    tracing::error!(error = %err, "状态探针查询失败");
    StatusCode::INTERNAL_SERVER_ERROR
}
