//! WebSocket 连接处理
//!
//! 每条连接升级后立即在连接注册表中注册（此时尚未认证），
//! 之后客户端必须先发送 login 事件建立身份。出站事件经由
//! 无界通道串行写回套接字；无论连接如何结束，断开清理都会执行。

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use application::{ClientEvent, ConnectionId, Outbound, ServerEvent};

use crate::state::AppState;

/// GET /ws —— 升级为 WebSocket 连接
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id: ConnectionId = Uuid::new_v4();
    debug!(connection_id = %conn_id, "WebSocket 连接建立");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    state.registry.register(conn_id, tx).await;

    // 发送任务：序列化出站事件并写回套接字
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(connection_id = %conn_id, error = %err, "出站事件序列化失败");
                    continue;
                }
            };
            if sink.send(WsMessage::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // 接收任务：解析入站事件并交给事件路由器
    let recv_router = state.router.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            match msg {
                Ok(WsMessage::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => recv_router.handle_event(conn_id, event).await,
                    Err(err) => {
                        warn!(connection_id = %conn_id, error = %err, "入站事件解析失败");
                        let event = ServerEvent::Error {
                            code: "VALIDATION_ERROR".to_string(),
                            message: "malformed event payload".to_string(),
                        };
                        recv_router
                            .deliver(conn_id, vec![Outbound::to_origin(event)])
                            .await;
                    }
                },
                Ok(WsMessage::Close(_)) => break,
                // Ping/Pong 由 axum 自动应答
                Ok(_) => {}
                Err(err) => {
                    debug!(connection_id = %conn_id, error = %err, "WebSocket 读取错误");
                    break;
                }
            }
        }
    });

    // 任一方向结束即视为连接终止
    tokio::select! {
        _ = send_task => {}
        _ = recv_task => {}
    }

    state.router.handle_disconnect(conn_id).await;
    debug!(connection_id = %conn_id, "WebSocket 连接清理完成");
}
