use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, sleep_until, Duration, Instant};

use crate::{
    api::AppState,
    constants::{WS_CLIENT_TIMEOUT_SECS, WS_HEARTBEAT_INTERVAL_SECS},
    models::Notification,
};

fn connected_payload() -> String {
    serde_json::json!({
        "type": "connected",
        "message": "Connected to notification stream"
    })
    .to_string()
}

fn toast_frame(notification: &Notification) -> Option<Message> {
    match serde_json::to_string(notification) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::warn!("Dropping unserializable notification: {}", e);
            None
        }
    }
}

/// GET /ws/notifications
pub async fn handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| stream_toasts(socket, state))
}

/// Forward claim toasts until the client leaves, goes quiet, or the
/// channel closes.
async fn stream_toasts(socket: WebSocket, state: AppState) {
    let (mut outbound, mut inbound) = socket.split();
    let mut toasts = state.notifications.subscribe();
    let mut heartbeat = interval(Duration::from_secs(WS_HEARTBEAT_INTERVAL_SECS));
    let idle_limit = Duration::from_secs(WS_CLIENT_TIMEOUT_SECS);
    let mut deadline = Instant::now() + idle_limit;

    if outbound
        .send(Message::Text(connected_payload().into()))
        .await
        .is_err()
    {
        return;
    }

    loop {
        let frame = tokio::select! {
            _ = heartbeat.tick() => Some(Message::Ping(Vec::new().into())),
            received = toasts.recv() => match received {
                Ok(notification) => toast_frame(&notification),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Notification subscriber lagged, skipped {}", skipped);
                    None
                }
                Err(RecvError::Closed) => break,
            },
            incoming = inbound.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {
                    deadline = Instant::now() + idle_limit;
                    None
                }
            },
            _ = sleep_until(deadline) => {
                tracing::info!("Notification client idle, closing");
                break;
            }
        };

        if let Some(frame) = frame {
            if outbound.send(frame).await.is_err() {
                break;
            }
        }
    }

    tracing::info!("Notification stream closed");
}
