use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{services::events, services::profiles::ProfileService, AppState};

#[derive(Debug, Deserialize)]
pub struct WsQueryParams {
    pub user_id: Uuid,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsQueryParams>,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        // The header extractor doesn't apply to upgrades; check the profile
        // from the query string before bridging anything.
        match ProfileService::find(&state.db, params.user_id).await {
            Ok(Some(profile)) => {
                info!("WebSocket connected: user={} ({})", profile.id, profile.name);
                handle_socket(socket, state, profile.id.to_string()).await;
            }
            Ok(None) => {
                error!("WebSocket rejected: unknown profile {}", params.user_id);
            }
            Err(e) => {
                error!("WebSocket profile lookup failed: {}", e);
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: String) {
    let (mut sender, mut receiver) = socket.split();

    // Create a dedicated pub/sub connection for the client
    let mut pubsub = match state.redis_client.get_async_pubsub().await {
        Ok(c) => c,
        Err(e) => {
            error!("Redis pubsub error: {}", e);
            return;
        }
    };

    if let Err(e) = pubsub.subscribe(events::CHANNEL).await {
        error!("Redis subscribe error: {}", e);
        return;
    }

    // Spawn task: Redis Pub/Sub → WebSocket
    let mut redis_task = tokio::spawn(async move {
        let mut pubsub_stream = pubsub.on_message();
        while let Some(msg) = pubsub_stream.next().await {
            let payload: String = match msg.get_payload() {
                Ok(p) => p,
                Err(_) => continue,
            };
            let ws_msg = serde_json::json!({
                "type": "lunch_event",
                "payload": serde_json::from_str::<serde_json::Value>(&payload)
                    .unwrap_or(serde_json::Value::String(payload))
            });
            if sender
                .send(Message::Text(ws_msg.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Receive messages from the client
    let mut client_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    info!("WS message from {}: {}", user_id, text);
                }
                Message::Ping(_) => {}
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut redis_task) => client_task.abort(),
        _ = (&mut client_task) => redis_task.abort(),
    }

    info!("WebSocket disconnected");
}
