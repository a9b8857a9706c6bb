use chrono::NaiveDate;
use redis::AsyncCommands;
use serde::Serialize;
use uuid::Uuid;

/// Channel every connected WebSocket client is subscribed to.
pub const CHANNEL: &str = "lunch:events";

/// Row-level change events fanned out to connected clients. Consumers are
/// expected to re-resolve the named date; the payload carries no derived
/// state beyond what changed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    AttendanceChanged {
        date: NaiveDate,
        user_id: Uuid,
        is_attending: bool,
    },
    SelectionChanged {
        date: NaiveDate,
        restaurant_id: Uuid,
    },
}

/// Publish an event for real-time delivery. Best-effort: persisted state is
/// authoritative and clients re-fetch on reconnect, so failures are logged
/// and swallowed.
pub async fn publish(redis: &mut redis::aio::MultiplexedConnection, event: &Event) {
    let payload = serde_json::to_string(event).unwrap_or_default();
    if let Err(e) = redis.publish::<_, _, ()>(CHANNEL, &payload).await {
        tracing::debug!("Event publish failed: {}", e);
    }
}
