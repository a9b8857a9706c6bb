use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::{
    middleware::rate_limit::check_rate_limit,
    models::{profile::CreateProfileRequest, session::SessionUser},
    services::profiles::ProfileService,
    AppState,
};

/// Extracts the real client IP from nginx-forwarded headers.
/// Priority: X-Real-IP → first X-Forwarded-For.
fn real_ip(headers: &HeaderMap) -> String {
    if let Some(ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return ip.to_string();
    }
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = xff.split(',').next() {
            return first.trim().to_string();
        }
    }
    "unknown".to_string()
}

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    // Rate limit: 10 registrations/hour per IP
    {
        let ip = real_ip(&headers);
        let key = format!("rate:register:ip:{ip}");
        let mut redis = state.redis.clone();
        check_rate_limit(&mut redis, &key, 10, 3600).await?;
    }

    let name = body.name.trim();
    if name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please enter your name" })),
        ));
    }

    ProfileService::create(&state.db, name)
        .await
        .map(|profile| (StatusCode::CREATED, Json(serde_json::to_value(profile).unwrap())))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn me(user: SessionUser) -> Json<Value> {
    Json(json!({ "id": user.user_id, "name": user.name }))
}

/// Which onboarding steps the caller has completed. The client redirects
/// to preferences or favorites selection until both exist.
pub async fn onboarding_status(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    ProfileService::onboarding_status(&state.db, user.user_id)
        .await
        .map(|status| Json(serde_json::to_value(status).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
