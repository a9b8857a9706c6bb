use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    models::{preference::SetPreferencesRequest, session::SessionUser},
    services::preferences::PreferenceService,
    AppState,
};

pub async fn get_preferences(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    PreferenceService::for_user(&state.db, user.user_id)
        .await
        .map(|sets| Json(serde_json::to_value(sets).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

pub async fn set_preferences(
    State(state): State<AppState>,
    user: SessionUser,
    Json(body): Json<SetPreferencesRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.cuisine.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please select at least one cuisine type" })),
        ));
    }

    PreferenceService::replace(&state.db, user.user_id, &body)
        .await
        .map(|sets| Json(serde_json::to_value(sets).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
