use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{models::session::SessionUser, services::groups::GroupService, AppState};

pub async fn list_groups(
    State(state): State<AppState>,
    _user: SessionUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    GroupService::list(&state.db)
        .await
        .map(|groups| Json(serde_json::to_value(groups).unwrap()))
        .map_err(internal)
}

pub async fn join_group(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    if !GroupService::exists(&state.db, id).await.map_err(internal)? {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Group not found" })),
        ));
    }

    GroupService::join(&state.db, id, user.user_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(internal)
}

pub async fn leave_group(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    GroupService::leave(&state.db, id, user.user_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(internal)
}

fn internal(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}
