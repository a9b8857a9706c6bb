use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::{
    models::{
        attendance::{AttendanceOverview, SetAttendanceRequest},
        session::SessionUser,
    },
    services::{attendance::AttendanceService, events},
    AppState,
};

pub async fn get_attendance(
    State(state): State<AppState>,
    user: SessionUser,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let is_attending = AttendanceService::is_attending(&state.db, user.user_id, date)
        .await
        .map_err(internal)?;
    let attending = AttendanceService::attending_users(&state.db, date)
        .await
        .map_err(internal)?;

    let overview = AttendanceOverview {
        date,
        is_attending,
        attending,
    };
    Ok(Json(serde_json::to_value(overview).unwrap()))
}

/// Upsert the caller's attendance. Does not recompute the day's selection;
/// clients re-resolve after the change event lands.
pub async fn set_attendance(
    State(mut state): State<AppState>,
    user: SessionUser,
    Path(date): Path<NaiveDate>,
    Json(body): Json<SetAttendanceRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let row = AttendanceService::set(&state.db, user.user_id, date, body.is_attending)
        .await
        .map_err(internal)?;

    events::publish(
        &mut state.redis,
        &events::Event::AttendanceChanged {
            date,
            user_id: user.user_id,
            is_attending: row.is_attending,
        },
    )
    .await;

    Ok(Json(serde_json::to_value(row).unwrap()))
}

fn internal(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}
