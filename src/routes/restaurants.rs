use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        restaurant::{RateRestaurantRequest, UpdateRestaurantRequest},
        session::SessionUser,
    },
    services::{attendance::AttendanceService, metrics, restaurants::RestaurantService},
    AppState,
};

pub async fn list_restaurants(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    RestaurantService::list_for_user(&state.db, user.user_id)
        .await
        .map(|restaurants| Json(serde_json::to_value(restaurants).unwrap()))
        .map_err(internal)
}

pub async fn update_restaurant(
    State(state): State<AppState>,
    _user: SessionUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRestaurantRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Restaurant name cannot be empty" })),
            ));
        }
    }

    let updated = RestaurantService::update(&state.db, id, &body)
        .await
        .map_err(internal)?;

    match updated {
        Some(restaurant) => Ok(Json(serde_json::to_value(restaurant).unwrap())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Restaurant not found" })),
        )),
    }
}

pub async fn add_favorite(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    if RestaurantService::find(&state.db, id)
        .await
        .map_err(internal)?
        .is_none()
    {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Restaurant not found" })),
        ));
    }

    RestaurantService::add_favorite(&state.db, user.user_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(internal)
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    RestaurantService::remove_favorite(&state.db, user.user_id, id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(internal)
}

pub async fn rate_restaurant(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RateRestaurantRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !(1.0..=5.0).contains(&body.rating) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Rating must be between 1 and 5" })),
        ));
    }

    let updated = RestaurantService::rate(&state.db, id, body.rating)
        .await
        .map_err(internal)?;

    let restaurant = match updated {
        Some(r) => r,
        None => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Restaurant not found" })),
            ))
        }
    };

    // Remember that this user rated today; best-effort bookkeeping on the
    // attendance row.
    let today = Utc::now().date_naive();
    if let Err(e) = AttendanceService::mark_rated(&state.db, user.user_id, today).await {
        tracing::debug!("Failed to mark attendance as rated: {}", e);
    }

    metrics::RATINGS_COUNTER.inc();

    Ok(Json(serde_json::to_value(restaurant).unwrap()))
}

fn internal(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}
