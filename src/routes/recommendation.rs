use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::{
    models::{
        selection::{Resolution, SelectionSource},
        session::SessionUser,
    },
    services::{events, metrics, recommendation::RecommendationService},
    AppState,
};

pub async fn resolve(
    State(mut state): State<AppState>,
    _user: SessionUser,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let resolution = RecommendationService::resolve(&state.db, date)
        .await
        .map_err(internal)?;

    record_outcome(&resolution);

    // A freshly computed winner is news to every other viewer of the date.
    if let Resolution::Selected {
        restaurant,
        source: SelectionSource::Computed,
        ..
    } = &resolution
    {
        events::publish(
            &mut state.redis,
            &events::Event::SelectionChanged {
                date,
                restaurant_id: restaurant.id,
            },
        )
        .await;
    }

    Ok(Json(serde_json::to_value(resolution).unwrap()))
}

pub async fn reshuffle(
    State(mut state): State<AppState>,
    _user: SessionUser,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let resolution = RecommendationService::reshuffle(&state.db, date)
        .await
        .map_err(internal)?;

    metrics::RESHUFFLES_COUNTER.inc();
    record_outcome(&resolution);

    if let Resolution::Selected { restaurant, .. } = &resolution {
        events::publish(
            &mut state.redis,
            &events::Event::SelectionChanged {
                date,
                restaurant_id: restaurant.id,
            },
        )
        .await;
    }

    Ok(Json(serde_json::to_value(resolution).unwrap()))
}

pub async fn choose_random(
    State(mut state): State<AppState>,
    _user: SessionUser,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let pick = RecommendationService::choose_random(&state.db, date)
        .await
        .map_err(internal)?;

    let restaurant = match pick {
        Some(r) => r,
        None => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "No favorites among today's attendees to pick from" })),
            ))
        }
    };

    metrics::RANDOM_PICKS_COUNTER.inc();

    events::publish(
        &mut state.redis,
        &events::Event::SelectionChanged {
            date,
            restaurant_id: restaurant.id,
        },
    )
    .await;

    let resolution = Resolution::Selected {
        restaurant,
        score: None,
        source: SelectionSource::Random,
    };
    Ok(Json(serde_json::to_value(resolution).unwrap()))
}

fn record_outcome(resolution: &Resolution) {
    let outcome = match resolution {
        Resolution::NoAttendees => "no_attendees",
        Resolution::NoMatch => "no_match",
        Resolution::Selected { .. } => "selected",
    };
    metrics::RESOLUTIONS_COUNTER.with_label_values(&[outcome]).inc();
}

fn internal(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}
