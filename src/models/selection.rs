use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::restaurant::Restaurant;

/// The day's locked-in answer. At most one row per date; its presence
/// short-circuits recomputation for every viewer of that date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailySelection {
    pub id: Uuid,
    pub date: NaiveDate,
    pub restaurant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How the day's selection came to be.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    /// Returned from an existing selection row without recomputation.
    Locked,
    /// Freshly computed by the scoring pass.
    Computed,
    /// Explicitly chosen at random, bypassing scoring.
    Random,
}

/// Outcome of resolving a date's recommendation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// Nobody has confirmed attendance for the date. Nothing is persisted.
    NoAttendees,
    /// Attendees exist but no favorited restaurant satisfies every stated
    /// preference. Nothing is persisted; the user can pick at random.
    NoMatch,
    Selected {
        restaurant: Restaurant,
        /// Only present for a fresh computation; locked and random
        /// selections carry no score.
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
        source: SelectionSource,
    },
}
