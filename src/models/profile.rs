use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
}

/// Drives the client's post-registration redirect: preferences first,
/// then favorites, then the dashboard.
#[derive(Debug, Serialize)]
pub struct OnboardingStatus {
    pub has_preferences: bool,
    pub has_favorites: bool,
}
