use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    Cuisine,
    Dietary,
}

impl std::fmt::Display for PreferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PreferenceKind::Cuisine => "cuisine",
            PreferenceKind::Dietary => "dietary",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown preference kind: {0}")]
pub struct ParsePreferenceKindError(String);

impl std::str::FromStr for PreferenceKind {
    type Err = ParsePreferenceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cuisine" => Ok(PreferenceKind::Cuisine),
            "dietary" => Ok(PreferenceKind::Dietary),
            _ => Err(ParsePreferenceKindError(s.to_string())),
        }
    }
}

/// DB row struct. preference_type is stored as TEXT with a CHECK constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Preference {
    pub id: Uuid,
    pub user_id: Uuid,
    pub preference_type: String,
    pub preference_value: String,
    pub created_at: DateTime<Utc>,
}

/// A user's preferences partitioned by kind. Either list may be empty;
/// an empty list imposes no constraint of that kind on the recommendation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreferenceSets {
    pub cuisine: Vec<String>,
    pub dietary: Vec<String>,
}

/// Replaces the caller's preference rows wholesale.
#[derive(Debug, Deserialize)]
pub struct SetPreferencesRequest {
    pub cuisine: Vec<String>,
    #[serde(default)]
    pub dietary: Vec<String>,
}
