use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cuisine_types: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub image_url: Option<String>,
    /// Running average, overwritten in place on each rating.
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Restaurant row joined with the caller's favorite flag.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RestaurantWithFavorite {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cuisine_types: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub image_url: Option<String>,
    pub rating: f64,
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine_types: Option<Vec<String>>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RateRestaurantRequest {
    pub rating: f64,
}
