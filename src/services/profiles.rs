use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::{OnboardingStatus, Profile};

pub struct ProfileService;

impl ProfileService {
    pub async fn create(pool: &PgPool, name: &str) -> anyhow::Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(profile)
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(profile)
    }

    /// Whether the user has completed each onboarding step.
    pub async fn onboarding_status(pool: &PgPool, id: Uuid) -> anyhow::Result<OnboardingStatus> {
        let has_preferences: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_preferences WHERE user_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        let has_favorites: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_favorites WHERE user_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(OnboardingStatus {
            has_preferences,
            has_favorites,
        })
    }
}
