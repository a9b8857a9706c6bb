use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::preference::{Preference, PreferenceKind, PreferenceSets, SetPreferencesRequest};

pub struct PreferenceService;

impl PreferenceService {
    /// The caller's preferences partitioned by kind.
    pub async fn for_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<PreferenceSets> {
        let rows = sqlx::query_as::<_, Preference>(
            "SELECT * FROM user_preferences WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(partition(rows).remove(&user_id).unwrap_or_default())
    }

    /// Preferences of every listed user, partitioned per user. Users with no
    /// rows are simply absent from the map.
    pub async fn for_users(
        pool: &PgPool,
        user_ids: &[Uuid],
    ) -> anyhow::Result<HashMap<Uuid, PreferenceSets>> {
        let rows = sqlx::query_as::<_, Preference>(
            "SELECT * FROM user_preferences WHERE user_id = ANY($1) ORDER BY created_at",
        )
        .bind(user_ids)
        .fetch_all(pool)
        .await?;

        Ok(partition(rows))
    }

    /// Replace the caller's preference rows: delete all current rows, then
    /// insert the provided values.
    pub async fn replace(
        pool: &PgPool,
        user_id: Uuid,
        req: &SetPreferencesRequest,
    ) -> anyhow::Result<PreferenceSets> {
        sqlx::query("DELETE FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        for value in &req.cuisine {
            Self::insert_row(pool, user_id, PreferenceKind::Cuisine, value).await?;
        }
        for value in &req.dietary {
            Self::insert_row(pool, user_id, PreferenceKind::Dietary, value).await?;
        }

        Self::for_user(pool, user_id).await
    }

    async fn insert_row(
        pool: &PgPool,
        user_id: Uuid,
        kind: PreferenceKind,
        value: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO user_preferences (user_id, preference_type, preference_value)
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(kind.to_string())
        .bind(value)
        .execute(pool)
        .await?;
        Ok(())
    }
}

fn partition(rows: Vec<Preference>) -> HashMap<Uuid, PreferenceSets> {
    let mut map: HashMap<Uuid, PreferenceSets> = HashMap::new();
    for row in rows {
        let sets = map.entry(row.user_id).or_default();
        match row.preference_type.parse::<PreferenceKind>() {
            Ok(PreferenceKind::Cuisine) => sets.cuisine.push(row.preference_value),
            Ok(PreferenceKind::Dietary) => sets.dietary.push(row.preference_value),
            // Unknown kinds can only come from out-of-band writes; skip them.
            Err(_) => continue,
        }
    }
    map
}
