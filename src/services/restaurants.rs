use sqlx::PgPool;
use uuid::Uuid;

use crate::models::restaurant::{Restaurant, RestaurantWithFavorite, UpdateRestaurantRequest};

pub struct RestaurantService;

impl RestaurantService {
    /// All restaurants ordered by name, each flagged with whether the
    /// caller has favorited it.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<RestaurantWithFavorite>> {
        let restaurants = sqlx::query_as::<_, RestaurantWithFavorite>(
            "SELECT r.id, r.name, r.description, r.cuisine_types, r.dietary_restrictions,
                 r.image_url, r.rating,
                 EXISTS(
                     SELECT 1 FROM user_favorites uf
                     WHERE uf.restaurant_id = r.id AND uf.user_id = $1
                 ) AS is_favorite
             FROM restaurants r
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(restaurants)
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(restaurant)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateRestaurantRequest,
    ) -> anyhow::Result<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            "UPDATE restaurants
             SET name = COALESCE($1, name),
                 description = COALESCE($2, description),
                 cuisine_types = COALESCE($3, cuisine_types),
                 dietary_restrictions = COALESCE($4, dietary_restrictions),
                 image_url = COALESCE($5, image_url)
             WHERE id = $6
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.cuisine_types)
        .bind(&req.dietary_restrictions)
        .bind(&req.image_url)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(restaurant)
    }

    pub async fn add_favorite(
        pool: &PgPool,
        user_id: Uuid,
        restaurant_id: Uuid,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO user_favorites (user_id, restaurant_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, restaurant_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn remove_favorite(
        pool: &PgPool,
        user_id: Uuid,
        restaurant_id: Uuid,
    ) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND restaurant_id = $2")
            .bind(user_id)
            .bind(restaurant_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Fold a new rating into the stored one. The stored value is a blend,
    /// not a true mean: each new rating carries weight 0.5 regardless of how
    /// many came before it. This matches the app's observed contract.
    pub async fn rate(
        pool: &PgPool,
        id: Uuid,
        rating: f64,
    ) -> anyhow::Result<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            "UPDATE restaurants SET rating = (rating + $1) / 2 WHERE id = $2 RETURNING *",
        )
        .bind(rating)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(restaurant)
    }
}

/// The rating update applied by [`RestaurantService::rate`], kept in one
/// place so the contract is testable without a database.
pub fn blend_rating(old: f64, new: f64) -> f64 {
    (old + new) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_rating_halves_toward_new() {
        assert_eq!(blend_rating(4.0, 2.0), 3.0);
        assert_eq!(blend_rating(0.0, 5.0), 2.5);
    }

    #[test]
    fn test_blend_rating_is_not_a_running_mean() {
        // Three 5-star ratings on a 1-star restaurant: a true mean would
        // give 4.0, the blend converges much faster.
        let mut rating = 1.0;
        for _ in 0..3 {
            rating = blend_rating(rating, 5.0);
        }
        assert_eq!(rating, 4.5);
    }
}
