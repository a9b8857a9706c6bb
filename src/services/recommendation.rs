use std::collections::HashMap;

use chrono::NaiveDate;
use rand::Rng;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{
    preference::PreferenceSets,
    restaurant::Restaurant,
    selection::{DailySelection, Resolution, SelectionSource},
};
use crate::services::{
    attendance::AttendanceService, preferences::PreferenceService,
    restaurants::RestaurantService,
};

/// One favorite row joined with its restaurant. Fetch order is pinned by
/// the query (`ORDER BY uf.created_at, uf.id`) so tie-breaking downstream
/// is deterministic.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteRow {
    pub user_id: Uuid,
    #[sqlx(flatten)]
    pub restaurant: Restaurant,
}

/// A candidate restaurant with the number of attending users who favorited it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub restaurant: Restaurant,
    pub favorite_count: usize,
}

pub struct RecommendationService;

impl RecommendationService {
    /// Resolve the day's restaurant.
    ///
    /// An existing selection row is returned as-is: once a choice is locked
    /// in, every viewer of the date converges on it without re-scoring.
    /// Otherwise the winner is computed from the attending users' favorites
    /// and preferences, persisted, and returned. `NoAttendees` and `NoMatch`
    /// persist nothing, so a later attendance change can flip the outcome.
    pub async fn resolve(pool: &PgPool, date: NaiveDate) -> anyhow::Result<Resolution> {
        if let Some(selection) = Self::current_selection(pool, date).await? {
            // The FK guarantees the referenced restaurant still exists.
            if let Some(restaurant) =
                RestaurantService::find(pool, selection.restaurant_id).await?
            {
                return Ok(Resolution::Selected {
                    restaurant,
                    score: None,
                    source: SelectionSource::Locked,
                });
            }
        }

        let attendee_ids = AttendanceService::attending_user_ids(pool, date).await?;
        if attendee_ids.is_empty() {
            return Ok(Resolution::NoAttendees);
        }

        let preferences = PreferenceService::for_users(pool, &attendee_ids).await?;
        let favorites = Self::favorites_of(pool, &attendee_ids).await?;

        let candidates = collapse_candidates(favorites);
        let qualifying: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| matches_preferences(&c.restaurant, &preferences))
            .collect();

        match pick_winner(&qualifying, attendee_ids.len()) {
            None => Ok(Resolution::NoMatch),
            Some((winner, score)) => {
                Self::lock(pool, date, winner.restaurant.id).await?;
                Ok(Resolution::Selected {
                    restaurant: winner.restaurant.clone(),
                    score: Some(score),
                    source: SelectionSource::Computed,
                })
            }
        }
    }

    /// Drop the day's selection and recompute. Reaching `NoMatch` again is a
    /// valid outcome, not an error.
    pub async fn reshuffle(pool: &PgPool, date: NaiveDate) -> anyhow::Result<Resolution> {
        Self::clear(pool, date).await?;
        Self::resolve(pool, date).await
    }

    /// Escape hatch for the `NoMatch` state: pick uniformly at random from
    /// the attending users' favorites, ignoring preference matching, and
    /// force it in as the day's selection (overwriting any existing one).
    /// Returns `None` when no attendee has any favorite.
    pub async fn choose_random(
        pool: &PgPool,
        date: NaiveDate,
    ) -> anyhow::Result<Option<Restaurant>> {
        let attendee_ids = AttendanceService::attending_user_ids(pool, date).await?;
        if attendee_ids.is_empty() {
            return Ok(None);
        }

        let favorites = Self::favorites_of(pool, &attendee_ids).await?;
        let mut candidates = collapse_candidates(favorites);
        if candidates.is_empty() {
            return Ok(None);
        }

        let idx = rand::thread_rng().gen_range(0..candidates.len());
        let pick = candidates.swap_remove(idx).restaurant;

        Self::lock(pool, date, pick.id).await?;
        Ok(Some(pick))
    }

    pub async fn current_selection(
        pool: &PgPool,
        date: NaiveDate,
    ) -> anyhow::Result<Option<DailySelection>> {
        let selection = sqlx::query_as::<_, DailySelection>(
            "SELECT * FROM daily_restaurant_selection WHERE date = $1",
        )
        .bind(date)
        .fetch_optional(pool)
        .await?;
        Ok(selection)
    }

    async fn favorites_of(pool: &PgPool, user_ids: &[Uuid]) -> anyhow::Result<Vec<FavoriteRow>> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            "SELECT uf.user_id, r.id, r.name, r.description, r.cuisine_types,
                 r.dietary_restrictions, r.image_url, r.rating, r.created_at
             FROM user_favorites uf
             JOIN restaurants r ON r.id = uf.restaurant_id
             WHERE uf.user_id = ANY($1)
             ORDER BY uf.created_at, uf.id",
        )
        .bind(user_ids)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Insert or overwrite the day's selection. Concurrent resolutions for
    /// the same date race here; last writer wins.
    async fn lock(pool: &PgPool, date: NaiveDate, restaurant_id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO daily_restaurant_selection (date, restaurant_id)
             VALUES ($1, $2)
             ON CONFLICT (date) DO UPDATE SET
                 restaurant_id = EXCLUDED.restaurant_id,
                 updated_at = NOW()",
        )
        .bind(date)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn clear(pool: &PgPool, date: NaiveDate) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM daily_restaurant_selection WHERE date = $1")
            .bind(date)
            .execute(pool)
            .await?;
        Ok(())
    }
}

/// Collapse favorite rows into one candidate per restaurant, counting one
/// per favoriting attendee. First-seen order is preserved; it is the
/// tie-breaking order for equal scores.
fn collapse_candidates(favorites: Vec<FavoriteRow>) -> Vec<Candidate> {
    let mut by_id: HashMap<Uuid, usize> = HashMap::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    for row in favorites {
        match by_id.get(&row.restaurant.id) {
            Some(&pos) => candidates[pos].favorite_count += 1,
            None => {
                by_id.insert(row.restaurant.id, candidates.len());
                candidates.push(Candidate {
                    restaurant: row.restaurant,
                    favorite_count: 1,
                });
            }
        }
    }
    candidates
}

/// A restaurant qualifies only if, for every attendee with a non-empty
/// preference set of a kind, its corresponding attribute set intersects
/// that user's set. A user with no stated preference of a kind imposes no
/// constraint of that kind.
fn matches_preferences(
    restaurant: &Restaurant,
    preferences: &HashMap<Uuid, PreferenceSets>,
) -> bool {
    preferences.values().all(|sets| {
        let cuisine_ok =
            sets.cuisine.is_empty() || intersects(&restaurant.cuisine_types, &sets.cuisine);
        let dietary_ok =
            sets.dietary.is_empty() || intersects(&restaurant.dietary_restrictions, &sets.dietary);
        cuisine_ok && dietary_ok
    })
}

fn intersects(a: &[String], b: &[String]) -> bool {
    a.iter().any(|v| b.contains(v))
}

/// Candidate score: share of attendees who favorited it, weighted 100,
/// plus the rating weighted 10. Monotone in both inputs.
pub fn score(favorite_count: usize, attendee_count: usize, rating: f64) -> f64 {
    (favorite_count as f64 / attendee_count as f64) * 100.0 + rating * 10.0
}

/// Highest-scoring candidate. Ties resolve to the earliest candidate in
/// encounter order: the comparison is strict, so a later equal score never
/// displaces an earlier one.
fn pick_winner(candidates: &[Candidate], attendee_count: usize) -> Option<(&Candidate, f64)> {
    let mut best: Option<(&Candidate, f64)> = None;
    for candidate in candidates {
        let s = score(candidate.favorite_count, attendee_count, candidate.restaurant.rating);
        match best {
            Some((_, best_score)) if s <= best_score => {}
            _ => best = Some((candidate, s)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn restaurant(name: &str, cuisines: &[&str], dietary: &[&str], rating: f64) -> Restaurant {
        Restaurant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            cuisine_types: cuisines.iter().map(|s| s.to_string()).collect(),
            dietary_restrictions: dietary.iter().map(|s| s.to_string()).collect(),
            image_url: None,
            rating,
            created_at: Utc::now(),
        }
    }

    fn favorite(user_id: Uuid, restaurant: &Restaurant) -> FavoriteRow {
        FavoriteRow {
            user_id,
            restaurant: restaurant.clone(),
        }
    }

    fn prefs(entries: &[(Uuid, &[&str], &[&str])]) -> HashMap<Uuid, PreferenceSets> {
        entries
            .iter()
            .map(|(id, cuisine, dietary)| {
                (
                    *id,
                    PreferenceSets {
                        cuisine: cuisine.iter().map(|s| s.to_string()).collect(),
                        dietary: dietary.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_two_attendees_shared_favorite_wins() {
        // A favorites {R1, R2}, B favorites {R2, R3}; no preferences set.
        // Scores: R1 = 50 + 40 = 90, R2 = 100 + 45 = 145, R3 = 50 + 30 = 80.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let r1 = restaurant("R1", &[], &[], 4.0);
        let r2 = restaurant("R2", &[], &[], 4.5);
        let r3 = restaurant("R3", &[], &[], 3.0);

        let candidates = collapse_candidates(vec![
            favorite(a, &r1),
            favorite(a, &r2),
            favorite(b, &r2),
            favorite(b, &r3),
        ]);

        let (winner, winner_score) = pick_winner(&candidates, 2).unwrap();
        assert_eq!(winner.restaurant.id, r2.id);
        assert_eq!(winner_score, 145.0);

        let scores: Vec<f64> = candidates
            .iter()
            .map(|c| score(c.favorite_count, 2, c.restaurant.rating))
            .collect();
        assert_eq!(scores, vec![90.0, 145.0, 80.0]);
    }

    #[test]
    fn test_collapse_counts_one_per_favoriting_attendee() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let r1 = restaurant("R1", &[], &[], 4.0);
        let r2 = restaurant("R2", &[], &[], 4.0);

        let candidates = collapse_candidates(vec![
            favorite(a, &r2),
            favorite(b, &r1),
            favorite(b, &r2),
            favorite(c, &r2),
        ]);

        // First-seen order preserved, counts per favoriting user.
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].restaurant.id, r2.id);
        assert_eq!(candidates[0].favorite_count, 3);
        assert_eq!(candidates[1].restaurant.id, r1.id);
        assert_eq!(candidates[1].favorite_count, 1);
    }

    #[test]
    fn test_score_monotone_in_count_and_rating() {
        assert!(score(2, 3, 4.0) > score(1, 3, 4.0));
        assert!(score(1, 3, 4.5) > score(1, 3, 4.0));
    }

    #[test]
    fn test_equal_counts_higher_rating_wins() {
        let a = Uuid::new_v4();
        let r1 = restaurant("R1", &[], &[], 3.5);
        let r2 = restaurant("R2", &[], &[], 4.5);

        let candidates = collapse_candidates(vec![favorite(a, &r1), favorite(a, &r2)]);
        let (winner, _) = pick_winner(&candidates, 1).unwrap();
        assert_eq!(winner.restaurant.id, r2.id);
    }

    #[test]
    fn test_tie_breaks_to_first_seen() {
        let a = Uuid::new_v4();
        let r1 = restaurant("R1", &[], &[], 4.0);
        let r2 = restaurant("R2", &[], &[], 4.0);

        let candidates = collapse_candidates(vec![favorite(a, &r1), favorite(a, &r2)]);
        let (winner, _) = pick_winner(&candidates, 1).unwrap();
        assert_eq!(winner.restaurant.id, r1.id);
    }

    #[test]
    fn test_no_candidates_yields_no_winner() {
        assert!(pick_winner(&[], 2).is_none());
    }

    #[test]
    fn test_dietary_preference_with_no_match_filters_everything() {
        // A is vegan; none of the favorites carries a vegan tag.
        let a = Uuid::new_v4();
        let r1 = restaurant("Steakhouse", &["american"], &[], 4.8);
        let r2 = restaurant("Taqueria", &["mexican"], &["gluten_free"], 4.2);
        let preferences = prefs(&[(a, &[], &["vegan"])]);

        let qualifying: Vec<Candidate> =
            collapse_candidates(vec![favorite(a, &r1), favorite(a, &r2)])
                .into_iter()
                .filter(|c| matches_preferences(&c.restaurant, &preferences))
                .collect();
        assert!(qualifying.is_empty());
    }

    #[test]
    fn test_user_without_preferences_imposes_no_constraint() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let r = restaurant("Trattoria", &["italian"], &[], 4.0);

        // A wants italian, B stated nothing; B must not veto.
        let preferences = prefs(&[(a, &["italian"], &[]), (b, &[], &[])]);
        assert!(matches_preferences(&r, &preferences));
    }

    #[test]
    fn test_every_attendee_with_preferences_must_match() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let fusion = restaurant("Fusion", &["italian", "japanese"], &[], 4.0);
        let trattoria = restaurant("Trattoria", &["italian"], &[], 4.0);

        let preferences = prefs(&[(a, &["italian"], &[]), (b, &["japanese"], &[])]);
        assert!(matches_preferences(&fusion, &preferences));
        assert!(!matches_preferences(&trattoria, &preferences));
    }

    #[test]
    fn test_both_kinds_checked_independently() {
        let a = Uuid::new_v4();
        let r = restaurant("Deli", &["american"], &["kosher"], 4.0);

        // Cuisine matches but dietary does not.
        let preferences = prefs(&[(a, &["american"], &["halal"])]);
        assert!(!matches_preferences(&r, &preferences));

        let preferences = prefs(&[(a, &["american"], &["kosher"])]);
        assert!(matches_preferences(&r, &preferences));
    }
}
