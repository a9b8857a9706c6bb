use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, register_gauge, Counter, CounterVec, Gauge};
use sqlx::PgPool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref RESOLUTIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_resolutions_total",
        "Recommendation resolutions by outcome",
        &["outcome"]
    ).unwrap();

    pub static ref RESHUFFLES_COUNTER: Counter = register_counter!(
        "api_reshuffles_total",
        "Reshuffle requests"
    ).unwrap();

    pub static ref RANDOM_PICKS_COUNTER: Counter = register_counter!(
        "api_random_picks_total",
        "Random restaurant picks"
    ).unwrap();

    pub static ref RATINGS_COUNTER: Counter = register_counter!(
        "api_ratings_total",
        "Restaurant ratings submitted"
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref PROFILES_GAUGE: Gauge = register_gauge!(
        "lunch_profiles_total",
        "Registered profiles"
    ).unwrap();

    pub static ref RESTAURANTS_GAUGE: Gauge = register_gauge!(
        "lunch_restaurants_total",
        "Restaurants in the catalogue"
    ).unwrap();

    pub static ref ATTENDEES_TODAY_GAUGE: Gauge = register_gauge!(
        "lunch_attendees_today",
        "Users attending today"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        // Initial collection on startup
        if let Err(e) = collect(&pool).await {
            warn!("Metrics: initial collection failed: {}", e);
        }
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM profiles")
        .fetch_one(pool)
        .await?;
    PROFILES_GAUGE.set(profiles as f64);

    let restaurants: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM restaurants")
        .fetch_one(pool)
        .await?;
    RESTAURANTS_GAUGE.set(restaurants as f64);

    let attendees: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)::BIGINT FROM daily_attendance
         WHERE date = CURRENT_DATE AND is_attending = TRUE",
    )
    .fetch_one(pool)
    .await?;
    ATTENDEES_TODAY_GAUGE.set(attendees as f64);

    info!("Metrics: collected");
    Ok(())
}
