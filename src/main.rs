use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use redis::Client as RedisClient;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lunchsquad_api::{config::Config, db, routes, services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = RedisClient::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    services::metrics::start(pool.clone());

    let state = AppState {
        db: pool,
        redis: redis_conn,
        redis_client: redis_client.clone(),
        config: config.clone(),
    };

    // Build CORS: allow the configured app origin. In development
    // (localhost), all origins are allowed.
    let base_url = config.app_base_url.clone();
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        // Always allow localhost / 127.0.0.1 for local development
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        o == base_url
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-user-id"),
        ]))
        .allow_origin(cors_origin);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Profiles
        .route("/profiles", post(routes::profiles::register))
        .route("/profiles/me", get(routes::profiles::me))
        .route("/profiles/me/status", get(routes::profiles::onboarding_status))
        // Preferences
        .route(
            "/preferences",
            get(routes::preferences::get_preferences).put(routes::preferences::set_preferences),
        )
        // Restaurants & favorites
        .route("/restaurants", get(routes::restaurants::list_restaurants))
        .route("/restaurants/{id}", put(routes::restaurants::update_restaurant))
        .route(
            "/restaurants/{id}/favorite",
            post(routes::restaurants::add_favorite).delete(routes::restaurants::remove_favorite),
        )
        .route("/restaurants/{id}/rate", post(routes::restaurants::rate_restaurant))
        // Attendance
        .route(
            "/attendance/{date}",
            get(routes::attendance::get_attendance).put(routes::attendance::set_attendance),
        )
        // Recommendation
        .route("/recommendation/{date}", get(routes::recommendation::resolve))
        .route(
            "/recommendation/{date}/reshuffle",
            post(routes::recommendation::reshuffle),
        )
        .route(
            "/recommendation/{date}/random",
            post(routes::recommendation::choose_random),
        )
        // Groups
        .route("/groups", get(routes::groups::list_groups))
        .route("/groups/{id}/join", post(routes::groups::join_group))
        .route("/groups/{id}/leave", delete(routes::groups::leave_group))
        // WebSocket
        .route("/ws", get(routes::websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("LunchSquad API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
