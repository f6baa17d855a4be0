use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use barberbook::config::AppConfig;
use barberbook::db;
use barberbook::handlers;
use barberbook::services::clock::VenueClock;
use barberbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    tracing::info!(offset = config.utc_offset_hours, "venue clock configured");

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        clock: Box::new(VenueClock::new(config.utc_offset_hours)),
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/services", get(handlers::services::list_services))
        .route("/slots", get(handlers::availability::get_slots))
        .route("/bookings", post(handlers::bookings::create_booking))
        .route("/bookings", get(handlers::bookings::list_bookings))
        .route(
            "/bookings/completed",
            delete(handlers::bookings::delete_completed),
        )
        .route("/bookings/:id", delete(handlers::bookings::delete_booking))
        .route(
            "/bookings/:id/status",
            put(handlers::bookings::complete_booking),
        )
        .route("/blocked-days", post(handlers::blocked_days::block_day))
        .route(
            "/blocked-days",
            get(handlers::blocked_days::list_blocked_days),
        )
        .route(
            "/blocked-days/:id",
            delete(handlers::blocked_days::unblock_day),
        )
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
