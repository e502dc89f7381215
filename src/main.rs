//! LiveQuiz - Application Entry Point
//!
//! This is the main entry point for the LiveQuiz server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use redis::Client as RedisClient;
use tokio::{net::TcpListener, sync::watch};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use livequiz::{
    config::CONFIG,
    constants::API_BASE_PATH,
    db::{self, PgStore},
    handlers,
    services::{RedisPublisher, SessionEngine, SessionScheduler},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into());
    if CONFIG.server.log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting LiveQuiz server...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Initialize Redis connection
    tracing::info!("Connecting to Redis...");
    let redis_client = RedisClient::open(CONFIG.redis.url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;

    // Build the session engine and reload open quizzes
    let engine = Arc::new(SessionEngine::new(
        Arc::new(PgStore::new(db_pool)),
        Arc::new(RedisPublisher::new(redis_conn)),
        CONFIG.engine.clone(),
    ));
    engine.restore().await?;

    // Start the scheduler
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = SessionScheduler::new(engine.clone(), CONFIG.engine.tick_interval);
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

    // Create application state
    let state = AppState::new(engine, CONFIG.clone());

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Stopping scheduler...");
    let _ = shutdown_tx.send(true);
    scheduler_handle.await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
