//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are `user::UserError`
//! rendered through `kernel::error::AppError`.

mod config;

use axum::Router;
use platform::rate_limit::InMemoryRateLimitStore;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::{PgUserRepository, user_router};

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,user=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    tracing::info!(
        app = %config.app_name,
        env = %config.app_env,
        "Configuration loaded"
    );

    // Database connection
    let pool = config
        .database
        .pool_options()
        .connect_with(config.database.connect_options()?)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let user_config = config.user_config();

    // Expired rate limit windows are dropped periodically
    let rate_limit_store = InMemoryRateLimitStore::new();
    {
        let store = rate_limit_store.clone();
        let rate_limit = user_config.rate_limit.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(rate_limit.window);
            loop {
                interval.tick().await;
                let removed = store.prune_expired(&rate_limit);
                if removed > 0 {
                    tracing::debug!(removed, remaining = store.len(), "Rate limit windows pruned");
                }
            }
        });
    }

    // Build router
    let app = Router::new()
        .nest(
            "/api/v1",
            user_router(PgUserRepository::new(pool), user_config, rate_limit_store)?,
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
