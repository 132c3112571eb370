use anyhow::Context;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitness_studio::{
    app,
    config::{Config, LogFormat},
    database::Database,
    services::{seed, StudioClock},
    store::{PgStudioStore, StudioStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!("Starting Fitness Studio Booking API");

    // Connect to the database
    let db = Database::new(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Database connected");

    db.run_migrations()
        .await
        .context("failed to run migrations")?;

    let store: Arc<dyn StudioStore> =
        Arc::new(PgStudioStore::new(db, config.database.statement_timeout_ms));
    let clock = StudioClock::new(config.studio.timezone);
    info!("Studio timezone is {}", clock.zone());

    if config.studio.seed_on_startup {
        let inserted = seed::seed_if_empty(store.as_ref(), &clock, Utc::now())
            .await
            .context("failed to seed class catalog")?;
        if inserted > 0 {
            info!("Seeded {} sample classes", inserted);
        }
    }

    let app = app(AppState::new(store, clock));

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("HOST/PORT do not form a socket address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
