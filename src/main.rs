mod config;
mod error;
mod lists;
mod routes;
mod state;
mod store;
mod tasks;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::routes::JwtKeys;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let keys = JwtKeys::new(&config.jwt_secret);

    let state = match &config.database_url {
        Some(url) => {
            let db = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await
                .context("Error connecting DB")?;

            sqlx::migrate!("./migrations")
                .run(&db)
                .await
                .context("Error running migrations")?;

            AppState::new(PgStore::new(db), keys)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records live in memory only");
            AppState::new(MemoryStore::default(), keys)
        }
    };

    let app = routes::routes(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;

    tracing::info!("server is chilling at http://{}", config.addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
