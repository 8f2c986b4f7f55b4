use std::sync::Arc;

use reelvault_config::ConfigLoader;
use reelvault_core::{
    PostgresMovieRepository, PostgresUserRepository, TmdbProvider, connect, run_migrations,
};
use reelvault_server::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let load = ConfigLoader::new().load()?;
    for warning in &load.warnings.items {
        warn!("{warning}");
    }
    let config = Arc::new(load.config);

    let pool = connect(&config.database_url).await?;
    run_migrations(&pool).await?;
    info!("database ready");

    let state = AppState::new(
        config.clone(),
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresMovieRepository::new(pool)),
        Arc::new(TmdbProvider::new(config.tmdb.clone())),
    );

    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to install shutdown handler: {err}");
    }
}
