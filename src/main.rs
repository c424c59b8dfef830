use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tasklane::cli::{Cli, Command};
use tasklane::logging::init_tracing;
use tasklane::modules::todos::repository::MIGRATOR;
use tasklane::router::init_router;
use tasklane::server::{SHUTDOWN_GRACE_PERIOD, serve, shutdown_signal};
use tasklane::state::{init_app_state, init_db_pool};
use tasklane_config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    let _log_guards = init_tracing(&config.main)?;

    match cli.command() {
        Command::Serve => run_server(config).await,
        Command::Migrate => run_migrations(config).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let state = init_app_state(&config).await?;
    let app = init_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.main.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(port = config.main.port, "Server running on http://localhost:{}", config.main.port);
    info!("Swagger UI available at http://localhost:{}/swagger-ui", config.main.port);
    info!("Scalar UI available at http://localhost:{}/scalar", config.main.port);

    serve(listener, app, shutdown_signal(), SHUTDOWN_GRACE_PERIOD)
        .await
        .context("Server error")
}

async fn run_migrations(config: AppConfig) -> anyhow::Result<()> {
    let pool = init_db_pool(&config).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    info!("Migrations applied");
    Ok(())
}
