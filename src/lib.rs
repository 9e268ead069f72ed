pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;
pub mod state;
pub mod web;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use cli::{Cli, Commands};
pub use config::Config;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);

    match cli.command() {
        Commands::Init => {
            let path = cli.config.unwrap_or_else(Config::default_config_path);
            if Config::create_default_if_missing(&path)? {
                println!("✓ Config file created at {}. Edit it and run again.", path.display());
            } else {
                println!("Config file already exists at {}", path.display());
            }
            Ok(())
        }
        Commands::Serve => serve(config).await,
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let mut log_level = config.general.log_level.clone();
    if config.server.debug {
        log_level.push_str(",storefront=debug");
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    info!("Storefront v{} starting...", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let port = config.observability.metrics_port;
        PrometheusBuilder::new()
            .with_http_listener(([127, 0, 0, 1], port))
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Prometheus metrics exposed on 127.0.0.1:{}", port);
    }

    if config.server.debug {
        info!("Debug mode enabled");
    }

    let addr = config.server.bind_addr()?;

    let shared = Arc::new(SharedState::new(config).await?);
    shared.store.ping().await.context("Database is not reachable")?;

    let app_state = web::create_app_state(shared)?;
    let app = web::router(app_state).await?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
