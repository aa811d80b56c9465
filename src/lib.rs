pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, UserCommands};
pub use config::Config;
use state::SharedState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Init = command {
        if Config::create_default_if_missing()? {
            println!("✓ Created config.toml");
        } else {
            println!("config.toml already exists");
        }
        return Ok(());
    }

    let state = SharedState::new(config).await?;

    match command {
        Commands::Serve => serve(state, prometheus_handle).await,
        Commands::Titles => cli::cmd_list_titles(&state).await,
        Commands::Show { id } => cli::cmd_show_title(&state, id).await,
        Commands::Today => cli::cmd_today(&state).await,
        Commands::ClearAlert { id, number } => cli::cmd_clear_alert(&state, id, number).await,
        Commands::RebuildDisplay { id } => cli::cmd_rebuild_display(&state, id).await,
        Commands::ClearDisplay => cli::cmd_clear_display(&state).await,
        Commands::User { command } => match command {
            UserCommands::Add { username, admin } => {
                cli::cmd_user_add(&state, &username, admin).await
            }
            UserCommands::List => cli::cmd_user_list(&state).await,
        },
        Commands::Init => Ok(()),
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(
    state: SharedState,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Kuroneko v{} starting...", env!("CARGO_PKG_VERSION"));

    if !state.config.server.enabled {
        info!("HTTP server disabled in config; nothing to serve");
        return Ok(());
    }

    let port = state.config.server.port;
    let app = api::router(api::create_app_state(Arc::new(state), prometheus_handle));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web API running at http://{addr}");

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!("Error listening for shutdown: {}", e),
        }
    });

    server.await.context("Web server error")?;
    info!("Server stopped");

    Ok(())
}
