//! Gym survey HTTP server.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use survey_core::{GoogleSheetsSink, SubmissionHandler};
use survey_server::{build_router, AppState, ServerConfig};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SURVEY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration
    #[arg(short, long)]
    bind: Option<std::net::SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is the normal case in production
    let dotenv = dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Some(path) = dotenv {
        tracing::debug!("loaded environment from {}", path.display());
    }

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ServerConfig::default(),
    }
    .with_env_overrides()
    .context("invalid environment configuration")?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let store = config
        .store
        .open()
        .await
        .context("failed to open the survey store")?;

    let mut handler = SubmissionHandler::new(store);
    if let Some(sheets) = config.sheets {
        tracing::info!(spreadsheet = %sheets.spreadsheet_id, "mirroring surveys to Google Sheets");
        let timeout = sheets.timeout();
        let sink =
            GoogleSheetsSink::new(sheets).context("failed to build the spreadsheet client")?;
        handler = handler.with_mirror(Arc::new(sink), timeout);
    } else {
        tracing::info!("Google Sheets not configured, surveys are stored only in the database");
    }

    let app = build_router(AppState::new(handler));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
