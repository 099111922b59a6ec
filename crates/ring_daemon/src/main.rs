mod routes;
mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use ring_world::load_config_or_default;

#[derive(Parser)]
#[command(name = "ring_daemon", about = "HTTP API for the BFS ring visualizer")]
struct Cli {
    #[arg(long, default_value_t = 3001)]
    port: u16,
    /// Visualizer config JSON. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Allowed CORS origin for the browser front end.
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref())?;
    let cors_origin: HeaderValue = cli
        .cors_origin
        .parse()
        .with_context(|| format!("invalid --cors-origin '{}'", cli.cors_origin))?;

    let app_state = state::AppState::new(&config);
    let app = routes::make_router_with_cors(app_state, cors_origin);

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(
        %addr,
        nodes = config.ring_labels.len(),
        step_delay_ms = config.step_delay_ms,
        "ring_daemon listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("serving HTTP")?;
    Ok(())
}
