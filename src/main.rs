//! Layout control server.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                   LAYOUT CONTROL                      │
//!                     │                                                       │
//!   Control Request   │  ┌─────────┐    ┌──────────────┐    ┌──────────────┐  │
//!   ──────────────────┼─▶│  http   │───▶│   control    │───▶│   playlist   │  │
//!                     │  │ server  │    │   gateway    │    │    loader    │  │
//!                     │  └─────────┘    └──────┬───────┘    └──────────────┘  │
//!                     │                        │                              │
//!                     │                        ▼                              │
//!                     │                 ┌──────────────┐    ┌──────────────┐  │
//!                     │                 │    layout    │◀───│  scheduler   │  │
//!                     │                 │state machine │    │   (ticks)    │  │
//!                     │                 └──────────────┘    └──────────────┘  │
//!                     │                                                       │
//!                     │  ┌─────────────────────────────────────────────────┐  │
//!                     │  │  config  │  observability + error log  │ lifecycle│  │
//!                     │  └─────────────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use layout_control::config::{load_config, ServerConfig};
use layout_control::layout::{ClientRect, LayoutScheduler, PlaybackEngine};
use layout_control::lifecycle::{shutdown_on_signal, Shutdown};
use layout_control::observability::{logging, metrics, RecentErrors};
use layout_control::playlist::{JsonPlaylistLoader, PlaylistLoader};
use layout_control::{ControlGateway, HttpServer};

#[derive(Parser)]
#[command(name = "layout-control")]
#[command(about = "HTTP control surface for the display layout engine", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    let errors = Arc::new(RecentErrors::new(config.error_log.capacity));
    logging::init_tracing(&config.observability, errors.clone());

    tracing::info!("layout-control v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        playlist = config.playlist.initial_path.as_deref().unwrap_or("<built-in>"),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let loader = match &config.playlist.initial_path {
        Some(path) => JsonPlaylistLoader::from_file(Path::new(path))?,
        None => JsonPlaylistLoader::with_default_playlist()?,
    };
    let playlist = loader.parse_playlist(&loader.initial_config())?;
    let engine = Arc::new(PlaybackEngine::new(playlist, config.engine.max_queue));
    for display in &config.engine.displays {
        let rect = ClientRect {
            x: display.x,
            y: display.y,
            width: display.width,
            height: display.height,
        };
        engine.register_client(display.id.clone(), rect);
    }
    tracing::info!(displays = config.engine.displays.len(), "Displays registered");
    let gateway = Arc::new(ControlGateway::new(
        Arc::new(loader),
        engine.clone(),
        errors,
    ));

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let scheduler = LayoutScheduler::new(engine, Duration::from_millis(config.engine.tick_ms));
    let scheduler_task = tokio::spawn(scheduler.run(shutdown.subscribe()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config, gateway);
    server.run(listener, shutdown.clone()).await?;

    shutdown.trigger();
    let _ = scheduler_task.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
