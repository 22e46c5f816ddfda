//! 2048 game API server (default binary).
//!
//! Configuration comes from the environment (see [`ServerConfig::from_env`])
//! and can be overridden per field on the command line.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use grid2048::adapter::{run_server, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "grid2048", version, about = "2048 game engine over HTTP")]
struct Args {
    /// Bind address [env: GRID2048_HOST, default 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// Port [env: PORT, default 3000]
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding one JSON file per game [env: GRID2048_GAMES_DIR]
    #[arg(long)]
    games_dir: Option<PathBuf>,

    /// Delete games untouched for this many seconds [env: GRID2048_MAX_AGE_SECS]
    #[arg(long)]
    max_age_secs: Option<u64>,

    /// Seconds between cleanup sweeps [env: GRID2048_CLEANUP_INTERVAL_SECS]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    cleanup_interval_secs: Option<u64>,

    /// Log filter, e.g. "info" or "grid2048_adapter=debug" (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.games_dir {
            config.games_dir = dir;
        }
        if let Some(secs) = self.max_age_secs {
            config.max_game_age = Duration::from_secs(secs);
        }
        if let Some(secs) = self.cleanup_interval_secs {
            config.cleanup_interval = Duration::from_secs(secs);
        }
        config
    }
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(d) => EnvFilter::new(d),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let config = args.apply(ServerConfig::from_env());
    run_server(config, None, shutdown_signal()).await
}
