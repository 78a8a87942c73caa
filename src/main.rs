use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};

use spa_devgate::bootstrap;
use spa_devgate::commands;
use spa_devgate::config::{self, Config};
use spa_devgate::error::{GatewayError, Result};
use spa_devgate::logging;
use spa_devgate::registry::icons;
use spa_devgate::state::AppState;
use spa_devgate::web;

#[derive(Parser, Debug)]
#[command(name = "spa-devgate")]
#[command(about = "Startup configuration and development gateway for a single-page client", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (YAML/JSON/TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// URL the page is served at (overrides devServer.publicUrl)
    #[arg(long, value_name = "URL", global = true)]
    public_url: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Serve the client and forward backend requests (default)
    Serve,
    /// Validate configuration and show the resolved origin and proxy rules
    Check,
    /// Print the environment and API origin a page URL resolves to
    Resolve {
        /// Page URL, e.g. http://localhost:5173/
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(args.debug, args.log_json);

    let mut config = load_config(args.config.as_ref()).await?;
    if let Some(public_url) = args.public_url {
        config.dev_server.public_url = Some(public_url);
        config::validate(&config)?;
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Check => return commands::run_config_check(config).await,
        Command::Resolve { url } => return commands::run_resolve(&config, &url),
        Command::Serve => {}
    }

    info!("Starting spa-devgate");

    // Origin and capabilities are settled before anything can serve a request
    let runtime = bootstrap::bootstrap_from_config(&config, icons::catalog())?;
    let (state, _shutdown_rx) = AppState::new(config, runtime)?;

    let web_state = state.clone();
    let mut web_handle = tokio::spawn(async move { web::start_server(web_state).await });

    tokio::select! {
        _ = shutdown_signal() => {}
        joined = &mut web_handle => {
            // Server ended without a shutdown request, e.g. the port was taken
            return match joined {
                Ok(result) => result,
                Err(e) => Err(GatewayError::Server(format!("Dev server task failed: {e}"))),
            };
        }
    }

    info!("Shutting down spa-devgate");

    let shutdown_timeout = tokio::time::timeout(tokio::time::Duration::from_secs(10), async {
        state.shutdown().await;
        let _ = web_handle.await;
    })
    .await;

    match shutdown_timeout {
        Ok(_) => {
            info!("Graceful shutdown completed");
        }
        Err(_) => {
            error!("Shutdown timeout exceeded, forcing exit");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config::load_from_path(path).await.map_err(|e| {
                error!("Failed to load configuration from {}: {}", path.display(), e);
                e
            })
        }
        None => {
            info!("Loading configuration from default locations");
            config::load_from_env_or_file().await.map_err(|e| {
                error!("Failed to load configuration: {}", e);
                e
            })
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
