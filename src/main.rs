//! Urban Assistant - main entry point
//!
//! Serves the chat endpoint over HTTP or validates configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, Instrument};
use urban_assistant::config::AssistantConfig;
use urban_assistant::lifecycle_span;
use urban_assistant::observability::{init_default_logging, metrics};
use urban_assistant::routing::{CityCatalog, IntentRouter};
use urban_assistant::transport::HttpServer;

/// Intent router and chat endpoint for the urban intelligence dashboard
#[derive(Parser)]
#[command(name = "urban-assistant")]
#[command(about = "Intent router and chat endpoint for the urban intelligence dashboard")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the chat endpoint until SIGINT or SIGTERM
    Serve {
        /// Interface to bind, overrides server.host
        #[arg(long, env = "ASSISTANT_HOST")]
        host: Option<String>,

        /// Port to bind, overrides server.port
        #[arg(long, env = "ASSISTANT_PORT")]
        port: Option<u16>,
    },
    /// Validate configuration
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging(cli.verbose);

    info!("Starting urban-assistant v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve { host, port } => {
            serve(config, host, port)
                .instrument(lifecycle_span!(phase = "serve"))
                .await
        }
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Application shutdown complete");
}

fn load_configuration(
    path: Option<&std::path::Path>,
) -> Result<AssistantConfig, Box<dyn std::error::Error>> {
    let (config, source) = AssistantConfig::discover(path)?;
    match source {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => info!("No configuration file found, using built-in defaults"),
    }
    Ok(config)
}

async fn serve(
    mut config: AssistantConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    metrics().set_server_state("initializing");

    let router = Arc::new(IntentRouter::new(&config, &CityCatalog::default()));
    info!(
        rules = ?router.rule_order(),
        scope = %config.defaults.scope,
        "Intent router ready"
    );

    let server = HttpServer::start(&config, router).await?;

    wait_for_shutdown_signal().await?;

    info!("Application shutdown initiated");
    server.shutdown().await?;
    Ok(())
}

/// Resolve on SIGINT or SIGTERM
async fn wait_for_shutdown_signal() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    Ok(())
}

fn handle_config_command(
    config: &AssistantConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    let router = IntentRouter::from_config(config);
    info!(
        rules = router.rule_count(),
        destinations = config.destinations.len(),
        "Configuration validation complete"
    );
    Ok(())
}
