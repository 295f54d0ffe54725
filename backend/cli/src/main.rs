mod check_cmd;
mod grade_cmd;
mod status_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use snapgrade_config::{
    config_dir, config_file_path, load_and_prepare, SnapGradeConfig, DEFAULT_HOST,
    DEFAULT_LOG_LEVEL, DEFAULT_MODEL, DEFAULT_PORT,
};
use snapgrade_core::SnapGradeError;
use snapgrade_gateway::{start_server, GatewayState};
use snapgrade_vision::GeminiClient;

#[derive(Parser)]
#[command(name = "snapgrade")]
#[command(about = "Stream-graded photos of handwritten algebra")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the SnapGrade gateway server
    Serve {
        /// Port to bind, overriding the config
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show the health of a running gateway
    Status {
        /// Base URL of the gateway
        #[arg(long, default_value = "http://localhost:8080")]
        server: String,
    },
    /// Diagnose the local configuration
    Check,
    /// Grade a local image through a running gateway
    Grade {
        /// Path to the image file
        image: PathBuf,
        /// Base URL of the gateway
        #[arg(long, default_value = "http://localhost:8080")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));

    match cli.command {
        Commands::Serve { port } => {
            let config = load_and_prepare(&config_path).await?;
            run_server(config, port).await?;
        }
        Commands::Status { server } => status_cmd::run(&server).await?,
        Commands::Check => check_cmd::run(&config_path).await?,
        Commands::Grade { image, server } => grade_cmd::run(&image, &server).await?,
    }

    Ok(())
}

async fn run_server(config: SnapGradeConfig, port_override: Option<u16>) -> Result<()> {
    let logging_cfg = config.logging.clone().unwrap_or_default();
    logging::init_logger(
        logging_cfg.dir.as_deref().map(std::path::Path::new),
        logging_cfg.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL),
    );

    let model_cfg = config.model.clone().unwrap_or_default();
    let api_key = model_cfg
        .api_key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            SnapGradeError::Config(
                "no model API key; set GEMINI_API_KEY or model.apiKey in the config".to_string(),
            )
        })?;
    let model_id = model_cfg.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let mut client = GeminiClient::new(api_key, model_id);
    if let Some(base_url) = model_cfg.base_url {
        client = client.with_base_url(base_url);
    }

    let gateway_cfg = config.gateway.clone().unwrap_or_default();
    let host = gateway_cfg.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = port_override.or(gateway_cfg.port).unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid gateway address {host}:{port}"))?;

    info!(%addr, "Starting SnapGrade gateway");

    let state = GatewayState::new(Arc::new(client));
    start_server(addr, state).await
}
