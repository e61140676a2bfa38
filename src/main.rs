//! functions-gateway - admission-controlled function invocation gateway

#![allow(missing_docs)]

use clap::Parser;
use functions_gateway::Gateway;
use functions_gateway::server::builder::load_config;
use functions_gateway::utils::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "gateway", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,

    /// Log filter directive (RUST_LOG still wins)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps multi-line config errors readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> functions_gateway::Result<()> {
    let mut config = load_config(&cli.config).await?;

    if let Some(level) = cli.log_level {
        config.gateway.logging.level = level;
    }
    if cli.log_json {
        config.gateway.logging.json = true;
    }
    init_logging(config.logging())?;

    let build = functions_gateway::build_info();
    tracing::info!(
        version = build.version,
        git_hash = build.git_hash,
        built_at = build.build_time,
        "Starting functions gateway"
    );

    Gateway::new(config)?.run().await
}
