mod config;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Cli;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agentkit=info,agentkit_http=info,agentkit_core=info,agentkit_llm=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("Failed to start server: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.network_id.is_none() {
        warn!("NETWORK_ID not set; defaulting to base-sepolia testnet.");
    }
    agentkit_http::start_server(cli.server_config()).await
}
