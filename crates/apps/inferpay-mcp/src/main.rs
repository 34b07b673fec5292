//! Inferpay MCP server entry point.
//!
//! Runs the server on stdio for AI assistant integration. Configuration
//! comes from flags or environment variables:
//!
//! - `--budget` / `INFERPAY_BUDGET` — session spending limit in USD
//! - `--private-key` / `INFERPAY_PRIVATE_KEY` — hex key of the paying wallet
//! - `--gateway-url` / `INFERPAY_GATEWAY_URL` — override the gateway URL

use clap::Parser;
use tracing_subscriber::EnvFilter;

use inferpay_chain::ChainConfig;
use inferpay_gateway::GatewayConfig;
use inferpay_mcp::server::{run_server, McpServerConfig};

/// MCP server exposing paid AI inference tools over stdio.
#[derive(Debug, Parser)]
#[command(name = "inferpay-mcp", version, about)]
struct Cli {
    /// Session spending limit in USD. Unlimited when omitted.
    #[arg(long, env = "INFERPAY_BUDGET")]
    budget: Option<f64>,

    /// Hex private key of the paying wallet. An ephemeral unfunded wallet
    /// is generated when omitted.
    #[arg(long, env = "INFERPAY_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Override the inference gateway base URL.
    #[arg(long, env = "INFERPAY_GATEWAY_URL")]
    gateway_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logging goes to stderr only; stdout is reserved for the MCP stdio
    // transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let mut gateway = GatewayConfig::default();
    if let Some(url) = cli.gateway_url {
        gateway.base_url = url;
    }

    let config = McpServerConfig {
        budget_usd: cli.budget,
        private_key: cli.private_key,
        gateway,
        chain: ChainConfig::base(),
    };

    run_server(config).await
}
