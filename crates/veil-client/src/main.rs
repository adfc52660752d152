//! veil-configs client entry point.
//!
//! Fetches the Nebula configuration for one client identifier and writes
//! it to a file, then exits. Errors print with their full cause chain and
//! a non-zero exit status.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use veil_client::application::fetch_config::fetch_and_save;
use veil_client::infrastructure::network::{ChannelConfig, TcpConfigChannel};

/// The veil-configs client fetches a Nebula configuration from the server.
#[derive(Debug, Parser)]
#[command(name = "veil-client", version)]
struct Args {
    /// Address of the veil-configs server
    #[arg(long, default_value = "127.0.0.1:50051")]
    server_address: String,

    /// Client identifier to request the configuration for
    #[arg(long)]
    client_id: String,

    /// Output file path (defaults to nebula_config_<client-id>.yaml)
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Per-call deadline in seconds
    #[arg(long, default_value_t = 1)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let server_addr: SocketAddr = args
        .server_address
        .parse()
        .with_context(|| format!("invalid server address: {}", args.server_address))?;

    let output_path = args
        .output_file
        .unwrap_or_else(|| PathBuf::from(format!("nebula_config_{}.yaml", args.client_id)));

    let channel = TcpConfigChannel::new(ChannelConfig {
        server_addr,
        request_timeout: Duration::from_secs(args.timeout_secs),
    });

    info!(
        "requesting config for {} from {server_addr}",
        args.client_id
    );
    fetch_and_save(&channel, &args.client_id, &output_path).await?;

    info!("wrote {}", output_path.display());
    Ok(())
}
