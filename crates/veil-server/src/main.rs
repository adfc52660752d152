//! veil-configs server entry point.
//!
//! Wires together the settings, the seeded config store, and the TCP
//! accept loop, then runs until a shutdown signal arrives.
//!
//! ```text
//! main()
//!  └─ ServerSettings::load()       -- optional TOML file, CLI override
//!  └─ InMemoryConfigStore::new(seed_configs())
//!  └─ ConfigServer::serve()        -- one task per connection
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use veil_core::{seed_configs, InMemoryConfigStore};
use veil_server::infrastructure::network::ConfigServer;
use veil_server::infrastructure::settings::ServerSettings;

/// The veil-configs server provides Nebula configuration files to clients.
#[derive(Debug, Parser)]
#[command(name = "veil-server", version)]
struct Args {
    /// Path to the settings file (missing file uses defaults)
    #[arg(long, default_value = "veil-server.toml")]
    config: PathBuf,

    /// The address to listen on (overrides the settings file)
    #[arg(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = ServerSettings::load(&args.config)
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;

    // Initialise structured logging. Level comes from the settings file,
    // overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.server.log_level.clone())),
        )
        .init();

    let address = args.address.unwrap_or(settings.server.address);
    let addr: SocketAddr = address
        .parse()
        .with_context(|| format!("invalid listen address: {address}"))?;

    info!("starting server on {addr}");

    let store = Arc::new(InMemoryConfigStore::new(seed_configs()));
    info!("config store seeded with {} clients", store.len());

    let server = ConfigServer::new(store);
    let listener = ConfigServer::bind(addr).await?;

    tokio::select! {
        result = server.serve(listener) => {
            result.context("server stopped unexpectedly")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    info!("server stopped");
    Ok(())
}
