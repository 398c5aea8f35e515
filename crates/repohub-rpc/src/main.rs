//! RepoHub RPC Server - JSON-RPC front end for a shared repository store.
//!
//! Serves one root store to clients on the local network. Clients discover
//! repositories by identifier and ask the hub to prepare a directory before
//! pushing a clone into it.

mod handlers;
mod server;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use repohub_core::config::ServerConfig;
use repohub_core::{BackendKind, RepoHub};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    /// Read the store layout directly
    Native,
    /// Shell out to an hg executable
    Hg,
}

#[derive(Parser, Debug)]
#[command(name = "repohub-rpc")]
#[command(about = "JSON-RPC server for a shared Mercurial repository store")]
struct Args {
    /// Root store directory whose subdirectories are repositories
    #[arg(long)]
    root: PathBuf,

    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Repository backend
    #[arg(long, value_enum, default_value_t = BackendArg::Native)]
    backend: BackendArg,

    /// hg executable used by the hg backend
    #[arg(long, default_value = "hg")]
    hg_path: PathBuf,

    /// Create the root store if it doesn't exist
    #[arg(long)]
    create_root: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    if args.json_logs {
        FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .compact()
            .init();
    }

    info!("Starting RepoHub RPC Server");

    let backend = match args.backend {
        BackendArg::Native => BackendKind::Native,
        BackendArg::Hg => BackendKind::Command {
            program: args.hg_path.clone(),
        },
    };

    let hub = RepoHub::builder(&args.root)
        .auto_create_root(args.create_root)
        .backend(backend)
        .build()?;

    info!("Root store: {}", hub.root().display());

    // Start the server
    let addr = server::start_server(hub, &args.host, args.port).await?;

    // Print port for launchers and tests to read (intentional stdout)
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
