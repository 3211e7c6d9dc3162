// File: src/main.rs
// Full-node dashboard: status, recent blocks, peer connections and block search
// over a node snapshot, as CLI, TUI and Web interfaces

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod blocks;
mod cli_interface;
mod commands;
mod connections;
mod dashboard;
mod data_models;
mod error;
mod format;
mod navigation;
mod status;
mod store;
mod tui_dashboard;
mod web_server;

use crate::commands::CommandDispatcher;
use crate::data_models::AppConfig;
use crate::store::NodeStore;

/// Command-line interface definition for the full-node dashboard
#[derive(Parser)]
#[command(name = "fullnode-dashboard")]
#[command(about = "Full-node dashboard with TUI and Web interfaces")]
#[command(version)]
pub struct Cli {
    /// Node state snapshot (JSON) kept current by the node daemon
    #[arg(short, long, value_name = "SNAPSHOT", default_value = "node_state.json")]
    pub snapshot: PathBuf,

    /// Route prefix for block pages
    #[arg(long, default_value = "/dashboard")]
    pub base_path: String,

    /// Append dispatched connection commands to this file (JSON lines)
    #[arg(long, value_name = "OUTBOX")]
    pub commands: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Interface mode selection
    #[command(subcommand)]
    pub mode: InterfaceMode,
}

/// Available interface modes
#[derive(Subcommand)]
pub enum InterfaceMode {
    /// Print the dashboard panels once
    Cli {
        /// Show at most N block rows
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Terminal UI dashboard (ratatui)
    /// Live view of the node snapshot with block search and peer commands
    Tui,

    /// Web server with dashboard (axum + WebSocket)
    Web {
        /// Server port
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Bind address
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,

        /// Enable CORS for development
        #[arg(short, long)]
        cors: bool,
    },
}

/// Logs go to `log_file` when given. Without one the TUI discards them so
/// the alternate screen stays intact; other modes log to stderr.
fn init_tracing(log_file: Option<&Path>, tui: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if tui => BoxMakeWriter::new(io::sink),
        None => BoxMakeWriter::new(io::stderr),
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_ansi(log_file.is_none() && !tui)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!(e.to_string()))
}

/// Keep the store in sync with the snapshot file and drain the command
/// channel for the lifetime of the process
fn spawn_background_tasks(
    config: &AppConfig,
    store: &NodeStore,
    command_rx: tokio::sync::mpsc::UnboundedReceiver<data_models::NodeCommand>,
) {
    let watch_store = store.clone();
    let snapshot_path = config.snapshot_path.clone();
    tokio::spawn(async move {
        if let Err(e) = store::watch_snapshot(watch_store, snapshot_path).await {
            error!("❌ {}", e);
        }
    });

    let outbox = config.command_outbox.clone();
    tokio::spawn(async move {
        if let Err(e) = commands::run_command_outbox(command_rx, outbox).await {
            error!("command outbox stopped: {}", e);
        }
    });
}

/// Main application entry point
/// Routes to appropriate interface mode based on CLI arguments
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref(), matches!(cli.mode, InterfaceMode::Tui))?;

    // A one-shot print needs a snapshot; live modes wait for the daemon
    if !cli.snapshot.exists() {
        match cli.mode {
            InterfaceMode::Cli { .. } => {
                anyhow::bail!("Snapshot path does not exist: {:?}", cli.snapshot);
            }
            _ => {
                println!("⚠️  Snapshot path does not exist yet: {:?}", cli.snapshot);
                println!("⏳ Dashboard will show loading state until the node writes it");
            }
        }
    }

    let config = AppConfig {
        snapshot_path: cli.snapshot,
        base_path: cli.base_path,
        command_outbox: cli.commands,
    };

    let store = NodeStore::default();
    store::initial_load(&store, &config.snapshot_path).await;

    let (dispatcher, command_rx) = CommandDispatcher::channel();
    info!(snapshot = %config.snapshot_path.display(), base_path = %config.base_path, "dashboard starting");

    // Route to appropriate interface based on selected mode
    match cli.mode {
        InterfaceMode::Cli { count } => {
            println!("🔍 Full Node Dashboard - CLI Mode");
            cli_interface::run_cli_mode(&config, &store, count).await
        }

        InterfaceMode::Tui => {
            println!("📊 Full Node Dashboard - Terminal Dashboard");
            spawn_background_tasks(&config, &store, command_rx);
            tui_dashboard::run_tui_mode(&config, store, dispatcher).await
        }

        InterfaceMode::Web { port, bind, cors } => {
            println!("🌐 Full Node Dashboard - Web Server Mode");
            println!("Starting server at http://{}:{}", bind, port);
            spawn_background_tasks(&config, &store, command_rx);
            web_server::run_web_mode(&config, store, dispatcher, &bind, port, cors).await
        }
    }
}
