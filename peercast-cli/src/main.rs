use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use peercast_client::{
    Collaborators, Coordinator, IvfFileCapture, MediaCapture, NoCapture, SessionConfig,
    SessionState, TransportConfig,
};
use peercast_core::utils::{DEFAULT_ACCESS_CODE, DEFAULT_RELAY_URL};
use peercast_core::{IceServerConfig, SessionCode};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{print_log, TerminalPresenter};

#[derive(Parser)]
#[command(name = "peercast")]
#[command(about = "One-to-one screen sharing over a signaling relay")]
struct Cli {
    /// Relay base URL.
    #[arg(long, default_value = DEFAULT_RELAY_URL)]
    relay: String,

    /// Access code shared by both endpoints.
    #[arg(long, default_value = DEFAULT_ACCESS_CODE)]
    code: String,

    /// JSON file with an array of ICE servers (`urls`, `username`, `credential`).
    #[arg(long)]
    ice_config: Option<PathBuf>,

    /// Also print debug lines of the session log.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Share a VP8 IVF recording as the display stream.
    Broadcast {
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Watch the broadcaster's stream.
    View,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let command = match cli.command.clone() {
        Some(command) => command,
        None => prompt_role()?,
    };

    let code = SessionCode::parse(cli.code.as_str()).context("Invalid access code")?;
    let transport = TransportConfig {
        ice_servers: match &cli.ice_config {
            Some(path) => load_ice_servers(path)?,
            None => TransportConfig::default().ice_servers,
        },
    };
    let capture: Arc<dyn MediaCapture> = match &command {
        Commands::Broadcast {
            source: Some(path),
        } => Arc::new(IvfFileCapture::new(path.clone())),
        _ => Arc::new(NoCapture),
    };

    let config = SessionConfig {
        relay_url: cli.relay.clone(),
        code,
        ..SessionConfig::default()
    };
    let collaborators = Collaborators::native(transport, capture, Arc::new(TerminalPresenter));
    let handle = Coordinator::new(config, collaborators).spawn();
    let printer = tokio::spawn(print_log(handle.log().clone(), cli.verbose));

    println!(
        "{} {} {}",
        "📡 peercast".green().bold(),
        "session".dimmed(),
        cli.code.cyan()
    );

    let started = match command {
        Commands::Broadcast { .. } => handle.become_broadcaster().await,
        Commands::View => handle.become_viewer().await,
    };
    if let Err(e) = started {
        handle.teardown().await;
        printer.abort();
        return Err(e).context("Could not start the session");
    }

    println!("{}", "Press Ctrl+C to stop.".dimmed());

    let mut states = handle.watch_state();
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!("{}", "Stopping...".yellow());
        }
        _ = states.wait_for(|s| *s == SessionState::Failed) => {
            println!("{}", "Session failed. Start a new one to retry.".red().bold());
        }
    }

    handle.teardown().await;
    // Let the printer catch up with the final lines.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    printer.abort();

    Ok(())
}

fn prompt_role() -> Result<Commands> {
    let choices = ["Start as Broadcaster", "Start as Viewer"];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("How do you want to join?")
        .items(&choices)
        .default(0)
        .interact()?;

    if selection == 1 {
        return Ok(Commands::View);
    }

    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Path to a VP8 IVF recording")
        .interact_text()?;
    Ok(Commands::Broadcast {
        source: Some(PathBuf::from(path)),
    })
}

fn load_ice_servers(path: &Path) -> Result<Vec<IceServerConfig>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ICE config {}", path.display()))?;
    let servers: Vec<IceServerConfig> =
        serde_json::from_str(&text).context("ICE config must be a JSON array of servers")?;
    if servers.is_empty() {
        anyhow::bail!("ICE config {} lists no servers", path.display());
    }
    Ok(servers)
}
