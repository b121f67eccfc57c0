/// Encore - playlists and interactive playback from the terminal
use anyhow::Context;
use clap::{Parser, Subcommand};
use encore_cli::{AppConfig, ConsolePresenter, SimulatedGateway};
use encore_library::{format_playlist_listing, format_track_listing, PlaylistLibrary};
use encore_session::{
    ControlId, DispatchOutcome, GuildId, SessionId, SessionRegistry, SessionRequest,
    VoiceChannelId,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Play local playlists with interactive controls", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./encore.toml when present)
    #[arg(short, long, global = true, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List playlists with their track counts
    List,
    /// Show the tracks of a playlist in play order
    Show {
        /// Playlist name
        playlist: String,
    },
    /// Play a playlist; type control names (next, pause, stop, ...) to steer it
    Play {
        /// Playlist name
        playlist: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=info,encore_cli=info,encore_session=info,encore_library=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate()?;

    match cli.command {
        Commands::List => list(&config)?,
        Commands::Show { playlist } => show(&config, &playlist)?,
        Commands::Play { playlist } => play(config, playlist).await?,
    }

    Ok(())
}

fn list(config: &AppConfig) -> anyhow::Result<()> {
    let library = PlaylistLibrary::new(config.library.clone());
    let summaries = library.summaries()?;
    println!("{}", format_playlist_listing(&summaries));
    Ok(())
}

fn show(config: &AppConfig, playlist: &str) -> anyhow::Result<()> {
    let library = PlaylistLibrary::new(config.library.clone());
    let tracks = library
        .tracks(playlist)
        .with_context(|| format!("Could not read playlist {playlist}"))?;
    println!("{}", format_track_listing(&tracks));
    Ok(())
}

async fn play(config: AppConfig, playlist: String) -> anyhow::Result<()> {
    let library = PlaylistLibrary::new(config.library.clone());
    let gateway = Arc::new(SimulatedGateway::new(config.simulator.clone()));
    let presenter = Arc::new(ConsolePresenter::stdout());
    let registry = SessionRegistry::new(library, gateway, presenter, config.session.clone());

    let session_id = SessionId::new("console");
    let request = SessionRequest {
        session_id: session_id.clone(),
        guild: GuildId("local".to_string()),
        voice_channel: Some(VoiceChannelId("terminal".to_string())),
        playlist,
    };
    registry.start(request).await?;

    let tokens: Vec<&str> = ControlId::ALL.iter().map(|c| c.token()).collect();
    println!("Controls: {} (quit to exit)", tokens.join(", "));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut liveness = tokio::time::interval(Duration::from_millis(500));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                let token = line.trim();
                if token.is_empty() {
                    continue;
                }
                if token == "quit" {
                    break;
                }
                match registry.dispatch(&session_id, token).await {
                    DispatchOutcome::Queued => {}
                    DispatchOutcome::UnknownControl => {
                        println!("Unknown control '{token}'. Try one of: {}", tokens.join(", "));
                    }
                    DispatchOutcome::NoSession => break,
                }
            }
            _ = liveness.tick() => {
                if !registry.contains(&session_id).await {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    registry.shutdown().await;
    tracing::info!("Session closed");
    Ok(())
}
