/// Tune Player - console front end for the Tune Store playback engine
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tune_core::{Catalog, TrackResolver};
use tune_player::{
    config::PlayerConfig,
    console::{self, ConsoleCommand},
};
use tune_playback_desktop::{ClockBackend, PlaybackService};

#[derive(Parser)]
#[command(name = "tune-player")]
#[command(about = "Tune Store playback console", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TUNE_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog file (TOML or JSON), overrides the configured one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Clock speed factor (2.0 plays tracks twice as fast)
    #[arg(long)]
    speed: Option<f32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive playback console (default)
    Console,
    /// List the tracks in the catalog
    Tracks,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tune_player=info,tune_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = PlayerConfig::load(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        config.catalog = catalog;
    }
    if let Some(speed) = cli.speed {
        config.clock_speed = speed;
    }
    config.validate()?;

    let catalog = config
        .load_catalog()
        .with_context(|| format!("Failed to load catalog {}", config.catalog.display()))?;
    let catalog = Arc::new(catalog);

    match cli.command.unwrap_or(Commands::Console) {
        Commands::Console => run_console(&config, catalog),
        Commands::Tracks => {
            print_tracks(&catalog);
            Ok(())
        }
    }
}

fn run_console(config: &PlayerConfig, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    tracing::info!("Starting Tune Player");
    tracing::info!("Catalog: {} ({} tracks)", config.catalog.display(), catalog.len());

    let resolver: Arc<dyn TrackResolver> = catalog.clone();
    let service = PlaybackService::spawn(
        &config.playback,
        resolver,
        Box::new(ClockBackend::with_speed(config.clock_speed)),
    )?;

    // Print events as they arrive; ends when the service shuts down
    let events = service.subscribe();
    let printer = thread::Builder::new()
        .name("event-printer".to_string())
        .spawn(move || {
            while let Some(event) = events.recv() {
                if let Some(line) = console::render_event(&event) {
                    println!("{}", line);
                }
            }
        })?;

    println!("Type 'help' for commands.");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match console::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Playback(command))) => service.send_command(command)?,
            Ok(Some(ConsoleCommand::Status)) => {
                println!("{}", console::render_status(&service.snapshot()?));
            }
            Ok(Some(ConsoleCommand::Tracks)) => print_tracks(&catalog),
            Ok(Some(ConsoleCommand::Help)) => println!("{}", console::HELP),
            Ok(Some(ConsoleCommand::Quit)) => break,
            Err(e) => println!("{}", e),
        }
        io::stdout().flush()?;
    }

    service.shutdown()?;
    if printer.join().is_err() {
        tracing::warn!("Event printer panicked");
    }

    tracing::info!("Tune Player stopped");
    Ok(())
}

fn print_tracks(catalog: &Catalog) {
    for track_id in catalog.track_ids() {
        if let Some(entry) = catalog.get(track_id) {
            println!(
                "[{}] {} - {} ({})",
                entry.id,
                entry.artist,
                entry.name,
                console::format_time(u64::from(entry.duration_seconds) * 1000)
            );
        }
    }
}
