use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tabscroll_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "tabscroll")]
#[command(author, version, about = "A terminal document viewer that scrolls itself")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text or PDF file to open
    file: Option<PathBuf>,

    /// Initial auto-scroll speed, 0 to 5 (0 = off)
    #[arg(short = 's', long = "speed")]
    speed: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

fn env_filter(default_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
    )
}

/// The viewer owns the terminal, so its logs go to a file
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::registry()
        .with(env_filter(&config.general.log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;

    match cli.command {
        Some(Commands::Config { action }) => {
            tracing_subscriber::registry()
                .with(env_filter(&config.general.log_level))
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .init();

            match action {
                ConfigAction::Path => commands::config::path(),
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::Init { force } => commands::config::init(force),
            }
        }
        None => {
            init_file_logging(&config)?;
            if let Some(speed) = cli.speed {
                config.autoscroll.initial_speed = speed;
            }
            commands::run::run(Arc::new(config), cli.file).await
        }
    }
}
