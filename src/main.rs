use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{ConfigCommand, ProductsCommand, ReportCommand, WasteCommand};
use wastetrack::Config;

#[derive(Parser)]
#[command(name = "wastetrack")]
#[command(version)]
#[command(about = "Track wasted products and what they cost", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalog
    Products(ProductsCommand),

    /// Record and review waste entries
    Waste(WasteCommand),

    /// Summarize waste value
    Report(ReportCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wastetrack=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Products(cmd)) => {
            let store = config.open_store()?;
            cmd.run(&store)?;
        }
        Some(Commands::Waste(cmd)) => {
            let store = config.open_store()?;
            cmd.run(&store)?;
        }
        Some(Commands::Report(cmd)) => {
            let store = config.open_store()?;
            cmd.run(&store)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
