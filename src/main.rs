use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use oddsforge_probability::api;
use oddsforge_probability::cli::{self, OutputFormat};

#[derive(Parser)]
#[command(name = "oddsforge")]
#[command(about = "Football match probability estimation engine")]
struct Cli {
    /// JSON file with engine coefficients (overrides ODDSFORGE_ENGINE_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the estimation API server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Estimate one fixture or a list of fixtures from a JSON file
    Estimate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Print the effective engine configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting OddsForge estimation API on port {}", port);
            api::serve(port, cli::load_engine(config)?).await?;
        }
        Some(Commands::Estimate { input, format }) => {
            tracing::info!("Estimating fixtures from {}", input.display());
            cli::estimate_from_file(&input, format, config)?;
        }
        Some(Commands::Config) => {
            cli::show_config(config)?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting OddsForge estimation API on port 3000");
            api::serve(3000, cli::load_engine(config)?).await?;
        }
    }

    Ok(())
}
