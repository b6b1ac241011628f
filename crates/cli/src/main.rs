//! reactloop CLI — the main entry point.
//!
//! Commands:
//! - `solve`   — Work a problem through the Reason+Act loop
//! - `tools`   — List the built-in tools
//! - `doctor`  — Diagnose configuration and provider health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "reactloop",
    about = "reactloop — a tool-augmented Reason+Act problem solver",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem step by step with tools
    Solve {
        /// The problem statement
        problem: String,

        /// Maximum number of reasoning calls (defaults to config)
        #[arg(short, long)]
        max_iterations: Option<usize>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in tools
    Tools,

    /// Diagnose configuration and provider health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::Solve {
            problem,
            max_iterations,
            json,
        } => commands::solve::run(problem, max_iterations, json).await?,
        Commands::Tools => commands::tools::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
