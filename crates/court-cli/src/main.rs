//! Court CLI - run deliberation cases from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Run a case with the offline mock backend
//! court run --plaintiff alice --defendant bob --case-type "Exploit Theft" \
//!     --summary "Bob resubmitted Alice's disclosed exploit as his own."
//!
//! # Same case against a local Ollama model, judged by the model too
//! court run --provider ollama --llm-judges ...
//!
//! # Show the judging panel
//! court judges
//!
//! # Show version and effective configuration
//! court info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{info, judges, run};

/// Adversarial argument court
///
/// Two parties argue in alternating rounds, six judges score the exchange,
/// and the panel's votes become a verdict.
#[derive(Parser)]
#[command(
    name = "court",
    version,
    about = "Court CLI - AI deliberation for community disputes",
    long_about = "Runs a dispute through argument rounds and a six-judge panel.\n\n\
                  Every judge scores both sides on logic, evidence, rebuttal and\n\
                  clarity; the score gap drains the losing side's credibility."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// File a case and run it to a verdict
    #[command(name = "run")]
    Run(run::RunArgs),

    /// List the judging panel
    #[command(name = "judges")]
    Judges(judges::JudgesArgs),

    /// Show version and configuration
    #[command(name = "info")]
    Info(info::InfoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Judges(args) => judges::run(args),
        Commands::Info(args) => info::run(args),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
