//! Info command - Show version and effective configuration
//!
//! Usage:
//! ```bash
//! court info
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use court_engine::{CourtConfig, JudgeRegistry};
use court_llm::LlmConfig;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs;

/// Run the info command
pub fn run(_args: InfoArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    println!("{}", "Court - AI deliberation engine".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!();

    println!("{}", "Version:".bold());
    println!("  {} {}", "CLI Version:".dimmed(), version.green());
    println!();

    println!("{}", "Deliberation:".bold());
    match CourtConfig::from_env() {
        Ok(config) => {
            println!("  {} {}", "Rounds:".dimmed(), config.max_rounds);
            println!("  {} {}", "Damage factor:".dimmed(), config.damage_factor);
            println!("  {} {}", "Live floor:".dimmed(), config.live_floor);
            println!(
                "  {} {} of {}",
                "Majority:".dimmed(),
                config.majority,
                JudgeRegistry::standard().len()
            );
            println!(
                "  {} {}s",
                "Generation timeout:".dimmed(),
                config.generation_timeout_secs
            );
        }
        Err(e) => crate::print_warning(&e.to_string()),
    }
    println!();

    println!("{}", "Backend:".bold());
    match LlmConfig::from_env() {
        Ok(llm) => {
            println!("  {} {}", "Provider:".dimmed(), llm.provider.to_string().green());
            println!("  {} {}", "Model:".dimmed(), llm.model_name());
            println!("  {} {}s", "Timeout:".dimmed(), llm.timeout_secs);
        }
        Err(e) => crate::print_warning(&e.to_string()),
    }
    println!();

    println!("{}", "Environment:".bold());
    for var in [
        "COURT_LLM_PROVIDER",
        "COURT_LLM_MODEL",
        "COURT_LLM_BASE_URL",
        "COURT_LLM_TIMEOUT_SECS",
        "OPENAI_API_KEY",
        "OLLAMA_URL",
        "COURT_MAX_ROUNDS",
        "COURT_DAMAGE_FACTOR",
        "COURT_LIVE_FLOOR",
        "COURT_MAJORITY",
        "COURT_JUDGE_CONCURRENCY",
        "COURT_GENERATION_TIMEOUT_SECS",
    ] {
        let state = if std::env::var(var).is_ok() {
            "set".green()
        } else {
            "unset".dimmed()
        };
        println!("  {} {}", var, state);
    }
    println!();

    Ok(())
}
