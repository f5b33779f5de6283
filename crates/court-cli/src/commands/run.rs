//! Run command - File a case and drive it to a verdict
//!
//! Usage:
//! ```bash
//! court run --plaintiff alice --defendant bob --summary "..."
//! court run --rounds 2 --provider ollama --model llama3 --json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use court_core::{Argument, CaseInput, Health, Party, Role, VerdictWinner};
use court_engine::CourtConfig;
use court_llm::{LlmConfig, ProviderKind};
use court_runtime::{CaseSnapshot, Court};

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Party bringing the complaint
    #[arg(long)]
    plaintiff: String,

    /// Party answering the complaint
    #[arg(long)]
    defendant: String,

    /// Dispute category
    #[arg(long = "case-type", default_value = "Beef Resolution")]
    case_type: String,

    /// One-paragraph summary of the dispute
    #[arg(long)]
    summary: String,

    /// Supporting evidence line (repeatable)
    #[arg(long)]
    evidence: Vec<String>,

    /// Argument rounds
    #[arg(long, env = "COURT_MAX_ROUNDS")]
    rounds: Option<u32>,

    /// Text backend: mock, ollama or openai
    #[arg(long, env = "COURT_LLM_PROVIDER")]
    provider: Option<ProviderKind>,

    /// Model name for the backend
    #[arg(long, env = "COURT_LLM_MODEL")]
    model: Option<String>,

    /// Ask the backend to score arguments instead of the rubric
    #[arg(long)]
    llm_judges: bool,

    /// Print the final case state as JSON
    #[arg(long)]
    json: bool,
}

/// Run the run command
pub async fn run(args: RunArgs) -> Result<()> {
    let mut llm = LlmConfig::from_env().context("Invalid LLM configuration")?;
    if let Some(provider) = args.provider {
        llm.provider = provider;
    }
    if args.model.is_some() {
        llm.model = args.model.clone();
    }
    llm.validate().context("Invalid LLM configuration")?;

    let mut config = CourtConfig::from_env().context("Invalid court configuration")?;
    if let Some(rounds) = args.rounds {
        config.max_rounds = rounds;
    }

    let provider = llm.build_provider().context("Failed to build LLM provider")?;
    let court = Court::builder(provider)
        .config(config)
        .llm_judges(args.llm_judges)
        .build()
        .context("Failed to assemble the court")?;

    let input = CaseInput::new(
        &args.case_type,
        Party::new(&args.plaintiff),
        Party::new(&args.defendant),
        &args.summary,
    )
    .with_evidence(args.evidence.clone());

    let case_id = court.start_case(input).await.context("Failed to file case")?;
    tracing::debug!(case_id = %case_id, provider = %llm.provider, "case filed");

    if !args.json {
        println!(
            "{} {} v. {} ({})",
            "⚖".cyan(),
            args.plaintiff.green().bold(),
            args.defendant.red().bold(),
            args.case_type
        );
        crate::print_info(&format!(
            "{} rounds, backend {} ({})",
            court.config().max_rounds,
            llm.provider,
            llm.model_name()
        ));
        println!();
    }

    for round in 1..=court.config().max_rounds {
        for role in Role::ALL {
            let argument = court
                .post_argument(case_id, role, round, None)
                .await
                .with_context(|| format!("Round {} {} argument failed", round, role))?;
            if !args.json {
                print_argument(&args, &argument);
            }
        }
    }

    court
        .deliberate(case_id)
        .await
        .context("Panel deliberation failed")?;
    let snapshot = court.get_case_state(case_id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_panel(&court, &snapshot);
    print_outcome(&court, &snapshot).await?;
    Ok(())
}

fn print_argument(args: &RunArgs, argument: &Argument) {
    let speaker = match argument.role {
        Role::Plaintiff => args.plaintiff.green().bold(),
        Role::Defendant => args.defendant.red().bold(),
    };
    let marker = if argument.fallback {
        " (fallback)".yellow().to_string()
    } else {
        String::new()
    };
    println!(
        "{} {}{}",
        format!("[round {}]", argument.round).dimmed(),
        speaker,
        marker
    );
    println!("  {}", argument.content);
    println!();
}

fn print_panel(court: &Court, snapshot: &CaseSnapshot) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Judge").fg(Color::Cyan),
            Cell::new("Plaintiff").fg(Color::Cyan),
            Cell::new("Defendant").fg(Color::Cyan),
            Cell::new("Vote").fg(Color::Cyan),
            Cell::new("Reasoning").fg(Color::Cyan),
        ]);

    for evaluation in &snapshot.evaluations {
        let name = court
            .registry()
            .get(&evaluation.judge_id)
            .map(|j| j.name.clone())
            .unwrap_or_else(|_| evaluation.judge_id.clone());
        let vote_color = match evaluation.winner {
            Role::Plaintiff => Color::Green,
            Role::Defendant => Color::Red,
        };
        let mut vote = evaluation.winner.to_string();
        if evaluation.fallback {
            vote.push('*');
        }
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.1}", evaluation.scores.plaintiff.mean())),
            Cell::new(format!("{:.1}", evaluation.scores.defendant.mean())),
            Cell::new(vote).fg(vote_color),
            Cell::new(&evaluation.reasoning),
        ]);
    }

    println!("{}", "Panel".bold());
    println!("{table}");
    if snapshot.evaluations.iter().any(|e| e.fallback) {
        crate::print_warning("* scored by the rubric after the backend failed");
    }
    println!();
}

async fn print_outcome(court: &Court, snapshot: &CaseSnapshot) -> Result<()> {
    let Some(verdict) = &snapshot.verdict else {
        crate::print_warning("No verdict was reached");
        return Ok(());
    };

    let winner = match verdict.winner {
        VerdictWinner::Plaintiff => snapshot.case.plaintiff.username.green().bold(),
        VerdictWinner::Defendant => snapshot.case.defendant.username.red().bold(),
        VerdictWinner::Split => "split panel".yellow().bold(),
    };
    println!("{} {}", "Verdict:".bold(), winner);
    println!(
        "  {} {}-{} (confidence {:.0}%{})",
        "Votes:".dimmed(),
        verdict.plaintiff_votes,
        verdict.defendant_votes,
        verdict.confidence * 100.0,
        if verdict.is_unanimous { ", unanimous" } else { "" }
    );
    print_health("Credibility:", &snapshot.health);
    print_health("On record:", &snapshot.archive_health);
    if let Some(sanction) = snapshot.sanction {
        println!("  {} {}", "Sanction:".dimmed(), sanction);
    }
    if verdict.appeal_allowed {
        crate::print_info("Close decision: the losing side may appeal");
    }
    println!();

    if let Some(announcement) = court.announcement(snapshot.case.id).await? {
        crate::print_success(&announcement.headline);
    }
    Ok(())
}

fn print_health(label: &str, health: &Health) {
    println!(
        "  {} plaintiff {} / defendant {}",
        label.dimmed(),
        health.plaintiff,
        health.defendant
    );
}
