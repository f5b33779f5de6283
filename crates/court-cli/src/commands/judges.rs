//! Judges command - Show the judging panel
//!
//! Usage:
//! ```bash
//! court judges
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use court_engine::{bias_profile, JudgeRegistry};

/// Arguments for the judges command
#[derive(Args)]
pub struct JudgesArgs {
    /// Print the panel as JSON
    #[arg(long)]
    json: bool,
}

/// Run the judges command
pub fn run(args: JudgesArgs) -> Result<()> {
    let registry = JudgeRegistry::standard();

    if args.json {
        let judges: Vec<_> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&judges)?);
        return Ok(());
    }

    println!("{}", "The Panel".bold().cyan());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Id").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Bias").fg(Color::Cyan),
            Cell::new("Weighs").fg(Color::Cyan),
            Cell::new("Catchphrase").fg(Color::Cyan),
        ]);

    for judge in registry.iter() {
        let profile = bias_profile(judge.bias);
        table.add_row(vec![
            Cell::new(&judge.id).fg(Color::Green),
            Cell::new(&judge.name),
            Cell::new(&judge.title),
            Cell::new(judge.bias.to_string()).fg(Color::Yellow),
            Cell::new(profile.emphasis.to_string()),
            Cell::new(&judge.catchphrase),
        ]);
    }

    println!("{table}");
    Ok(())
}
