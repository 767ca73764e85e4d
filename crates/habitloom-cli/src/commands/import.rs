//! Calendar import commands for CLI.

use clap::Subcommand;
use habitloom_core::services::ics::parse_ics;
use habitloom_core::storage::PlannerDb;
use habitloom_core::{Config, TimeBlock};

#[derive(Subcommand)]
pub enum ImportAction {
    /// Import VEVENTs from an .ics file as one-off time blocks
    Ics {
        /// Path to the .ics file
        path: String,
        /// Parse and print without writing blocks
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(action: ImportAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ImportAction::Ics { path, dry_run } => {
            let text = std::fs::read_to_string(&path)?;
            let events = parse_ics(&text)?;
            let config = Config::load();

            let mut blocks = Vec::new();
            for event in &events {
                let duration = event
                    .duration_minutes()
                    .unwrap_or(config.import.all_day_minutes);
                let block = TimeBlock::one_off(
                    event.summary.clone(),
                    event.start.format("%H:%M").to_string(),
                    duration,
                    event.start.date(),
                );
                blocks.push(block);
            }

            if dry_run {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
                return Ok(());
            }

            let db = PlannerDb::open()?;
            for block in &blocks {
                block.validate()?;
                db.create_block(block)?;
            }
            println!("Imported {} events from {path}", blocks.len());
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
    }
    Ok(())
}
