//! Time block commands for CLI.

use clap::Subcommand;
use habitloom_core::block::{conflicts, expand_day, TimeBlock};
use habitloom_core::storage::PlannerDb;
use habitloom_core::Weekday;
use serde_json::json;

use super::{parse_date, today};

#[derive(Subcommand)]
pub enum BlockAction {
    /// Create a time block
    Create {
        /// Block title
        title: String,
        /// Start time, HH:mm
        #[arg(long)]
        start: String,
        /// Duration in minutes
        #[arg(long, default_value = "60")]
        duration: u32,
        /// Comma-separated weekdays for a recurring block (e.g. "mon,wed,fri")
        #[arg(long)]
        weekdays: Option<String>,
        /// Concrete date for a one-off block, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Task to reserve the block for
        #[arg(long)]
        task_id: Option<String>,
    },
    /// List block definitions
    List,
    /// Delete a block
    Delete {
        /// Block ID
        id: String,
    },
    /// Show the expanded agenda for a day, with conflicts
    Agenda {
        /// Day to expand, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: BlockAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        BlockAction::Create {
            title,
            start,
            duration,
            weekdays,
            date,
            task_id,
        } => {
            let mut block = match (&weekdays, &date) {
                (_, Some(s)) => TimeBlock::one_off(title, start, duration, parse_date(s)?),
                (Some(s), None) => {
                    let days = s
                        .split(',')
                        .map(|part| part.trim().parse::<Weekday>())
                        .collect::<Result<Vec<_>, _>>()?;
                    TimeBlock::recurring(title, start, duration, days)
                }
                (None, None) => {
                    return Err("a block needs --weekdays or --date".into());
                }
            };
            block.task_id = task_id;
            block.validate()?;
            db.create_block(&block)?;
            println!("Block created: {}", block.id);
            println!("{}", serde_json::to_string_pretty(&block)?);
        }
        BlockAction::List => {
            let blocks = db.list_blocks()?;
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        BlockAction::Delete { id } => {
            if db.delete_block(&id)? {
                println!("Block deleted: {id}");
            } else {
                println!("Block not found: {id}");
            }
        }
        BlockAction::Agenda { date } => {
            let day = match date {
                Some(s) => parse_date(&s)?,
                None => today(),
            };
            let blocks = db.list_blocks()?;
            let occurrences = expand_day(&blocks, day);
            let overlapping = conflicts(&occurrences);
            let agenda = json!({
                "date": day.to_string(),
                "occurrences": occurrences,
                "conflicts": overlapping,
            });
            println!("{}", serde_json::to_string_pretty(&agenda)?);
        }
    }
    Ok(())
}
