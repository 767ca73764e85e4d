//! Habit tracking commands for CLI.

use clap::Subcommand;
use habitloom_core::storage::HabitDb;
use habitloom_core::{
    compute_month_stats, compute_streaks, CompletionIndex, Frequency, Habit, Weekday,
};

use super::{parse_date, today};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        /// Habit name
        name: String,
        /// Frequency: daily, weekly or monthly (default: daily)
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Comma-separated weekdays for weekly habits (e.g. "mon,thu")
        #[arg(long)]
        weekdays: Option<String>,
        /// Comma-separated days of month for monthly habits (e.g. "1,15")
        #[arg(long)]
        month_days: Option<String>,
        /// First active day, YYYY-MM-DD (default: today)
        #[arg(long)]
        start_date: Option<String>,
        /// Last active day, YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,
    },
    /// List habits
    List,
    /// Get habit details
    Get {
        /// Habit ID
        id: String,
    },
    /// Update a habit
    Update {
        /// Habit ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New frequency
        #[arg(long)]
        frequency: Option<String>,
        /// New comma-separated weekdays
        #[arg(long)]
        weekdays: Option<String>,
        /// New comma-separated days of month
        #[arg(long)]
        month_days: Option<String>,
        /// New start date, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,
        /// New end date, YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,
        /// Remove the end date
        #[arg(long)]
        clear_end_date: bool,
    },
    /// Delete a habit and its log
    Delete {
        /// Habit ID
        id: String,
    },
    /// Toggle completion for a day
    Toggle {
        /// Habit ID
        id: String,
        /// Day to toggle, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show current and longest streak
    Streak {
        /// Habit ID
        id: String,
        /// Compute as of this day, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Show monthly completion stats
    Stats {
        /// Habit ID
        id: String,
        /// Month to report, YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
}

fn parse_weekdays(s: &str) -> Result<Vec<Weekday>, Box<dyn std::error::Error>> {
    s.split(',')
        .map(|part| part.trim().parse::<Weekday>().map_err(Into::into))
        .collect()
}

fn parse_month_days(s: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| format!("'{part}' is not a day of month").into())
        })
        .collect()
}

fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| format!("'{s}' is not YYYY-MM"))?;
    let year = year.parse().map_err(|_| format!("'{s}' is not YYYY-MM"))?;
    let month = month.parse().map_err(|_| format!("'{s}' is not YYYY-MM"))?;
    Ok((year, month))
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;

    match action {
        HabitAction::Create {
            name,
            frequency,
            weekdays,
            month_days,
            start_date,
            end_date,
        } => {
            let start = match start_date {
                Some(s) => parse_date(&s)?,
                None => today(),
            };
            let mut habit = Habit::new(name, start);
            habit.frequency = frequency.parse::<Frequency>()?;
            if let Some(s) = weekdays {
                habit.weekdays = parse_weekdays(&s)?;
            }
            if let Some(s) = month_days {
                habit.month_days = parse_month_days(&s)?;
            }
            if let Some(s) = end_date {
                habit.end_date = Some(parse_date(&s)?);
            }
            habit.validate()?;
            db.create_habit(&habit)?;
            println!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List => {
            let habits = db.list_habits()?;
            println!("{}", serde_json::to_string_pretty(&habits)?);
        }
        HabitAction::Get { id } => match db.get_habit(&id)? {
            Some(habit) => println!("{}", serde_json::to_string_pretty(&habit)?),
            None => println!("Habit not found: {id}"),
        },
        HabitAction::Update {
            id,
            name,
            frequency,
            weekdays,
            month_days,
            start_date,
            end_date,
            clear_end_date,
        } => {
            let mut habit = db.get_habit(&id)?.ok_or(format!("Habit not found: {id}"))?;

            if let Some(n) = name {
                habit.name = n;
            }
            if let Some(f) = frequency {
                habit.frequency = f.parse::<Frequency>()?;
            }
            if let Some(s) = weekdays {
                habit.weekdays = parse_weekdays(&s)?;
            }
            if let Some(s) = month_days {
                habit.month_days = parse_month_days(&s)?;
            }
            if let Some(s) = start_date {
                habit.start_date = parse_date(&s)?;
            }
            if let Some(s) = end_date {
                habit.end_date = Some(parse_date(&s)?);
            }
            if clear_end_date {
                habit.end_date = None;
            }
            habit.updated_at = chrono::Utc::now();
            habit.validate()?;
            db.update_habit(&habit)?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Delete { id } => {
            if db.delete_habit(&id)? {
                println!("Habit deleted: {id}");
            } else {
                println!("Habit not found: {id}");
            }
        }
        HabitAction::Toggle { id, date } => {
            let habit = db.get_habit(&id)?.ok_or(format!("Habit not found: {id}"))?;
            let day = match date {
                Some(s) => parse_date(&s)?,
                None => today(),
            };
            if !habit.is_eligible(day) {
                log::info!("toggling {day}, which is not an eligible day for '{}'", habit.name);
            }
            let completed = db.toggle_completion(&id, day)?;
            println!(
                "{} {} on {day}",
                habit.name,
                if completed { "completed" } else { "unmarked" }
            );
        }
        HabitAction::Streak { id, as_of } => {
            let habit = db.get_habit(&id)?.ok_or(format!("Habit not found: {id}"))?;
            let as_of = match as_of {
                Some(s) => parse_date(&s)?,
                None => today(),
            };
            let entries = db.completions_for(&id)?;
            let index = CompletionIndex::from_entries(&entries);
            let summary = compute_streaks(&habit, &index, as_of);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        HabitAction::Stats { id, month } => {
            let habit = db.get_habit(&id)?.ok_or(format!("Habit not found: {id}"))?;
            let (year, month) = match month {
                Some(s) => parse_month(&s)?,
                None => {
                    let now = today();
                    use chrono::Datelike;
                    (now.year(), now.month())
                }
            };
            let entries = db.completions_for(&id)?;
            let index = CompletionIndex::from_entries(&entries);
            let stats = compute_month_stats(&habit, &index, year, month)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
