//! Task management commands for CLI.

use clap::Subcommand;
use habitloom_core::storage::PlannerDb;
use habitloom_core::task::{reorder, Column, Quadrant, Task};

use super::parse_date;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task notes
        #[arg(long)]
        notes: Option<String>,
        /// Eisenhower quadrant: do, schedule, delegate or drop
        #[arg(long, default_value = "schedule")]
        quadrant: String,
        /// Kanban column (default: backlog)
        #[arg(long, default_value = "backlog")]
        column: String,
        /// Project ID to associate with
        #[arg(long)]
        project_id: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due_date: Option<String>,
    },
    /// List tasks
    List {
        /// Filter by column
        #[arg(long)]
        column: Option<String>,
        /// Filter by quadrant
        #[arg(long)]
        quadrant: Option<String>,
        /// Filter by project ID
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
        /// New quadrant
        #[arg(long)]
        quadrant: Option<String>,
        /// New project ID
        #[arg(long)]
        project_id: Option<String>,
        /// New due date, YYYY-MM-DD
        #[arg(long)]
        due_date: Option<String>,
    },
    /// Move a task to a column position
    Move {
        /// Task ID
        id: String,
        /// Target column
        #[arg(long)]
        column: String,
        /// Target index within the column (default: end)
        #[arg(long)]
        index: Option<usize>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

/// Ordered task ids for one column.
fn column_order(tasks: &[Task], column: Column) -> Vec<String> {
    let mut in_column: Vec<&Task> = tasks.iter().filter(|t| t.column == column).collect();
    in_column.sort_by_key(|t| t.position);
    in_column.iter().map(|t| t.id.clone()).collect()
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = PlannerDb::open()?;

    match action {
        TaskAction::Create {
            title,
            notes,
            quadrant,
            column,
            project_id,
            due_date,
        } => {
            let mut task = Task::new(title);
            task.notes = notes;
            task.quadrant = quadrant.parse::<Quadrant>()?;
            task.column = column.parse::<Column>()?;
            task.project_id = project_id;
            if let Some(s) = due_date {
                task.due_date = Some(parse_date(&s)?);
            }
            // Append to the end of the target column.
            let order = column_order(&db.list_tasks()?, task.column);
            task.position = order.len() as i64 * reorder::POSITION_STEP;
            task.validate()?;
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List {
            column,
            quadrant,
            project_id,
        } => {
            let column = column.map(|s| s.parse::<Column>()).transpose()?;
            let quadrant = quadrant.map(|s| s.parse::<Quadrant>()).transpose()?;
            let filtered: Vec<Task> = db
                .list_tasks()?
                .into_iter()
                .filter(|task| {
                    if let Some(c) = column {
                        if task.column != c {
                            return false;
                        }
                    }
                    if let Some(q) = quadrant {
                        if task.quadrant != q {
                            return false;
                        }
                    }
                    if let Some(ref pid) = project_id {
                        if task.project_id.as_ref() != Some(pid) {
                            return false;
                        }
                    }
                    true
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        TaskAction::Get { id } => match db.get_task(&id)? {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => println!("Task not found: {id}"),
        },
        TaskAction::Update {
            id,
            title,
            notes,
            quadrant,
            project_id,
            due_date,
        } => {
            let mut task = db.get_task(&id)?.ok_or(format!("Task not found: {id}"))?;

            if let Some(t) = title {
                task.title = t;
            }
            if let Some(n) = notes {
                task.notes = Some(n);
            }
            if let Some(q) = quadrant {
                task.quadrant = q.parse::<Quadrant>()?;
            }
            if let Some(p) = project_id {
                task.project_id = Some(p);
            }
            if let Some(s) = due_date {
                task.due_date = Some(parse_date(&s)?);
            }
            task.updated_at = chrono::Utc::now();
            task.validate()?;
            db.update_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Move { id, column, index } => {
            let mut task = db.get_task(&id)?.ok_or(format!("Task not found: {id}"))?;
            let target = column.parse::<Column>()?;
            let tasks = db.list_tasks()?;

            let source_order = column_order(&tasks, task.column);
            let mut assignments: Vec<(String, Column, i64)> = Vec::new();

            if target == task.column {
                let to_index = index.unwrap_or(source_order.len());
                let new_order = reorder::reorder_within(&source_order, &id, to_index)
                    .ok_or(format!("Task not in its column: {id}"))?;
                for (task_id, position) in reorder::assign_positions(&new_order) {
                    assignments.push((task_id, target, position));
                }
            } else {
                let dest_order = column_order(&tasks, target);
                let to_index = index.unwrap_or(dest_order.len());
                let (new_source, new_dest) =
                    reorder::move_between(&source_order, &dest_order, &id, to_index)
                        .ok_or(format!("Task not in its column: {id}"))?;
                for (task_id, position) in reorder::assign_positions(&new_source) {
                    assignments.push((task_id, task.column, position));
                }
                for (task_id, position) in reorder::assign_positions(&new_dest) {
                    assignments.push((task_id, target, position));
                }
            }
            db.apply_positions(&assignments)?;

            // Maintain the completion timestamp on column change; move_to
            // needs the pre-move column, so run it on the stale copy.
            let now = chrono::Utc::now();
            task.move_to(target, now);
            let mut moved = db.get_task(&id)?.ok_or(format!("Task not found: {id}"))?;
            moved.completed_at = task.completed_at;
            moved.updated_at = now;
            db.update_task(&moved)?;

            println!("{}", serde_json::to_string_pretty(&moved)?);
        }
        TaskAction::Delete { id } => {
            if db.delete_task(&id)? {
                println!("Task deleted: {id}");
            } else {
                println!("Task not found: {id}");
            }
        }
    }
    Ok(())
}
