//! Project management commands for CLI.

use clap::Subcommand;
use habitloom_core::storage::PlannerDb;
use habitloom_core::task::Project;

use super::parse_date;

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List projects
    List,
    /// Delete a project (tasks are detached, not deleted)
    Delete {
        /// Project ID
        id: String,
    },
}

pub fn run(action: ProjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        ProjectAction::Create { name, deadline } => {
            let mut project = Project::new(name);
            if let Some(s) = deadline {
                project.deadline = Some(parse_date(&s)?);
            }
            db.create_project(&project)?;
            println!("Project created: {}", project.id);
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectAction::List => {
            let projects = db.list_projects()?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        ProjectAction::Delete { id } => {
            if db.delete_project(&id)? {
                println!("Project deleted: {id}");
            } else {
                println!("Project not found: {id}");
            }
        }
    }
    Ok(())
}
