//! taskboard - command-line front end for the task board API

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskboard_client::config::{Config, LogFormat};
use taskboard_client::models::{Project, ProjectId, Status, Task, TaskFilters, TaskId, TaskPayload};
use taskboard_client::notifier::TracingNotifier;
use taskboard_client::stores::{ProjectFilters, SortBy};
use taskboard_client::validators::{
    local_offset, parse_deadline, parse_status, today, validate_task_name, ProjectForm, TaskForm,
};
use taskboard_client::Board;

#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Projects ===
    /// List projects
    Projects {
        /// Case-insensitive name filter
        #[arg(long)]
        name: Option<String>,
        /// Exact status ("To do", "In Progress", "Done")
        #[arg(long)]
        status: Option<Status>,
        /// id, name, tasks_count or created_at
        #[arg(long)]
        sort_by: Option<String>,
    },

    /// Show one project
    Project { id: ProjectId },

    /// Create a project
    CreateProject {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "To do")]
        status: String,
    },

    /// Replace a project
    UpdateProject {
        id: ProjectId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "To do")]
        status: String,
    },

    /// Delete a project
    DeleteProject { id: ProjectId },

    // === Tasks ===
    /// List tasks of a project
    Tasks {
        project_id: ProjectId,
        #[arg(long)]
        performer: Option<String>,
        #[arg(long)]
        status: Option<Status>,
    },

    /// Show one task
    Task { project_id: ProjectId, id: TaskId },

    /// Create a task
    CreateTask {
        project_id: ProjectId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        performer: Option<String>,
        #[arg(long, default_value = "To do")]
        status: String,
        /// YYYY-MM-DD or RFC 3339
        #[arg(long)]
        deadline: String,
    },

    /// Change some fields of a task
    UpdateTask {
        project_id: ProjectId,
        id: TaskId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        performer: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn print_project(project: &Project) {
    println!(
        "#{:<4} {:<32} {:<12} tasks={:<4} created={}",
        project.id,
        project.name,
        project.status.map(|s| s.as_str()).unwrap_or("-"),
        project.tasks_count.unwrap_or(0),
        project.created_at.as_deref().unwrap_or("-"),
    );
}

fn print_task(task: &Task) {
    println!(
        "#{:<4} {:<32} {:<12} {:<16} due {}",
        task.id, task.name, task.status, task.performer, task.deadline,
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    let board = Board::from_config(&config, Arc::new(TracingNotifier))
        .context("Failed to create API client")?;

    match cli.command {
        Commands::Projects {
            name,
            status,
            sort_by,
        } => {
            let sort_by = sort_by.as_deref().and_then(|key| {
                let parsed = SortBy::from_key(key);
                if parsed.is_none() {
                    tracing::warn!(sort_by = %key, "Unknown sort key, leaving server order");
                }
                parsed
            });
            let filters = ProjectFilters {
                name,
                status,
                sort_by,
            };
            board.projects.fetch_all(&filters).await?;

            let state = board.projects.snapshot();
            if let Some(error) = state.error {
                bail!("Failed to load projects: {}", error);
            }
            state.items.iter().for_each(print_project);
        }

        Commands::Project { id } => {
            print_project(&board.projects.fetch_by_id(id).await?);
        }

        Commands::CreateProject {
            name,
            description,
            status,
        } => {
            let payload = ProjectForm {
                name,
                description,
                status,
            }
            .into_payload()?;

            match board.projects.create(&payload).await? {
                Some(project) => print_project(&project),
                None => bail!(
                    "Project was not created: {}",
                    board.projects.snapshot().error.unwrap_or_default()
                ),
            }
        }

        Commands::UpdateProject {
            id,
            name,
            description,
            status,
        } => {
            let payload = ProjectForm {
                name,
                description,
                status,
            }
            .into_payload()?;
            print_project(&board.projects.update(id, &payload).await?);
        }

        Commands::DeleteProject { id } => {
            board.projects.remove(id).await?;
            board.projects.evict(id);
        }

        Commands::Tasks {
            project_id,
            performer,
            status,
        } => {
            let filters = TaskFilters { performer, status };
            board.tasks.fetch_all(project_id, &filters).await?;

            let state = board.tasks.snapshot();
            if let Some(error) = state.error {
                bail!("Failed to load tasks: {}", error);
            }
            state.items.iter().for_each(print_task);
        }

        Commands::Task { project_id, id } => {
            print_task(&board.tasks.fetch_by_id(project_id, id).await?);
        }

        Commands::CreateTask {
            project_id,
            name,
            performer,
            status,
            deadline,
        } => {
            let payload = TaskForm {
                name,
                performer,
                status,
                deadline: deadline.into(),
            }
            .validate()?
            .into_payload(project_id);
            print_task(&board.tasks.create(project_id, &payload).await?);
        }

        Commands::UpdateTask {
            project_id,
            id,
            name,
            performer,
            status,
            deadline,
        } => {
            // Only the fields given are checked and sent
            if let Some(name) = &name {
                validate_task_name(name)?;
            }
            let status = status.as_deref().map(parse_status).transpose()?;
            let deadline = deadline
                .map(|d| parse_deadline(&d.into(), today(), local_offset()))
                .transpose()?
                .map(|d| d.to_string());

            // The merge needs the task in the local collection
            board
                .tasks
                .fetch_all(project_id, &TaskFilters::default())
                .await?;

            let partial = TaskPayload {
                name,
                performer,
                project_id: None,
                status,
                deadline,
            };
            print_task(&board.tasks.update(project_id, id, &partial).await?);
        }
    }

    Ok(())
}
