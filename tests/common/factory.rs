use taskboard_client::models::{Project, ProjectId, Status, Task, TaskId};

/// Sample board data
pub struct Factory;

#[allow(dead_code)]
impl Factory {
    pub fn project(id: ProjectId, name: &str) -> Project {
        Project {
            id,
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            tasks_count: Some(0),
            status: Some(Status::ToDo),
            created_at: Some(format!("{}", 1_700_000_000 + id)),
        }
    }

    pub fn task(id: TaskId, project_id: ProjectId, name: &str, performer: &str) -> Task {
        Task {
            id,
            project_id,
            name: name.to_string(),
            performer: performer.to_string(),
            status: Status::ToDo,
            deadline: "2030-01-15".to_string(),
        }
    }

    /// Three projects, two of them with "API" in the name
    pub fn projects() -> Vec<Project> {
        vec![
            Project {
                tasks_count: Some(5),
                status: Some(Status::InProgress),
                ..Self::project(1, "Zeta API")
            },
            Project {
                tasks_count: Some(1),
                status: Some(Status::Done),
                ..Self::project(2, "Alpha")
            },
            Project {
                tasks_count: Some(3),
                status: Some(Status::InProgress),
                ..Self::project(3, "Beta API")
            },
        ]
    }

    /// Tasks spread over projects 1 and 3
    pub fn tasks() -> Vec<Task> {
        vec![
            Self::task(1, 1, "Design endpoints", "Ira"),
            Task {
                status: Status::InProgress,
                ..Self::task(2, 1, "Write handlers", "Max")
            },
            Self::task(3, 1, "Review handlers", "Ira"),
            Self::task(4, 3, "Plan beta", "Olena"),
        ]
    }
}
