use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::api::{ApiResult, BoardApi};
use crate::error::ApiError;
use crate::models::{
    Project, ProjectId, ProjectPayload, Task, TaskFilters, TaskId, TaskPayload,
};

/// API call kinds, used to script failures and delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListProjects,
    GetProject,
    CreateProject,
    UpdateProject,
    DeleteProject,
    ListTasks,
    GetTask,
    CreateTask,
    UpdateTask,
}

/// A request received by [`InMemoryBoardApi`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub operation: Operation,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// In-memory board API for tests and offline use
#[derive(Clone, Default)]
pub struct InMemoryBoardApi {
    inner: Arc<Mutex<InMemoryBoardInner>>,
}

#[derive(Default)]
struct InMemoryBoardInner {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    next_project_id: ProjectId,
    next_task_id: TaskId,
    failures: HashMap<Operation, ApiError>,
    delays: HashMap<Operation, Vec<Duration>>,
    requests: Vec<RecordedRequest>,
}

impl InMemoryBoardApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the server with existing projects
    pub async fn with_projects(self, projects: Vec<Project>) -> Self {
        {
            let mut inner = self.inner.lock().await;
            for project in projects {
                inner.next_project_id = inner.next_project_id.max(project.id);
                inner.projects.push(project);
            }
        }
        self
    }

    /// Seed the server with existing tasks
    pub async fn with_tasks(self, tasks: Vec<Task>) -> Self {
        {
            let mut inner = self.inner.lock().await;
            for task in tasks {
                inner.next_task_id = inner.next_task_id.max(task.id);
                inner.tasks.push(task);
            }
        }
        self
    }

    /// Make the next call of `operation` fail with `error`
    pub async fn fail_next(&self, operation: Operation, error: ApiError) {
        self.inner.lock().await.failures.insert(operation, error);
    }

    /// Delay the next call of `operation` before it reads server state.
    ///
    /// Queued delays are consumed in call order.
    pub async fn delay_next(&self, operation: Operation, delay: Duration) {
        self.inner
            .lock()
            .await
            .delays
            .entry(operation)
            .or_default()
            .push(delay);
    }

    /// Every request received so far, in arrival order
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().await.requests.clone()
    }

    /// Current server-side projects
    pub async fn projects(&self) -> Vec<Project> {
        self.inner.lock().await.projects.clone()
    }

    /// Current server-side tasks
    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.lock().await.tasks.clone()
    }

    /// Record the request, apply any scripted delay, and return a scripted failure
    async fn begin(
        &self,
        operation: Operation,
        path: String,
        body: Option<serde_json::Value>,
    ) -> ApiResult<()> {
        let delay = {
            let mut inner = self.inner.lock().await;
            inner.requests.push(RecordedRequest {
                operation,
                path,
                body,
            });
            inner.delays.get_mut(&operation).and_then(|queue| {
                if queue.is_empty() {
                    None
                } else {
                    Some(queue.remove(0))
                }
            })
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.inner.lock().await.failures.remove(&operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found(resource: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: Some(format!("{} not found", resource)),
    }
}

fn apply_task_payload(task: &mut Task, payload: TaskPayload) {
    if let Some(name) = payload.name {
        task.name = name;
    }
    if let Some(performer) = payload.performer {
        task.performer = performer;
    }
    if let Some(status) = payload.status {
        task.status = status;
    }
    if let Some(deadline) = payload.deadline {
        task.deadline = deadline;
    }
}

#[async_trait]
impl BoardApi for InMemoryBoardApi {
    async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.begin(Operation::ListProjects, "/projects/".to_string(), None)
            .await?;
        Ok(self.inner.lock().await.projects.clone())
    }

    async fn get_project(&self, id: ProjectId) -> ApiResult<Project> {
        self.begin(Operation::GetProject, format!("/projects/{}", id), None)
            .await?;
        let inner = self.inner.lock().await;
        inner
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("Project"))
    }

    async fn create_project(&self, payload: &ProjectPayload) -> ApiResult<Project> {
        let body = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.begin(Operation::CreateProject, "/projects".to_string(), Some(body))
            .await?;

        let mut inner = self.inner.lock().await;
        inner.next_project_id += 1;
        let project = Project {
            id: inner.next_project_id,
            name: payload.name.clone(),
            description: Some(payload.description.clone()),
            tasks_count: Some(0),
            status: payload.status.parse().ok(),
            created_at: Some(time::OffsetDateTime::now_utc().unix_timestamp().to_string()),
        };
        inner.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: ProjectId,
        payload: &ProjectPayload,
    ) -> ApiResult<Project> {
        let body = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.begin(Operation::UpdateProject, format!("/projects/{}", id), Some(body))
            .await?;

        let mut inner = self.inner.lock().await;
        let project = inner
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Project"))?;
        project.name = payload.name.clone();
        project.description = Some(payload.description.clone());
        project.status = payload.status.parse().ok();
        Ok(project.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> ApiResult<()> {
        self.begin(Operation::DeleteProject, format!("/projects/{}", id), None)
            .await?;

        let mut inner = self.inner.lock().await;
        let before = inner.projects.len();
        inner.projects.retain(|p| p.id != id);
        if inner.projects.len() == before {
            return Err(not_found("Project"));
        }
        inner.tasks.retain(|t| t.project_id != id);
        Ok(())
    }

    async fn list_tasks(
        &self,
        project_id: ProjectId,
        filters: &TaskFilters,
    ) -> ApiResult<Vec<Task>> {
        let query = filters
            .query_params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let mut path = format!("/projects/{}/tasks", project_id);
        if !query.is_empty() {
            path = format!("{}?{}", path, query);
        }
        self.begin(Operation::ListTasks, path, None).await?;

        let performer = filters.performer.as_deref().filter(|p| !p.is_empty());
        let inner = self.inner.lock().await;
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .filter(|t| performer.map_or(true, |p| t.performer == p))
            .filter(|t| filters.status.map_or(true, |s| t.status == s))
            .cloned()
            .collect())
    }

    async fn get_task(&self, project_id: ProjectId, id: TaskId) -> ApiResult<Task> {
        self.begin(
            Operation::GetTask,
            format!("/projects/{}/tasks/{}", project_id, id),
            None,
        )
        .await?;

        let inner = self.inner.lock().await;
        inner
            .tasks
            .iter()
            .find(|t| t.project_id == project_id && t.id == id)
            .cloned()
            .ok_or_else(|| not_found("Task"))
    }

    async fn create_task(&self, project_id: ProjectId, payload: &TaskPayload) -> ApiResult<Task> {
        let body = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.begin(
            Operation::CreateTask,
            format!("/projects/{}/tasks", project_id),
            Some(body),
        )
        .await?;

        let (Some(name), Some(status), Some(deadline)) = (
            payload.name.clone(),
            payload.status,
            payload.deadline.clone(),
        ) else {
            return Err(ApiError::Status {
                status: 400,
                message: Some("name, status and deadline are required".to_string()),
            });
        };

        let mut inner = self.inner.lock().await;
        if !inner.projects.iter().any(|p| p.id == project_id) {
            return Err(not_found("Project"));
        }
        inner.next_task_id += 1;
        let task = Task {
            id: inner.next_task_id,
            project_id,
            name,
            performer: payload.performer.clone().unwrap_or_default(),
            status,
            deadline,
        };
        inner.tasks.push(task.clone());
        if let Some(project) = inner.projects.iter_mut().find(|p| p.id == project_id) {
            project.tasks_count = Some(project.tasks_count.unwrap_or(0) + 1);
        }
        Ok(task)
    }

    async fn update_task(
        &self,
        project_id: ProjectId,
        id: TaskId,
        record: &serde_json::Value,
    ) -> ApiResult<Task> {
        self.begin(
            Operation::UpdateTask,
            format!("/projects/{}/tasks/{}", project_id, id),
            Some(record.clone()),
        )
        .await?;

        let payload: TaskPayload =
            serde_json::from_value(record.clone()).map_err(|e| ApiError::Status {
                status: 400,
                message: Some(e.to_string()),
            })?;

        let mut inner = self.inner.lock().await;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.project_id == project_id && t.id == id)
            .ok_or_else(|| not_found("Task"))?;
        apply_task_payload(task, payload);
        Ok(task.clone())
    }
}
