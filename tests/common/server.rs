use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use taskboard_client::models::{Project, ProjectPayload, Status, Task, TaskPayload};

/// A request as seen by the mock server
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    failure: Option<(StatusCode, Option<String>)>,
    received: Vec<ReceivedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

/// Board REST API stand-in served on an ephemeral local port
pub struct MockBoardServer {
    pub base_url: String,
    state: SharedState,
}

#[allow(dead_code)]
impl MockBoardServer {
    pub async fn start(projects: Vec<Project>, tasks: Vec<Task>) -> Self {
        let state = Arc::new(Mutex::new(MockState {
            projects,
            tasks,
            ..Default::default()
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Mock server has no address");
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Answer the next request with `status` and an optional `{"message": ...}` body
    pub async fn fail_next(&self, status: StatusCode, message: Option<&str>) {
        self.state.lock().await.failure = Some((status, message.map(str::to_string)));
    }

    pub async fn received(&self) -> Vec<ReceivedRequest> {
        self.state.lock().await.received.clone()
    }

    pub async fn last_request(&self) -> ReceivedRequest {
        self.received()
            .await
            .pop()
            .expect("Mock server received no request")
    }

    pub async fn projects(&self) -> Vec<Project> {
        self.state.lock().await.projects.clone()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.clone()
    }

    /// Drop a project server-side, as another client would
    pub async fn forget_project(&self, id: i64) {
        self.state.lock().await.projects.retain(|p| p.id != id);
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/projects/", get(list_projects))
        .route("/projects", post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/{project_id}/tasks", get(list_tasks).post(create_task))
        .route("/projects/{project_id}/tasks/{id}", get(get_task).put(update_task))
        .layer(middleware::from_fn_with_state(state.clone(), record_and_fail))
        .with_state(state)
}

/// Log every request and serve a scripted failure if one is pending
async fn record_and_fail(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let failure = {
        let mut state = state.lock().await;
        state.received.push(ReceivedRequest {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            body: serde_json::from_slice(&bytes).ok(),
        });
        state.failure.take()
    };

    match failure {
        Some((status, Some(message))) => (status, Json(json!({ "message": message }))).into_response(),
        Some((status, None)) => status.into_response(),
        None => next.run(Request::from_parts(parts, Body::from(bytes))).await,
    }
}

fn not_found(resource: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{} not found", resource) })),
    )
        .into_response()
}

async fn list_projects(State(state): State<SharedState>) -> Json<Vec<Project>> {
    Json(state.lock().await.projects.clone())
}

async fn get_project(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, Response> {
    let state = state.lock().await;
    state
        .projects
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Project"))
}

async fn create_project(
    State(state): State<SharedState>,
    Json(payload): Json<ProjectPayload>,
) -> Json<Project> {
    let mut state = state.lock().await;
    let id = state.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
    let project = Project {
        id,
        name: payload.name,
        description: Some(payload.description),
        tasks_count: Some(0),
        status: payload.status.parse().ok(),
        created_at: Some("1760000000".to_string()),
    };
    state.projects.push(project.clone());
    Json(project)
}

async fn update_project(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProjectPayload>,
) -> Result<Json<Project>, Response> {
    let mut state = state.lock().await;
    let project = state
        .projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found("Project"))?;
    project.name = payload.name;
    project.description = Some(payload.description);
    project.status = payload.status.parse().ok();
    Ok(Json(project.clone()))
}

async fn delete_project(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().await;
    let before = state.projects.len();
    state.projects.retain(|p| p.id != id);
    if state.projects.len() == before {
        return not_found("Project");
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Deserialize)]
struct TaskQuery {
    performer: Option<String>,
    status: Option<Status>,
}

async fn list_tasks(
    State(state): State<SharedState>,
    Path(project_id): Path<i64>,
    Query(query): Query<TaskQuery>,
) -> Json<Vec<Task>> {
    let state = state.lock().await;
    Json(
        state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .filter(|t| query.performer.as_ref().map_or(true, |p| &t.performer == p))
            .filter(|t| query.status.map_or(true, |s| t.status == s))
            .cloned()
            .collect(),
    )
}

async fn get_task(
    State(state): State<SharedState>,
    Path((project_id, id)): Path<(i64, i64)>,
) -> Result<Json<Task>, Response> {
    let state = state.lock().await;
    state
        .tasks
        .iter()
        .find(|t| t.project_id == project_id && t.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Task"))
}

async fn create_task(
    State(state): State<SharedState>,
    Path(project_id): Path<i64>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<Task>, Response> {
    let (Some(name), Some(status), Some(deadline)) =
        (payload.name, payload.status, payload.deadline)
    else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "name, status and deadline are required" })),
        )
            .into_response());
    };

    let mut state = state.lock().await;
    let id = state.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
    let task = Task {
        id,
        project_id,
        name,
        performer: payload.performer.unwrap_or_default(),
        status,
        deadline,
    };
    state.tasks.push(task.clone());
    Ok(Json(task))
}

/// Requires the complete record, like the real API
async fn update_task(
    State(state): State<SharedState>,
    Path((project_id, id)): Path<(i64, i64)>,
    Json(record): Json<Task>,
) -> Result<Json<Task>, Response> {
    let mut state = state.lock().await;
    let task = state
        .tasks
        .iter_mut()
        .find(|t| t.project_id == project_id && t.id == id)
        .ok_or_else(|| not_found("Task"))?;
    *task = Task {
        id,
        project_id,
        ..record
    };
    Ok(Json(task.clone()))
}
