use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::api::BoardApi;
use crate::error::{ApiError, StoreError, StoreResult};
use crate::messages;
use crate::models::{ProjectId, Task, TaskFilters, TaskId, TaskPayload};
use crate::notifier::Notifier;
use crate::stores::{StateCell, StoreSettings, StoreState};

/// Full record for `PUT`: the local task's fields overlaid with `partial`.
///
/// Without a local task the record is just the partial payload.
pub fn merge_task_record(existing: Option<&Task>, partial: &TaskPayload) -> Value {
    let mut record = match existing.map(serde_json::to_value) {
        Some(Ok(Value::Object(fields))) => fields,
        _ => Map::new(),
    };
    if let Ok(Value::Object(fields)) = serde_json::to_value(partial) {
        record.extend(fields);
    }
    Value::Object(record)
}

/// Owns the tasks of the project currently on screen.
///
/// Filtering is done by the server; the store keeps whatever it returns.
pub struct TasksStore {
    api: Arc<dyn BoardApi>,
    notifier: Arc<dyn Notifier>,
    settings: StoreSettings,
    state: StateCell<Task>,
}

impl TasksStore {
    pub fn new(api: Arc<dyn BoardApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_settings(api, notifier, StoreSettings::default())
    }

    pub fn with_settings(
        api: Arc<dyn BoardApi>,
        notifier: Arc<dyn Notifier>,
        settings: StoreSettings,
    ) -> Self {
        Self {
            api,
            notifier,
            settings,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> StoreState<Task> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<Task>> {
        self.state.subscribe()
    }

    /// Load the tasks of `project_id` matching `filters`, replacing `items`
    pub async fn fetch_all(&self, project_id: ProjectId, filters: &TaskFilters) -> StoreResult<()> {
        let guard = self.state.begin_fetch();
        let result = self.api.list_tasks(project_id, filters).await;

        if guard.is_stale() {
            tracing::debug!(
                project_id,
                token = guard.token(),
                "Discarding stale tasks response"
            );
            return Ok(());
        }

        match result {
            Ok(tasks) => {
                tracing::debug!(project_id, count = tasks.len(), "Tasks loaded");
                self.state.modify(|state| state.items = tasks);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(project_id, error = ?err, "Failed to load tasks");
                let message = err.message_or(messages::TASKS_LOAD_FAILED);
                self.state.modify(|state| state.error = Some(message.clone()));
                self.settings
                    .fetch_errors
                    .apply(StoreError::Rejected(message), ())
            }
        }
    }

    pub async fn fetch_by_id(&self, project_id: ProjectId, id: TaskId) -> StoreResult<Task> {
        self.api
            .get_task(project_id, id)
            .await
            .map_err(|err| self.reject(err, messages::TASK_LOAD_FAILED))
    }

    /// Create a task and append it to `items`
    pub async fn create(&self, project_id: ProjectId, payload: &TaskPayload) -> StoreResult<Task> {
        match self.api.create_task(project_id, payload).await {
            Ok(task) => {
                tracing::info!(project_id, task_id = task.id, "Task created");
                let created = task.clone();
                self.state.modify(|state| state.items.push(created));
                self.notifier.success(messages::TASK_CREATED);
                Ok(task)
            }
            Err(err) => Err(self.reject(err, messages::TASK_CREATE_FAILED)),
        }
    }

    /// Send the local task merged with `partial`.
    ///
    /// Local `items` are not patched with the response.
    pub async fn update(
        &self,
        project_id: ProjectId,
        id: TaskId,
        partial: &TaskPayload,
    ) -> StoreResult<Task> {
        let record = self.state.read(|state| {
            let existing = state.items.iter().find(|t| t.id == id);
            if existing.is_none() {
                tracing::debug!(task_id = id, "No local task to merge, sending partial payload");
            }
            merge_task_record(existing, partial)
        });

        match self.api.update_task(project_id, id, &record).await {
            Ok(task) => {
                tracing::info!(project_id, task_id = id, "Task updated");
                self.notifier.info(messages::TASK_UPDATED);
                Ok(task)
            }
            Err(err) => Err(self.reject(err, messages::TASK_UPDATE_FAILED)),
        }
    }

    /// Drop a task from local `items` without calling the server
    pub fn evict(&self, id: TaskId) {
        self.state.modify(|state| state.items.retain(|t| t.id != id));
    }

    /// Notify and normalize a failed call
    fn reject(&self, err: ApiError, fallback: &str) -> StoreError {
        tracing::error!(error = ?err, "Task request failed");
        let message = err.message_or(fallback);
        self.notifier.error(&message);
        StoreError::Rejected(message)
    }
}
