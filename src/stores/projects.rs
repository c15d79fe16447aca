//! Projects store.
//!
//! The server always returns the full collection; sorting and filtering
//! happen here, in a fixed order: sort, then name filter, then status filter.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use once_cell::sync::Lazy;
use tokio::sync::watch;

use crate::api::BoardApi;
use crate::error::{StoreError, StoreResult};
use crate::messages;
use crate::models::{Project, ProjectId, ProjectPayload, Status};
use crate::notifier::Notifier;
use crate::stores::{StateCell, StoreSettings, StoreState};

/// Client-side sort key for the projects list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Id,
    Name,
    TasksCount,
    CreatedAt,
}

impl SortBy {
    /// Parse a sort key; unknown keys mean "no sort"
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "tasks_count" => Some(Self::TasksCount),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::TasksCount => "tasks_count",
            Self::CreatedAt => "created_at",
        }
    }

    /// Stable sort of `projects` by this key
    pub fn sort(&self, projects: &mut [Project]) {
        match self {
            Self::Id => projects.sort_by_key(|p| p.id),
            Self::Name => projects.sort_by(|a, b| compare_names(&a.name, &b.name)),
            Self::TasksCount => projects.sort_by_key(|p| p.tasks_count.unwrap_or(0)),
            Self::CreatedAt => projects.sort_by(|a, b| {
                compare_numeric(
                    numeric_value(a.created_at.as_deref()),
                    numeric_value(b.created_at.as_deref()),
                )
            }),
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("unknown sort key `{}`", s))
    }
}

// Root collation order (CLDR), covers Latin and Cyrillic names alike
static NAME_COLLATOR: Lazy<CollatorBorrowed<'static>> = Lazy::new(|| {
    Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
        .expect("compiled collation data is always available")
});

/// Locale-aware name order, code points as tiebreak for collation-equal names
fn compare_names(a: &str, b: &str) -> Ordering {
    NAME_COLLATOR.compare(a, b).then_with(|| a.cmp(b))
}

/// Numeric reading of a timestamp string. Blank counts as zero.
fn numeric_value(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    raw.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Ascending numbers first; unparseable values after them, in input order
fn compare_numeric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Query applied to the projects list after each fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilters {
    /// Case-insensitive substring of the project name
    pub name: Option<String>,
    /// Exact status match
    pub status: Option<Status>,
    pub sort_by: Option<SortBy>,
}

impl ProjectFilters {
    /// Sort, then filter by name, then filter by status
    pub fn apply(&self, mut projects: Vec<Project>) -> Vec<Project> {
        if let Some(sort_by) = self.sort_by {
            sort_by.sort(&mut projects);
        }

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            let needle = name.to_lowercase();
            projects.retain(|p| p.name.to_lowercase().contains(&needle));
        }

        if let Some(status) = self.status {
            projects.retain(|p| p.status == Some(status));
        }

        projects
    }
}

/// Owns the projects collection shown by the UI
pub struct ProjectsStore {
    api: Arc<dyn BoardApi>,
    notifier: Arc<dyn Notifier>,
    settings: StoreSettings,
    state: StateCell<Project>,
}

impl ProjectsStore {
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

    /// Current items, loading flag and error
    pub fn snapshot(&self) -> StoreState<Project> {
        self.state.snapshot()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<StoreState<Project>> {
        self.state.subscribe()
    }

    /// Reload the full collection and apply `filters` locally.
    ///
    /// A response that arrives after a newer `fetch_all` was issued is dropped.
    /// On failure the previous items stay and the message lands in `error`.
    pub async fn fetch_all(&self, filters: &ProjectFilters) -> StoreResult<()> {
        let guard = self.state.begin_fetch();
        let result = self.api.list_projects().await;

        if guard.is_stale() {
            tracing::debug!(token = guard.token(), "Discarding stale projects response");
            return Ok(());
        }

        match result {
            Ok(projects) => {
                let items = filters.apply(projects);
                tracing::debug!(count = items.len(), "Projects loaded");
                self.state.modify(|state| state.items = items);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to load projects");
                let message = err.to_string();
                self.state.modify(|state| state.error = Some(message));
                self.settings.fetch_errors.apply(err.into(), ())
            }
        }
    }

    /// Fetch one project without touching the store
    pub async fn fetch_by_id(&self, id: ProjectId) -> StoreResult<Project> {
        Ok(self.api.get_project(id).await?)
    }

    /// Create a project and append it to `items`.
    ///
    /// Failures are recorded in `error` and notified; with the default
    /// [`ErrorPolicy::Swallow`](crate::stores::ErrorPolicy::Swallow) this
    /// returns `Ok(None)` instead of an error.
    pub async fn create(&self, payload: &ProjectPayload) -> StoreResult<Option<Project>> {
        match self.api.create_project(payload).await {
            Ok(project) => {
                tracing::info!(project_id = project.id, "Project created");
                let created = project.clone();
                self.state.modify(|state| state.items.push(created));
                self.notifier.success(messages::PROJECT_CREATED);
                Ok(Some(project))
            }
            Err(err) => {
                tracing::error!(error = ?err, "Failed to create project");
                let message = err.to_string();
                self.state.modify(|state| state.error = Some(message));
                self.notifier.error(messages::PROJECT_SAVE_FAILED);
                self.settings.project_create_errors.apply(err.into(), None)
            }
        }
    }

    /// Replace a project on the server.
    ///
    /// Local `items` are left as they are until the next `fetch_all`.
    pub async fn update(&self, id: ProjectId, payload: &ProjectPayload) -> StoreResult<Project> {
        match self.api.update_project(id, payload).await {
            Ok(project) => {
                tracing::info!(project_id = id, "Project updated");
                self.notifier.success(messages::PROJECT_UPDATED);
                Ok(project)
            }
            Err(err) => {
                tracing::error!(project_id = id, error = ?err, "Failed to update project");
                self.notifier.error(messages::PROJECT_SAVE_FAILED);
                Err(StoreError::Rejected(
                    err.message_or(messages::PROJECT_UPDATE_FAILED),
                ))
            }
        }
    }

    /// Delete a project.
    ///
    /// The success notification goes out before the request is sent, so it is
    /// shown even when the delete fails.
    pub async fn remove(&self, id: ProjectId) -> StoreResult<()> {
        self.notifier.success(messages::PROJECT_DELETED);
        self.api.delete_project(id).await.map_err(|err| {
            tracing::error!(project_id = id, error = ?err, "Failed to delete project");
            StoreError::from(err)
        })
    }

    /// Drop a project from local `items` without calling the server
    pub fn evict(&self, id: ProjectId) {
        self.state.modify(|state| state.items.retain(|p| p.id != id));
    }
}
