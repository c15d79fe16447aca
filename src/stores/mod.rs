pub mod projects;
pub mod tasks;

pub use projects::{ProjectFilters, ProjectsStore, SortBy};
pub use tasks::TasksStore;

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::error::{StoreError, StoreResult};

/// Observable state of a store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// What an operation does with a failure after recording it in `error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return the failure to the caller
    Propagate,
    /// Report success to the caller; the failure is only visible in state
    #[default]
    Swallow,
}

impl ErrorPolicy {
    pub(crate) fn apply<T>(self, err: StoreError, swallowed: T) -> StoreResult<T> {
        match self {
            ErrorPolicy::Propagate => Err(err),
            ErrorPolicy::Swallow => Ok(swallowed),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "swallow" => Ok(Self::Swallow),
            other => Err(format!("unknown error policy `{}`", other)),
        }
    }
}

/// Per-operation error policies for the operations that record failures in state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSettings {
    /// `fetch_all` on both stores
    pub fetch_errors: ErrorPolicy,
    /// `ProjectsStore::create`
    pub project_create_errors: ErrorPolicy,
}

/// Shared state cell publishing every change to subscribers
pub(crate) struct StateCell<T> {
    tx: watch::Sender<StoreState<T>>,
    sequence: AtomicU64,
}

impl<T: Clone> StateCell<T> {
    pub fn new() -> Self {
        Self {
            tx: watch::Sender::new(StoreState::default()),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> StoreState<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.tx.subscribe()
    }

    pub fn read<R>(&self, f: impl FnOnce(&StoreState<T>) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn modify(&self, f: impl FnOnce(&mut StoreState<T>)) {
        self.tx.send_modify(f);
    }

    /// Start a full fetch: take a new request token, set `loading` and clear `error`.
    ///
    /// `loading` is cleared when the returned guard drops, unless a newer fetch
    /// has started since.
    pub fn begin_fetch(&self) -> FetchGuard<'_, T> {
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.modify(|state| {
            state.loading = true;
            state.error = None;
        });
        FetchGuard { cell: self, token }
    }

    fn is_latest(&self, token: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == token
    }
}

pub(crate) struct FetchGuard<'a, T: Clone> {
    cell: &'a StateCell<T>,
    token: u64,
}

impl<T: Clone> FetchGuard<'_, T> {
    /// Whether a newer fetch was issued after this one
    pub fn is_stale(&self) -> bool {
        !self.cell.is_latest(self.token)
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

impl<T: Clone> Drop for FetchGuard<'_, T> {
    fn drop(&mut self) {
        if self.cell.is_latest(self.token) {
            self.cell.modify(|state| state.loading = false);
        }
    }
}
