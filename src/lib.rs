// Library crate for the task board client
// State stores, API client and form validation used by the CLI and tests

pub mod api;
pub mod config;
pub mod error;
pub mod messages;
pub mod models;
pub mod notifier;
pub mod state;
pub mod stores;
pub mod validators;

pub use error::{ApiError, StoreError, StoreResult};
pub use state::Board;
