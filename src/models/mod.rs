pub mod project;
pub mod status;
pub mod task;

pub use project::*;
pub use status::*;
pub use task::*;
