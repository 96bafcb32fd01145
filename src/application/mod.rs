//! Application layer - orchestrates use cases and coordinates between domains

pub mod errors;
pub mod init_project;
pub mod project_metadata;
pub mod template_management;

pub use errors::*;
pub use init_project::*;
pub use project_metadata::*;
pub use template_management::*;
