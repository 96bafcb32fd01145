//! Application layer error types

use std::path::PathBuf;

use thiserror::Error;

use crate::infrastructure::templates::TemplateError;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Invalid project name: {0:?}")]
    InvalidProjectName(String),

    #[error("Project directory {} already exists (use --force to overwrite)", .0.display())]
    ProjectExists(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    TemplateError(#[from] TemplateError),

    #[error(transparent)]
    CoreError(#[from] crate::core::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No project metadata found at {}", .0.display())]
    MetadataNotFound(PathBuf),
}

impl ApplicationError {
    /// Template validation errors carried by this error, if any
    pub fn validation_errors(&self) -> &[String] {
        match self {
            ApplicationError::TemplateError(e) => e.validation_errors(),
            _ => &[],
        }
    }
}
