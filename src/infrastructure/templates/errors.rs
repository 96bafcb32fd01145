//! Error types for the template infrastructure layer

use thiserror::Error;

/// Errors that can occur in template operations
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template not found in the templates directory
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The document parsed but violates the template schema
    #[error("Invalid template: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// IO error during template operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Generic template error
    #[error("Template error: {0}")]
    Other(String),
}

impl TemplateError {
    /// Create a new template not found error
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::TemplateNotFound(name.into())
    }

    /// Validation messages, when this is a schema error
    pub fn validation_errors(&self) -> &[String] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}
