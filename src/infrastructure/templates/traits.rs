//! Template repository traits for the infrastructure layer

use std::path::{Path, PathBuf};

use crate::infrastructure::templates::{TemplateDocument, TemplateError, TemplateListing};

/// Access to installed templates
///
/// Used by the `init` use case to load templates and by the CLI for
/// `templates list|show|import`.
pub trait TemplateRepository {
    /// Load, validate and convert the template called `name`
    fn load(&self, name: &str) -> Result<TemplateDocument, TemplateError>;

    /// List every template file, including ones that fail to parse
    fn list(&self) -> Result<Vec<TemplateListing>, TemplateError>;

    /// Validate the file at `source` and install it; returns the installed
    /// template name and destination
    fn import(&self, source: &Path) -> Result<(String, PathBuf), TemplateError>;
}
