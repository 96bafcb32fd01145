//! Project metadata record and project discovery
//!
//! Every initialized project carries a `.penlab.yaml` file at its root. The
//! record is written once after materialization and read back by the
//! `list-projects` and `info` commands.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::application::ApplicationError;
use crate::core::utils::scalar_to_string;
use crate::generation::VariableSet;
use crate::generation::variables::{AUTHOR, PROJECT_NAME, TARGET, YOUR_IP};

/// Well-known metadata file name at the project root
pub const METADATA_FILE: &str = ".penlab.yaml";

/// Timestamp format of the `created` field
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Project Metadata Record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub template: Option<String>,
    pub target: Option<String>,
    #[serde(rename = "your-ip")]
    pub your_ip: Option<String>,
    pub author: Option<String>,
    pub created: Option<String>,
    pub path: Option<String>,
}

impl ProjectMetadata {
    /// Record for a freshly materialized project.
    pub fn new(
        project_path: &Path,
        variables: &VariableSet,
        template_name: &str,
        created: impl Into<String>,
    ) -> Self {
        let var = |key: &str| variables.get(key).map(str::to_string);
        Self {
            name: var(PROJECT_NAME),
            template: Some(template_name.to_string()),
            target: var(TARGET),
            your_ip: var(YOUR_IP),
            author: var(AUTHOR),
            created: Some(created.into()),
            path: Some(project_path.display().to_string()),
        }
    }

    /// Lenient read of a parsed record; missing or non-scalar fields are `None`.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(scalar_to_string);
        Self {
            name: field("name"),
            template: field("template"),
            target: field("target"),
            your_ip: field("your-ip"),
            author: field("author"),
            created: field("created"),
            path: field("path"),
        }
    }
}

/// Write the metadata record for `project_dir`, overwriting any previous one.
///
/// Returns the path of the written file.
pub fn write_metadata(
    project_dir: &Path,
    variables: &VariableSet,
    template_name: &str,
) -> crate::core::Result<PathBuf> {
    let canonical = fs::canonicalize(project_dir)?;
    let created = Local::now().format(CREATED_FORMAT).to_string();
    let record = ProjectMetadata::new(&canonical, variables, template_name, created);

    let meta_path = project_dir.join(METADATA_FILE);
    fs::write(&meta_path, serde_yaml::to_string(&record)?)?;
    debug!(path = %meta_path.display(), "Saved project metadata");
    Ok(meta_path)
}

/// Read the metadata record of `project_dir`.
pub fn read_metadata(project_dir: &Path) -> Result<ProjectMetadata, ApplicationError> {
    let meta_path = project_dir.join(METADATA_FILE);
    if !meta_path.is_file() {
        return Err(ApplicationError::MetadataNotFound(meta_path));
    }

    let content = fs::read_to_string(&meta_path)?;
    let value: Value = serde_yaml::from_str(&content).map_err(crate::core::Error::from)?;
    Ok(ProjectMetadata::from_value(&value))
}

/// One row of the project listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub template: String,
    pub target: String,
    pub created: String,
    pub path: PathBuf,
}

impl ProjectEntry {
    const NO_TEMPLATE: &'static str = "N/A";
    const NO_VALUE: &'static str = "-";

    fn from_metadata(dir: &Path, dir_name: &str, metadata: ProjectMetadata) -> Self {
        Self {
            name: metadata.name.unwrap_or_else(|| dir_name.to_string()),
            template: metadata
                .template
                .unwrap_or_else(|| Self::NO_TEMPLATE.to_string()),
            target: metadata.target.unwrap_or_else(|| Self::NO_VALUE.to_string()),
            created: metadata.created.unwrap_or_else(|| Self::NO_VALUE.to_string()),
            path: dir.to_path_buf(),
        }
    }
}

/// Immediate subdirectories of `dir` that carry a metadata file, sorted by
/// directory name.
///
/// Records that fail to parse are still listed under their directory name;
/// unreadable ones are skipped.
pub fn discover_projects(dir: &Path) -> Result<Vec<ProjectEntry>, ApplicationError> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && path.join(METADATA_FILE).is_file())
        .collect();
    dirs.sort();

    let mut projects = Vec::with_capacity(dirs.len());
    for project_dir in dirs {
        let dir_name = project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta_path = project_dir.join(METADATA_FILE);

        let content = match fs::read_to_string(&meta_path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %meta_path.display(), error = %e, "Could not read project metadata");
                continue;
            }
        };

        let metadata = match serde_yaml::from_str::<Value>(&content) {
            Ok(value) => ProjectMetadata::from_value(&value),
            Err(e) => {
                warn!(path = %meta_path.display(), error = %e, "Malformed project metadata");
                ProjectMetadata::default()
            }
        };

        projects.push(ProjectEntry::from_metadata(&project_dir, &dir_name, metadata));
    }

    Ok(projects)
}
