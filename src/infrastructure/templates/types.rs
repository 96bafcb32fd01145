//! Typed template document model.
//!
//! Documents are only deserialized into these types after passing
//! [`validate_template`](super::validate_template), so the deserializers here
//! can assume a well-formed shape and focus on normalising scalars.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::core::utils::scalar_to_string;

/// A parsed and validated template document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateDocument {
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    pub description: Option<String>,
    /// Free-form, shown by `templates show`
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    /// Variable name to description; doubles as the template-level default
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub structure: Vec<DirNode>,
    #[serde(default)]
    pub global_files: Vec<FileNode>,
}

/// A directory to create, with its files and nested directories
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirNode {
    /// Raw name, before substitution and sanitizing
    #[serde(deserialize_with = "deserialize_scalar")]
    pub dir: String,
    #[serde(default)]
    pub files: Vec<FileNode>,
    #[serde(default)]
    pub subdirs: Vec<DirNode>,
}

/// A file to write
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileNode {
    /// Raw name, before substitution and sanitizing
    #[serde(deserialize_with = "deserialize_scalar")]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub executable: bool,
}

impl DirNode {
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            subdirs: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: FileNode) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_subdir(mut self, subdir: DirNode) -> Self {
        self.subdirs.push(subdir);
        self
    }
}

impl FileNode {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            executable: false,
        }
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// Lenient summary of a template file for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub version: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl TemplateSummary {
    pub const DEFAULT_VERSION: &'static str = "1.0";
    pub const DEFAULT_DESCRIPTION: &'static str = "No description";

    /// Summarise a raw document, defaulting whatever is missing or malformed.
    pub fn from_value(value: &Value, fallback_name: &str) -> Self {
        let field = |key: &str| value.get(key).and_then(scalar_to_string);

        let tags = match value.get("tags") {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(other) => scalar_to_string(other).into_iter().collect(),
            None => Vec::new(),
        };

        Self {
            name: field("name").unwrap_or_else(|| fallback_name.to_string()),
            version: field("version").unwrap_or_else(|| Self::DEFAULT_VERSION.to_string()),
            description: field("description")
                .unwrap_or_else(|| Self::DEFAULT_DESCRIPTION.to_string()),
            tags,
        }
    }
}

/// One file found in the templates directory
#[derive(Debug, Clone)]
pub struct TemplateListing {
    /// File name without extension
    pub stem: String,
    pub path: PathBuf,
    /// `None` when the file could not be read or parsed
    pub summary: Option<TemplateSummary>,
}

fn deserialize_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value).ok_or_else(|| serde::de::Error::custom("Expected a string or number"))
}

fn deserialize_optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

/// Accepts either a single scalar or a list of scalars
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Sequence(seq) => seq
            .iter()
            .map(|item| {
                scalar_to_string(item)
                    .ok_or_else(|| serde::de::Error::custom("Expected a list of strings"))
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => scalar_to_string(&other)
            .map(|tag| vec![tag])
            .ok_or_else(|| serde::de::Error::custom("Expected string or list of strings")),
    }
}

/// Null or structured values become empty strings
fn deserialize_variables<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Mapping(mapping) => Ok(mapping
            .iter()
            .filter_map(|(k, v)| {
                scalar_to_string(k).map(|k| (k, scalar_to_string(v).unwrap_or_default()))
            })
            .collect()),
        Value::Null => Ok(BTreeMap::new()),
        _ => Err(serde::de::Error::custom("Expected a mapping")),
    }
}
