//! Filesystem-based template repository
//!
//! Templates are single YAML files named `<template-name>.yaml` (or `.yml`)
//! inside the penlab templates directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::generation::containment::is_strictly_within;
use crate::generation::sanitizers::{FILE_REPLACEMENT, sanitize_name};
use crate::infrastructure::templates::{
    TemplateDocument, TemplateError, TemplateListing, TemplateRepository, TemplateSummary,
    manifest::{parse_raw_yaml, parse_template_yaml, template_from_value},
};

const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Template repository backed by a directory of YAML files
#[derive(Debug, Clone)]
pub struct FileSystemTemplateRepository {
    templates_dir: PathBuf,
}

impl FileSystemTemplateRepository {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Locate the file for `name`, refusing names that are not a single
    /// plain segment.
    fn find(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || sanitize_name(name, FILE_REPLACEMENT) != name
        {
            debug!(name, "Rejected template name");
            return None;
        }

        EXTENSIONS
            .iter()
            .map(|ext| self.templates_dir.join(format!("{name}.{ext}")))
            .find(|path| path.is_file() && is_strictly_within(&self.templates_dir, path))
    }
}

impl TemplateRepository for FileSystemTemplateRepository {
    fn load(&self, name: &str) -> Result<TemplateDocument, TemplateError> {
        let path = self.find(name).ok_or_else(|| TemplateError::not_found(name))?;
        debug!(path = %path.display(), "Loading template");

        let content = fs::read_to_string(&path)?;
        parse_template_yaml(&content)
    }

    fn list(&self) -> Result<Vec<TemplateListing>, TemplateError> {
        if !self.templates_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.templates_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| EXTENSIONS.contains(&ext))
            })
            .collect();
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let summary = summarize(&path, &stem);
                TemplateListing {
                    stem,
                    path,
                    summary,
                }
            })
            .collect())
    }

    fn import(&self, source: &Path) -> Result<(String, PathBuf), TemplateError> {
        let content = fs::read_to_string(source)?;
        let doc = template_from_value(parse_raw_yaml(&content)?)?;

        let raw_name = doc.name.clone().unwrap_or_else(|| {
            source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let name = sanitize_name(&raw_name, FILE_REPLACEMENT);
        if name.is_empty() {
            return Err(TemplateError::Other(format!(
                "Cannot derive a template name from {}",
                source.display()
            )));
        }

        fs::create_dir_all(&self.templates_dir)?;
        let destination = self.templates_dir.join(format!("{name}.yaml"));
        if !is_strictly_within(&self.templates_dir, &destination) {
            return Err(TemplateError::Other(format!(
                "Template name \"{raw_name}\" resolves outside {}",
                self.templates_dir.display()
            )));
        }

        fs::copy(source, &destination)?;
        info!(name = %name, destination = %destination.display(), "Imported template");
        Ok((name, destination))
    }
}

fn summarize(path: &Path, stem: &str) -> Option<TemplateSummary> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Failed to read template");
            return None;
        }
    };

    match parse_raw_yaml(&content) {
        Ok(value) if value.is_mapping() => Some(TemplateSummary::from_value(&value, stem)),
        Ok(_) => None,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Failed to parse template");
            None
        }
    }
}
