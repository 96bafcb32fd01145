//! Template management use cases

use std::fmt::Write as _;
use std::path::Path;

use crate::application::ApplicationError;
use crate::infrastructure::templates::{TemplateRepository, TemplateSummary};

/// Use case for listing all installed templates
pub struct ListTemplatesUseCase<R: TemplateRepository> {
    repository: R,
}

impl<R: TemplateRepository> ListTemplatesUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn execute(&self) -> Result<String, ApplicationError> {
        let listings = self.repository.list()?;

        if listings.is_empty() {
            return Ok(String::from(
                "No templates installed.\nUse 'penlab templates import <file>' to add one.\n",
            ));
        }

        let width = listings
            .iter()
            .map(|l| l.summary.as_ref().map_or(l.stem.len(), |s| s.name.len()))
            .max()
            .unwrap_or(0);

        let mut output = String::from("Available templates:\n\n");
        for listing in &listings {
            match &listing.summary {
                Some(summary) => {
                    let _ = writeln!(
                        output,
                        "  {:<width$}  v{:<6} {}",
                        summary.name, summary.version, summary.description
                    );
                    if !summary.tags.is_empty() {
                        let _ = writeln!(output, "  {:<width$}  tags: {}", "", summary.tags.join(", "));
                    }
                }
                None => {
                    let _ = writeln!(output, "  {:<width$}  v{:<6} Failed to load", listing.stem, "?");
                }
            }
        }

        output.push_str("\nUse 'penlab templates show <template>' for more details\n");
        Ok(output)
    }
}

/// Use case for showing one template's metadata and variables
pub struct ShowTemplateUseCase<R: TemplateRepository> {
    repository: R,
}

impl<R: TemplateRepository> ShowTemplateUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn execute(&self, name: &str) -> Result<String, ApplicationError> {
        let template = self.repository.load(name)?;

        let mut output = format!("Template: {}\n", template.name.as_deref().unwrap_or(name));
        let _ = writeln!(
            output,
            "Version: {}",
            template
                .version
                .as_deref()
                .unwrap_or(TemplateSummary::DEFAULT_VERSION)
        );
        let _ = writeln!(
            output,
            "Author: {}",
            template.author.as_deref().unwrap_or("Unknown")
        );
        let _ = writeln!(
            output,
            "Description: {}",
            template
                .description
                .as_deref()
                .unwrap_or(TemplateSummary::DEFAULT_DESCRIPTION)
        );
        let _ = writeln!(output, "Tags: {}", template.tags.join(", "));

        if !template.variables.is_empty() {
            output.push_str("\nVariables:\n");
            for (key, description) in &template.variables {
                let _ = writeln!(output, "  {{{key}}}: {description}");
            }
        }

        let _ = writeln!(
            output,
            "\nStructure: {} top-level directories, {} global files",
            template.structure.len(),
            template.global_files.len()
        );
        Ok(output)
    }
}

/// Use case for importing a template file into the templates directory
pub struct ImportTemplateUseCase<R: TemplateRepository> {
    repository: R,
}

impl<R: TemplateRepository> ImportTemplateUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns the installed template name and a confirmation message.
    pub fn execute(&self, source: &Path) -> Result<(String, String), ApplicationError> {
        let (name, destination) = self.repository.import(source)?;
        let message = format!(
            "Template \"{name}\" imported\nLocation: {}\n",
            destination.display()
        );
        Ok((name, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::templates::FileSystemTemplateRepository;
    use std::fs;
    use tempfile::TempDir;

    const WEB_TEMPLATE: &str = r#"
name: web
version: 2
author: bob
description: Web application assessment
tags: [web, owasp]
variables:
  domain: Target domain
  port: "443"
structure:
  - dir: recon
"#;

    fn repo_with(files: &[(&str, &str)]) -> (TempDir, FileSystemTemplateRepository) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let templates = temp_dir.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        for (name, content) in files {
            fs::write(templates.join(name), content).unwrap();
        }
        (temp_dir, FileSystemTemplateRepository::new(templates))
    }

    #[test]
    fn test_list_templates_use_case() {
        let (_tmp, repo) = repo_with(&[("web.yaml", WEB_TEMPLATE), ("bad.yaml", "tags: [")]);

        let output = ListTemplatesUseCase::new(repo).execute().unwrap();

        assert!(output.starts_with("Available templates:"));
        assert!(output.contains("Web application assessment"));
        assert!(output.contains("tags: web, owasp"));
        assert!(output.contains("bad  v?      Failed to load"));
        assert!(output.contains("penlab templates show"));
    }

    #[test]
    fn test_list_templates_empty() {
        let (_tmp, repo) = repo_with(&[]);
        let output = ListTemplatesUseCase::new(repo).execute().unwrap();
        assert!(output.contains("No templates installed"));
    }

    #[test]
    fn test_show_template_use_case() {
        let (_tmp, repo) = repo_with(&[("web.yaml", WEB_TEMPLATE)]);

        let output = ShowTemplateUseCase::new(repo).execute("web").unwrap();

        assert!(output.contains("Template: web\n"));
        assert!(output.contains("Version: 2\n"));
        assert!(output.contains("Author: bob\n"));
        assert!(output.contains("Tags: web, owasp\n"));
        assert!(output.contains("  {domain}: Target domain\n"));
        assert!(output.contains("  {port}: 443\n"));
    }

    #[test]
    fn test_show_template_defaults() {
        let (_tmp, repo) = repo_with(&[("bare.yaml", "")]);

        let output = ShowTemplateUseCase::new(repo).execute("bare").unwrap();

        assert!(output.contains("Template: bare\n"));
        assert!(output.contains("Version: 1.0\n"));
        assert!(output.contains("Author: Unknown\n"));
        assert!(output.contains("Description: No description\n"));
        assert!(!output.contains("Variables:"));
    }

    #[test]
    fn test_show_missing_template() {
        let (_tmp, repo) = repo_with(&[]);
        let err = ShowTemplateUseCase::new(repo).execute("ghost").unwrap_err();
        assert!(matches!(err, ApplicationError::TemplateError(_)));
    }

    #[test]
    fn test_import_template_use_case() {
        let (tmp, repo) = repo_with(&[]);
        let source = tmp.path().join("download.yaml");
        fs::write(&source, WEB_TEMPLATE).unwrap();

        let (name, message) = ImportTemplateUseCase::new(repo.clone())
            .execute(&source)
            .unwrap();

        assert_eq!(name, "web");
        assert!(message.contains("Template \"web\" imported"));
        assert!(repo.templates_dir().join("web.yaml").is_file());
    }
}
