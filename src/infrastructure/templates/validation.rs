//! Structural validation of raw template documents.
//!
//! Every rule is checked and every violation collected, so a template author
//! sees all problems in one pass. Messages carry a path such as
//! `structure[0].subdirs[1].files[2].name` pointing at the offending value.

use serde_yaml::{Mapping, Value};

use crate::core::utils::is_text_scalar;

/// Outcome of validating a template document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Validates `doc` against the template schema.
///
/// A non-mapping top level is a single fatal error; otherwise all field
/// errors, including those nested in `structure`, `subdirs` and `files`, are
/// reported.
pub fn validate_template(doc: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Value::Mapping(root) = doc else {
        report.push("Template must be a mapping at the top level.");
        return report;
    };

    if let Some(name) = root.get("name") {
        if !is_text_scalar(name) {
            report.push("\"name\" must be a string or number.");
        }
    }

    if let Some(version) = root.get("version") {
        if !is_text_scalar(version) {
            report.push("\"version\" must be a string or number.");
        }
    }

    if let Some(description) = root.get("description") {
        if !description.is_string() {
            report.push("\"description\" must be a string.");
        }
    }

    if let Some(tags) = root.get("tags") {
        match tags {
            Value::Sequence(items) => {
                for (i, tag) in items.iter().enumerate() {
                    if !is_text_scalar(tag) {
                        report.push(format!("tags[{i}] must be a string or number."));
                    }
                }
            }
            other if is_text_scalar(other) => {}
            _ => report.push("\"tags\" must be a list of strings or a single string/number."),
        }
    }

    if let Some(variables) = root.get("variables") {
        if !variables.is_mapping() {
            report.push("\"variables\" must be a mapping (key: value).");
        }
    }

    if let Some(structure) = root.get("structure") {
        match structure {
            Value::Sequence(items) => {
                for (idx, item) in items.iter().enumerate() {
                    validate_dir(item, &format!("structure[{idx}]"), &mut report);
                }
            }
            _ => report.push("\"structure\" must be a list."),
        }
    }

    if let Some(global_files) = root.get("global_files") {
        match global_files {
            Value::Sequence(items) => {
                for (idx, item) in items.iter().enumerate() {
                    validate_file(item, &format!("global_files[{idx}]"), &mut report);
                }
            }
            _ => report.push("\"global_files\" must be a list."),
        }
    }

    report
}

fn validate_dir(item: &Value, at: &str, report: &mut ValidationReport) {
    let Value::Mapping(node) = item else {
        report.push(format!("{at} must be a mapping."));
        return;
    };

    match node.get("dir") {
        None => report.push(format!("{at} is missing \"dir\".")),
        Some(dir) if !is_text_scalar(dir) => {
            report.push(format!("{at}.dir must be a string or number."))
        }
        Some(_) => {}
    }

    if let Some(subdirs) = node.get("subdirs") {
        match subdirs {
            Value::Sequence(items) => {
                for (idx, sub) in items.iter().enumerate() {
                    validate_dir(sub, &format!("{at}.subdirs[{idx}]"), report);
                }
            }
            _ => report.push(format!("{at}.subdirs must be a list.")),
        }
    }

    validate_files_field(node, at, report);
}

fn validate_files_field(node: &Mapping, at: &str, report: &mut ValidationReport) {
    let Some(files) = node.get("files") else {
        return;
    };

    match files {
        Value::Sequence(items) => {
            for (idx, file) in items.iter().enumerate() {
                validate_file(file, &format!("{at}.files[{idx}]"), report);
            }
        }
        _ => report.push(format!("{at}.files must be a list.")),
    }
}

fn validate_file(item: &Value, at: &str, report: &mut ValidationReport) {
    let Value::Mapping(file) = item else {
        report.push(format!("{at} must be a mapping."));
        return;
    };

    match file.get("name") {
        None => report.push(format!("{at} is missing \"name\".")),
        Some(name) if !is_text_scalar(name) => {
            report.push(format!("{at}.name must be a string or number."))
        }
        Some(_) => {}
    }

    if let Some(content) = file.get("content") {
        if !content.is_string() {
            report.push(format!("{at}.content must be a string."));
        }
    }

    if let Some(executable) = file.get("executable") {
        if !executable.is_bool() {
            report.push(format!("{at}.executable must be a boolean (true/false)."));
        }
    }
}
