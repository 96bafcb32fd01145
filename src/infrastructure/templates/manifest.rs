//! Template document parsing
//!
//! Raw YAML is parsed into a loose [`Value`], validated as a whole, and only
//! then deserialized into the typed [`TemplateDocument`].

use serde_yaml::{Mapping, Value};

use crate::infrastructure::templates::{TemplateDocument, TemplateError, validate_template};

/// Parse YAML text into a raw document. An empty document is an empty mapping.
pub fn parse_raw_yaml(content: &str) -> Result<Value, TemplateError> {
    let value: Value = serde_yaml::from_str(content)?;
    Ok(match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    })
}

/// Parse and validate a template document.
///
/// Returns [`TemplateError::Invalid`] with every collected message when the
/// document breaks the schema.
pub fn parse_template_yaml(content: &str) -> Result<TemplateDocument, TemplateError> {
    let raw = parse_raw_yaml(content)?;
    template_from_value(raw)
}

/// Validate an already parsed document and convert it to the typed model.
pub fn template_from_value(raw: Value) -> Result<TemplateDocument, TemplateError> {
    let report = validate_template(&raw);
    if !report.is_valid() {
        return Err(TemplateError::Invalid(report.into_errors()));
    }

    Ok(serde_yaml::from_value(raw)?)
}
