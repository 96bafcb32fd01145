//! Helpers for working with loosely typed YAML scalars

use serde_yaml::Value;

/// Returns true for YAML strings and numbers, the value kinds accepted as names.
pub fn is_text_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_))
}

/// Converts a YAML scalar to its string form.
///
/// Strings, numbers and booleans are stringified; `null`, sequences and
/// mappings yield `None`.
///
/// # Examples
/// ```
/// use penlab::core::utils::scalar_to_string;
/// use serde_yaml::Value;
///
/// assert_eq!(scalar_to_string(&Value::from(3)), Some("3".to_string()));
/// assert_eq!(scalar_to_string(&Value::from("web")), Some("web".to_string()));
/// assert_eq!(scalar_to_string(&Value::Null), None);
/// ```
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_text_scalar() {
        assert!(is_text_scalar(&Value::from("recon")));
        assert!(is_text_scalar(&Value::from(1.5)));
        assert!(!is_text_scalar(&Value::Bool(true)));
        assert!(!is_text_scalar(&Value::Null));
        assert!(!is_text_scalar(&Value::Sequence(vec![])));
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&Value::from(42)), Some("42".to_string()));
        assert_eq!(scalar_to_string(&Value::Bool(false)), Some("false".to_string()));
        assert_eq!(scalar_to_string(&Value::Sequence(vec![])), None);
    }
}
