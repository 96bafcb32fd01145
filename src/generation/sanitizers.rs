//! Name sanitizing and `{key}` token substitution for generated paths.
//!
//! Every directory and file name produced from a template passes through
//! [`substitute`] and then [`sanitize_name`], so a single template field always
//! yields exactly one path segment.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Maximum length, in characters, of a sanitized segment.
pub const MAX_SEGMENT_LEN: usize = 255;

/// Replacement used for directory segments.
pub const DIR_REPLACEMENT: &str = "-";

/// Replacement used for file segments.
pub const FILE_REPLACEMENT: &str = "_";

static INVALID_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*\x00]"#).expect("valid invalid-character regex"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid token regex"));

/// Maps an arbitrary string to a filesystem-safe path segment.
///
/// This function:
/// - Replaces each of `< > : " / \ | ? *` and NUL with `replacement`
/// - Collapses whitespace runs into a single space and trims the ends
/// - Truncates the result to [`MAX_SEGMENT_LEN`] characters
///
/// Characters of `replacement` that are themselves invalid are dropped, so
/// the output never contains a separator.
///
/// # Examples
/// ```
/// use penlab::generation::sanitizers::sanitize_name;
///
/// assert_eq!(sanitize_name("../../etc", "-"), "..-..-etc");
/// assert_eq!(sanitize_name("  web   recon  ", "_"), "web recon");
/// assert_eq!(sanitize_name("notes?.md", "_"), "notes_.md");
/// ```
pub fn sanitize_name(raw: &str, replacement: &str) -> String {
    let replacement = INVALID_CHARS_RE.replace_all(replacement, "");
    let replaced = INVALID_CHARS_RE.replace_all(raw, regex::NoExpand(replacement.as_ref()));
    let collapsed = WHITESPACE_RE.replace_all(&replaced, " ");

    collapsed.trim().chars().take(MAX_SEGMENT_LEN).collect()
}

/// Replaces every `{key}` token with its value from `variables`.
///
/// Unknown tokens are left as they are. Substitution is a single pass, so a
/// value that itself contains `{...}` is never expanded again.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use penlab::generation::sanitizers::substitute;
///
/// let mut vars = BTreeMap::new();
/// vars.insert("target".to_string(), "10.10.10.5".to_string());
///
/// assert_eq!(substitute("Target: {target}", &vars), "Target: 10.10.10.5");
/// assert_eq!(substitute("{unknown}", &vars), "{unknown}");
/// ```
pub fn substitute(input: &str, variables: &BTreeMap<String, String>) -> String {
    TOKEN_RE
        .replace_all(input, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
