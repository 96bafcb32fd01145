//! Variable resolution for template substitution.
//!
//! Each variable is resolved from an ordered list of [`Source`]s; the first
//! source holding a non-empty value wins. An explicit empty string does not
//! stop the search, it falls through to the next source like an absent value.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::core::GlobalConfig;

pub const PROJECT_NAME: &str = "project-name";
pub const TARGET: &str = "target";
pub const YOUR_IP: &str = "your-ip";
pub const DATE: &str = "date";
pub const AUTHOR: &str = "author";

pub const TARGET_FALLBACK: &str = "TARGET_IP";
pub const YOUR_IP_FALLBACK: &str = "10.10.x.x";
pub const AUTHOR_FALLBACK: &str = "pentester";

/// One place a variable value may come from, in precedence order
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// Value given on the command line
    Cli(Option<&'a str>),
    /// Values declared under the template's `variables`
    TemplateDefaults(&'a BTreeMap<String, String>),
    /// The global configuration file
    Config(&'a GlobalConfig),
    /// Hardcoded last resort
    Fallback(&'a str),
}

impl Source<'_> {
    fn lookup(&self, key: &str) -> Option<String> {
        match self {
            Source::Cli(value) => value.map(str::to_string),
            Source::TemplateDefaults(defaults) => defaults.get(key).cloned(),
            Source::Config(config) => config.get(key),
            Source::Fallback(value) => Some((*value).to_string()),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Source::Cli(_) => "cli",
            Source::TemplateDefaults(_) => "template",
            Source::Config(_) => "config",
            Source::Fallback(_) => "fallback",
        }
    }
}

/// Resolves `key` against `sources`, returning the first non-empty value or `""`.
pub fn resolve(key: &str, sources: &[Source<'_>]) -> String {
    for source in sources {
        if let Some(value) = source.lookup(key).filter(|v| !v.is_empty()) {
            debug!(key, source = source.label(), "Resolved variable");
            return value;
        }
    }
    String::new()
}

/// Resolves `key` with the standard precedence: CLI, template default,
/// global configuration, then `fallback`.
pub fn resolve_variable(
    key: &str,
    cli_value: Option<&str>,
    template_defaults: &BTreeMap<String, String>,
    config: &GlobalConfig,
    fallback: &str,
) -> String {
    resolve(
        key,
        &[
            Source::Cli(cli_value),
            Source::TemplateDefaults(template_defaults),
            Source::Config(config),
            Source::Fallback(fallback),
        ],
    )
}

/// Values supplied by the caller for one invocation
#[derive(Debug, Clone)]
pub struct VariableInputs {
    pub project_name: String,
    pub target: Option<String>,
    pub your_ip: Option<String>,
    /// `--var key=value` pairs
    pub overrides: BTreeMap<String, String>,
    pub today: NaiveDate,
}

impl VariableInputs {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            target: None,
            your_ip: None,
            overrides: BTreeMap::new(),
            today: Local::now().date_naive(),
        }
    }
}

/// Final string-to-string mapping used for substitution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    values: BTreeMap<String, String>,
}

impl VariableSet {
    /// Builds the set from caller inputs, template defaults and global config.
    ///
    /// `project-name` and `date` are always computed directly. `target`,
    /// `your-ip` and `author` go through [`resolve_variable`] with their
    /// fallbacks; every other declared or overridden key falls back to `""`.
    pub fn build(
        inputs: &VariableInputs,
        template_defaults: &BTreeMap<String, String>,
        config: &GlobalConfig,
    ) -> Self {
        let cli = |key: &str, flag: &Option<String>| -> Option<String> {
            flag.clone()
                .filter(|v| !v.is_empty())
                .or_else(|| inputs.overrides.get(key).cloned())
        };

        let mut values = BTreeMap::new();

        let extra_keys = template_defaults.keys().chain(inputs.overrides.keys());
        for key in extra_keys {
            if [PROJECT_NAME, DATE, TARGET, YOUR_IP, AUTHOR].contains(&key.as_str()) {
                continue;
            }
            let value = resolve_variable(
                key,
                inputs.overrides.get(key).map(String::as_str),
                template_defaults,
                config,
                "",
            );
            values.insert(key.clone(), value);
        }

        values.insert(PROJECT_NAME.to_string(), inputs.project_name.clone());
        values.insert(
            TARGET.to_string(),
            resolve_variable(
                TARGET,
                cli(TARGET, &inputs.target).as_deref(),
                template_defaults,
                config,
                TARGET_FALLBACK,
            ),
        );
        values.insert(
            YOUR_IP.to_string(),
            resolve_variable(
                YOUR_IP,
                cli(YOUR_IP, &inputs.your_ip).as_deref(),
                template_defaults,
                config,
                YOUR_IP_FALLBACK,
            ),
        );
        values.insert(DATE.to_string(), inputs.today.format("%Y-%m-%d").to_string());
        values.insert(
            AUTHOR.to_string(),
            resolve_variable(
                AUTHOR,
                cli(AUTHOR, &None).as_deref(),
                template_defaults,
                config,
                AUTHOR_FALLBACK,
            ),
        );

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

impl FromIterator<(String, String)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config(pairs: &[(&str, &str)]) -> GlobalConfig {
        let mut config = GlobalConfig::empty();
        for (k, v) in pairs {
            config.set(*k, *v);
        }
        config
    }

    #[test]
    fn test_cli_value_wins() {
        let template = defaults(&[("target", "10.0.0.1")]);
        let cfg = config(&[("target", "10.0.0.2")]);

        assert_eq!(
            resolve_variable("target", Some("10.0.0.9"), &template, &cfg, "TARGET_IP"),
            "10.0.0.9"
        );
    }

    #[test]
    fn test_precedence_falls_through_each_level() {
        let template = defaults(&[("target", "10.0.0.1")]);
        let cfg = config(&[("target", "10.0.0.2")]);
        let empty_cfg = GlobalConfig::empty();
        let empty_template = BTreeMap::new();

        assert_eq!(
            resolve_variable("target", None, &template, &cfg, "fb"),
            "10.0.0.1"
        );
        assert_eq!(
            resolve_variable("target", None, &empty_template, &cfg, "fb"),
            "10.0.0.2"
        );
        assert_eq!(
            resolve_variable("target", None, &empty_template, &empty_cfg, "fb"),
            "fb"
        );
    }

    #[test]
    fn test_empty_string_does_not_block_fall_through() {
        let template = defaults(&[("author", "")]);
        let cfg = config(&[("author", "")]);

        assert_eq!(
            resolve_variable("author", Some(""), &template, &cfg, "pentester"),
            "pentester"
        );
    }

    #[test]
    fn test_resolve_without_any_value_is_empty() {
        assert_eq!(resolve("missing", &[Source::Cli(None)]), "");
        assert_eq!(resolve("missing", &[]), "");
    }

    #[test]
    fn test_build_variable_set() {
        let mut inputs = VariableInputs::new("htb-box");
        inputs.target = Some("10.10.10.5".to_string());
        inputs.today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        inputs
            .overrides
            .insert("scope".to_string(), "internal".to_string());

        let template = defaults(&[("box", "Name of the box"), ("scope", "Engagement scope")]);
        let cfg = config(&[("your-ip", "10.10.14.2"), ("author", "alice")]);

        let vars = VariableSet::build(&inputs, &template, &cfg);

        assert_eq!(vars.get(PROJECT_NAME), Some("htb-box"));
        assert_eq!(vars.get(TARGET), Some("10.10.10.5"));
        assert_eq!(vars.get(YOUR_IP), Some("10.10.14.2"));
        assert_eq!(vars.get(AUTHOR), Some("alice"));
        assert_eq!(vars.get(DATE), Some("2024-03-09"));
        assert_eq!(vars.get("box"), Some("Name of the box"));
        assert_eq!(vars.get("scope"), Some("internal"));
    }

    #[test]
    fn test_build_uses_fallbacks() {
        let inputs = VariableInputs::new("demo");
        let vars = VariableSet::build(&inputs, &BTreeMap::new(), &GlobalConfig::empty());

        assert_eq!(vars.get(TARGET), Some(TARGET_FALLBACK));
        assert_eq!(vars.get(YOUR_IP), Some(YOUR_IP_FALLBACK));
        assert_eq!(vars.get(AUTHOR), Some(AUTHOR_FALLBACK));
    }

    #[test]
    fn test_overrides_feed_fixed_keys_but_not_computed_ones() {
        let mut inputs = VariableInputs::new("demo");
        inputs
            .overrides
            .insert("author".to_string(), "bob".to_string());
        inputs
            .overrides
            .insert("project-name".to_string(), "hijack".to_string());
        inputs.target = Some(String::new());
        inputs
            .overrides
            .insert("target".to_string(), "10.1.1.1".to_string());

        let vars = VariableSet::build(&inputs, &BTreeMap::new(), &GlobalConfig::empty());

        assert_eq!(vars.get(AUTHOR), Some("bob"));
        assert_eq!(vars.get(TARGET), Some("10.1.1.1"));
        assert_eq!(vars.get(PROJECT_NAME), Some("demo"));
    }
}
