//! Penlab home layout and the global configuration file.
//!
//! The penlab home holds the installed templates and a flat YAML config whose
//! values feed the variable resolver. Every path is carried by [`PenlabPaths`]
//! so callers (and tests) decide where the home lives.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, warn};

use super::error::{Error, Result};
use super::utils::scalar_to_string;

/// Environment variable that overrides the default `~/.penlab` home.
pub const HOME_ENV: &str = "PENLAB_HOME";

const TEMPLATES_DIR_NAME: &str = "templates";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Filesystem locations used by penlab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenlabPaths {
    /// Root of the penlab home
    pub home: PathBuf,
    /// Directory holding `<name>.yaml` templates
    pub templates_dir: PathBuf,
    /// Global configuration file
    pub config_file: PathBuf,
}

impl PenlabPaths {
    /// Build the layout rooted at `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            templates_dir: home.join(TEMPLATES_DIR_NAME),
            config_file: home.join(CONFIG_FILE_NAME),
            home,
        }
    }

    /// Resolve the home from `$PENLAB_HOME`, falling back to `~/.penlab`.
    pub fn from_env() -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(PathBuf::from(home)));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::config("Could not determine the user's home directory"))?;
        Ok(Self::new(home.join(".penlab")))
    }

    /// Create the home and templates directories, and write the default
    /// configuration when none exists yet.
    pub fn ensure_structure(&self) -> Result<()> {
        fs::create_dir_all(&self.templates_dir)?;

        if !self.config_file.exists() {
            debug!(path = %self.config_file.display(), "Writing default configuration");
            GlobalConfig::default().save(&self.config_file)?;
        }

        Ok(())
    }
}

/// Flat key/value configuration shared by every project
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    values: BTreeMap<String, Value>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        let author = std::env::var("USER")
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "pentester".to_string());

        let mut values = BTreeMap::new();
        values.insert("your-ip".to_string(), Value::from("10.10.14.x"));
        values.insert("author".to_string(), Value::from(author));
        values.insert("default_template".to_string(), Value::from("default"));
        Self { values }
    }
}

impl GlobalConfig {
    /// Empty configuration, without the built-in defaults.
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Load the configuration for `paths`, creating the home layout first.
    ///
    /// A missing, empty or malformed file yields the defaults; the latter two
    /// are reported with a warning.
    pub fn load(paths: &PenlabPaths) -> Result<Self> {
        paths.ensure_structure()?;
        let content = fs::read_to_string(&paths.config_file)?;
        Ok(Self::parse_or_default(&content, &paths.config_file))
    }

    fn parse_or_default(content: &str, origin: &Path) -> Self {
        match serde_yaml::from_str::<Value>(content) {
            Ok(Value::Mapping(mapping)) => {
                let values = mapping
                    .into_iter()
                    .filter_map(|(k, v)| scalar_to_string(&k).map(|k| (k, v)))
                    .collect();
                Self { values }
            }
            Ok(Value::Null) => Self::default(),
            Ok(_) => {
                warn!(path = %origin.display(), "Configuration is not a mapping, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %origin.display(), error = %e, "Failed to parse configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Persist the configuration as YAML.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(&self.values)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// String form of a scalar value; `None` when absent, null or structured.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(scalar_to_string)
    }

    /// Set `key` to a string value, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), Value::from(value.into()));
    }

    /// Iterate keys in sorted order with their display form.
    pub fn entries(&self) -> impl Iterator<Item = (&str, String)> {
        self.values.iter().map(|(k, v)| {
            let shown = scalar_to_string(v)
                .unwrap_or_else(|| serde_yaml::to_string(v).unwrap_or_default().trim().to_string());
            (k.as_str(), shown)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_layout() {
        let paths = PenlabPaths::new("/opt/penlab");
        assert_eq!(paths.templates_dir, PathBuf::from("/opt/penlab/templates"));
        assert_eq!(paths.config_file, PathBuf::from("/opt/penlab/config.yaml"));
    }

    #[test]
    fn test_ensure_structure_writes_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = PenlabPaths::new(temp_dir.path().join("home"));

        paths.ensure_structure().expect("ensure structure");

        assert!(paths.templates_dir.is_dir());
        assert!(paths.config_file.is_file());

        let config = GlobalConfig::load(&paths).expect("load config");
        assert_eq!(config.get("your-ip").as_deref(), Some("10.10.14.x"));
        assert_eq!(config.get("default_template").as_deref(), Some("default"));
        assert!(config.get("author").is_some());
    }

    #[test]
    fn test_existing_config_is_not_overwritten() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = PenlabPaths::new(temp_dir.path());
        fs::write(&paths.config_file, "author: alice\nport: 8080\n").unwrap();

        let config = GlobalConfig::load(&paths).expect("load config");

        assert_eq!(config.get("author").as_deref(), Some("alice"));
        assert_eq!(config.get("port").as_deref(), Some("8080"));
        assert_eq!(config.get("your-ip"), None);
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = PenlabPaths::new(temp_dir.path());
        fs::write(&paths.config_file, "- just\n- a list\n").unwrap();

        let config = GlobalConfig::load(&paths).expect("load config");
        assert_eq!(config.get("your-ip").as_deref(), Some("10.10.14.x"));

        fs::write(&paths.config_file, "author: [unclosed").unwrap();
        let config = GlobalConfig::load(&paths).expect("load config");
        assert_eq!(config.get("default_template").as_deref(), Some("default"));
    }

    #[test]
    fn test_set_and_save_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = PenlabPaths::new(temp_dir.path());

        let mut config = GlobalConfig::load(&paths).unwrap();
        config.set("author", "John Doe");
        config.save(&paths.config_file).unwrap();

        let reloaded = GlobalConfig::load(&paths).unwrap();
        assert_eq!(reloaded.get("author").as_deref(), Some("John Doe"));

        let keys: Vec<&str> = reloaded.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["author", "default_template", "your-ip"]);
    }

    #[test]
    fn test_null_value_reads_as_absent() {
        let config = GlobalConfig::parse_or_default("target: ~\n", Path::new("config.yaml"));
        assert_eq!(config.get("target"), None);
    }
}
