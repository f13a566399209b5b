// Configuration loaded from YAML

use crate::backend::DEFAULT_SLOT;
use crate::category::Categories;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "todostore";
const CONFIG_FILE: &str = "config.yaml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub categories: Categories,
}

/// Where the task slot lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the slot. Defaults to the platform data directory.
    pub dir: Option<PathBuf>,
    /// Slot name; the file is `{dir}/{slot}.json`
    pub slot: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            slot: DEFAULT_SLOT.to_string(),
        }
    }
}

impl StoreConfig {
    /// Configured directory, or `{data_dir}/todostore`
    pub fn resolve_dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or_else(|| eyre!("Could not determine a data directory; set store.dir")),
        }
    }
}

impl Config {
    /// Default config file location: `{config_dir}/todostore/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults. A missing
    /// file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))?;

        debug!(path = ?path, "Loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.store.slot, "storedTasksData");
        assert!(config.store.dir.is_none());
        assert_eq!(config.categories.policy, CategoryPolicy::Open);
    }

    #[test]
    fn test_load_full_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            r#"
store:
  dir: /tmp/todo-data
  slot: work
categories:
  policy: closed
  labels: [Work, Errands]
  default: Errands
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.store.dir, Some(PathBuf::from("/tmp/todo-data")));
        assert_eq!(config.store.resolve_dir().unwrap(), PathBuf::from("/tmp/todo-data"));
        assert_eq!(config.store.slot, "work");
        assert_eq!(config.categories.policy, CategoryPolicy::Closed);
        assert_eq!(config.categories.labels, vec!["Work", "Errands"]);
        assert_eq!(config.categories.default, "Errands");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "categories:\n  policy: closed\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.categories.policy, CategoryPolicy::Closed);
        assert_eq!(config.categories.labels.len(), 5);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(temp.path().join("nope.yaml").as_path())).is_err());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "store: [not, a, map]\n").unwrap();

        assert!(Config::load(Some(path.as_path())).is_err());
    }
}
