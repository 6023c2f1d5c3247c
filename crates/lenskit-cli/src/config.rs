//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use lenskit_core::{FixtureSettings, LensSettings};

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lenskit")
        .join("config.toml")
}

/// Config file in use, honoring an explicit override
pub fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

/// Configuration for the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Fixture file used when `--data` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,

    /// Schema file used when `--schema` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub fixtures: FixtureSettings,

    #[serde(skip)]
    path: PathBuf,
}

impl Config {
    const KEYS: &'static [&'static str] = &[
        "data",
        "schema",
        "debug",
        "fixtures.enabled",
        "fixtures.default_object_limit",
        "fixtures.excess_probe_limit",
    ];

    /// Load the config file; a missing file yields defaults
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = config_file_path(explicit);
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Config::default()
        };
        config.path = path;
        Ok(config)
    }

    /// Fresh defaults bound to a config file location
    pub fn new_at(path: PathBuf) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Settings handed to the export engine
    pub fn settings(&self) -> LensSettings {
        LensSettings {
            debug: self.debug,
            fixtures: self.fixtures.clone(),
        }
    }

    pub fn keys() -> &'static [&'static str] {
        Self::KEYS
    }

    /// Value of a key, `None` when unset; unknown keys are an error
    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = match key {
            "data" => self.data.as_ref().map(|p| p.display().to_string()),
            "schema" => self.schema.as_ref().map(|p| p.display().to_string()),
            "debug" => Some(self.debug.to_string()),
            "fixtures.enabled" => self.fixtures.enabled.map(|b| b.to_string()),
            "fixtures.default_object_limit" => {
                self.fixtures.default_object_limit.map(|n| n.to_string())
            }
            "fixtures.excess_probe_limit" => {
                self.fixtures.excess_probe_limit.map(|n| n.to_string())
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::KEYS.join(", ")
            ),
        };
        Ok(value)
    }

    /// Set a key from its string form; an empty value unsets optional keys
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        match key {
            "data" => self.data = optional(value).map(PathBuf::from),
            "schema" => self.schema = optional(value).map(PathBuf::from),
            "debug" => self.debug = parse_bool(key, value)?,
            "fixtures.enabled" => {
                self.fixtures.enabled = optional(value)
                    .map(|v| parse_bool(key, v))
                    .transpose()?
            }
            "fixtures.default_object_limit" => {
                self.fixtures.default_object_limit = optional(value)
                    .map(|v| parse_count(key, v))
                    .transpose()?
            }
            "fixtures.excess_probe_limit" => {
                self.fixtures.excess_probe_limit = optional(value)
                    .map(|v| parse_count(key, v))
                    .transpose()?
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

fn optional(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    value
        .parse()
        .with_context(|| format!("{} expects true or false, got '{}'", key, value))
}

fn parse_count(key: &str, value: &str) -> anyhow::Result<usize> {
    value
        .parse()
        .with_context(|| format!("{} expects a non-negative integer, got '{}'", key, value))
}
