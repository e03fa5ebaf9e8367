// ABOUTME: Configuration management for the switchyard application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::output::OutputFormat;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Seed values applied to every run, above definition-file variables
    #[serde(default)]
    pub variables: HashMap<String, Value>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&contents)?
            }
            _ => Config::default(),
        };

        // Merge with environment variables
        config.merge_env()?;

        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let possible_paths = [
            PathBuf::from("switchyard.yaml"),
            PathBuf::from("switchyard.yml"),
            PathBuf::from(".switchyard.yaml"),
            PathBuf::from(".switchyard.yml"),
        ];

        // Check current directory
        if let Some(path) = possible_paths.into_iter().find(|path| path.exists()) {
            return Some(path);
        }

        // Check home directory
        dirs::home_dir()
            .map(|home_dir| home_dir.join(".switchyard").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SWITCHYARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SWITCHYARD_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(format) = lookup("SWITCHYARD_OUTPUT_FORMAT") {
            self.output_format = format.parse()?;
        }

        Ok(())
    }

    /// Merge additional variables over the configured ones
    pub fn merge_variables(&mut self, vars: HashMap<String, Value>) {
        self.variables.extend(vars);
    }
}
