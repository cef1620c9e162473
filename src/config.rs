use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::coverage::ReportFormat;
use crate::error::{Error, Result};
use crate::resolve::PathMatch;

pub const CONFIG_FILE: &str = "coverage-checker.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Report format; detected from content when "auto"
    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// How requested paths are matched against report nodes
    #[serde(default, rename = "match")]
    pub match_mode: PathMatch,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `coverage-checker.toml` from `dir`, or defaults if there is none
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!("no config found, using defaults");
            return Ok(Config::default());
        }

        tracing::debug!("loading config from {}", path.display());
        Config::load(&path)
    }
}
