//! Application Configuration
//! Column mapping, resolved-status sentinel and render settings, read from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "ISSUE_CHARTS_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "issue_charts.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Source column names for each role the charts rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub problem_type: String,
    pub status: String,
    pub resolution_time: String,
    pub reported_date: String,
    pub region: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            problem_type: "Problema".to_string(),
            status: "Estado".to_string(),
            resolution_time: "TiempoSolucion".to_string(),
            reported_date: "Fecha".to_string(),
            region: "Comuna".to_string(),
        }
    }
}

/// Size of exported PNG charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub columns: ColumnMapping,
    /// Status value marking an issue as resolved (exact match).
    pub resolved_status: String,
    /// Field separator of the input file.
    pub separator: char,
    /// Date formats tried in order. Month-first only, never day-first.
    pub date_formats: Vec<String>,
    pub render: RenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            resolved_status: "Solucionado".to_string(),
            separator: ',',
            date_formats: [
                "%Y-%m-%d",
                "%m/%d/%y",
                "%m/%d/%Y",
                "%Y/%m/%d",
                "%m-%d-%y",
                "%m-%d-%Y",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%d %H:%M:%S",
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %H:%M",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            render: RenderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a config file. Missing fields fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Locate and read the config file, or use defaults when there is none.
    pub fn discover() -> Result<Self, ConfigError> {
        let path = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.exists() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                local
            }
        };

        let config = Self::from_file(&path)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Separator as the single byte the CSV reader expects.
    pub fn separator_byte(&self) -> u8 {
        if self.separator.is_ascii() {
            self.separator as u8
        } else {
            tracing::warn!(separator = %self.separator, "non-ASCII separator, using ','");
            b','
        }
    }
}
