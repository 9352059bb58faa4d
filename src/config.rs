use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::aggregate::TOP_N;
use crate::data::catalog::MAX_UNIQUE;
use crate::data::export::ExportOptions;
use crate::data::loader::LoadOptions;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RUSTY_DASH_CONFIG";

/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "rusty-dash.json";

/// Dashboard settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset opened at startup.
    pub source: Option<PathBuf>,
    pub title: String,
    pub max_unique: usize,
    pub top_n: usize,
    pub trim_text: bool,
    /// Single-byte field delimiter for delimited text.
    pub delimiter: char,
    pub round_export: bool,
    pub export_file_name: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: None,
            title: "Rusty Dash – Sales Dashboard".to_string(),
            max_unique: MAX_UNIQUE,
            top_n: TOP_N,
            trim_text: false,
            delimiter: ',',
            round_export: false,
            export_file_name: "filtered.csv".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        if !config.delimiter.is_ascii() {
            anyhow::bail!("delimiter {:?} is not a single ASCII character", config.delimiter);
        }
        Ok(config)
    }

    /// `$RUSTY_DASH_CONFIG`, else `./rusty-dash.json`, else defaults.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter as u8,
            trim_text: self.trim_text,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            delimiter: self.delimiter as u8,
            round_numeric: self.round_export,
        }
    }
}
