//! Runtime configuration: where the data lives, how it is normalised, and
//! the dietary thresholds.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::export::DEFAULT_EXPORT_FILE_NAME;
use crate::data::filter::DietaryThresholds;
use crate::data::loader::LoadOptions;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "FAST_FOOD_FILTER_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "fast-food-filter.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dataset loaded at startup, if it exists.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Round numeric cells to whole numbers on load.
    #[serde(default = "default_round_numbers")]
    pub round_numbers: bool,

    /// File name suggested by the export dialog.
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,

    #[serde(default)]
    pub thresholds: DietaryThresholds,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/processed/cleaned_df_02.csv")
}

fn default_round_numbers() -> bool {
    true
}

fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            round_numbers: default_round_numbers(),
            export_file_name: default_export_file_name(),
            thresholds: DietaryThresholds::default(),
        }
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// `$FAST_FOOD_FILTER_CONFIG`, else `./fast-food-filter.json`, else defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.thresholds.entries() {
            if !value.is_finite() {
                bail!("threshold '{name}' must be a finite number, got {value}");
            }
        }
        if self.export_file_name.trim().is_empty() {
            bail!("export_file_name must not be empty");
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            round_numbers: self.round_numbers,
        }
    }
}
