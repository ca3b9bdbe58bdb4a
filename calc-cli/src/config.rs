//! Optional TOML configuration for the `calc` binary.
//!
//! ```toml
//! tax_year = 2026
//! jurisdiction = "US"
//! data_dir = "data/2026"   # bracket CSVs; bundled tables when absent
//! format = "json"
//! ```
//!
//! Every key is optional. Command-line flags override the file, and the file
//! overrides [`EngineDefaults`]. A relative `data_dir` is taken relative to
//! the directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};

use calc_core::EngineDefaults;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub tax_year: Option<i32>,
    pub jurisdiction: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl AppConfig {
    pub fn from_toml_str(
        s: &str,
        path: &str,
    ) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text, &display)?;
        if let (Some(dir), Some(base)) = (config.data_dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        Ok(config)
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub tax_year: Option<i32>,
    pub jurisdiction: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

/// Effective settings after merging flags, file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub defaults: EngineDefaults,
    pub data_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Settings {
    pub fn resolve(
        overrides: Overrides,
        config: AppConfig,
    ) -> Self {
        let builtin = EngineDefaults::default();
        Self {
            defaults: EngineDefaults {
                jurisdiction: overrides
                    .jurisdiction
                    .or(config.jurisdiction)
                    .map(|j| j.trim().to_ascii_uppercase())
                    .unwrap_or(builtin.jurisdiction),
                tax_year: overrides.tax_year.or(config.tax_year).unwrap_or(builtin.tax_year),
            },
            data_dir: overrides.data_dir.or(config.data_dir),
            format: overrides.format.or(config.format).unwrap_or_default(),
        }
    }
}
