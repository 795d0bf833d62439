//! `narrate.toml` configuration
//!
//! ```toml
//! [segmenter]
//! policy = "edge_per_step"     # or "attribute_runs"
//!
//! [narrative]
//! pronunciation = true
//! pretty = false
//!
//! [logging]
//! format = "compact"           # or "json"
//! ```
//!
//! Every field is optional. Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogFormat;
use crate::narrative::{NarrativeOptions, SegmentPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NarrateConfig {
    pub segmenter: SegmenterConfig,
    pub narrative: NarrativeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmenterConfig {
    pub policy: SegmentPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NarrativeConfig {
    pub pronunciation: bool,
    pub pretty: bool,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            pronunciation: true,
            pretty: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl NarrateConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn narrative_options(&self) -> NarrativeOptions {
        NarrativeOptions {
            pronunciation: self.narrative.pronunciation,
        }
    }
}
