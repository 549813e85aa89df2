#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::AllocOption;
use crate::size::Size;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// JSON form of an allocation request. Absent fields keep their defaults.
///
/// ```json
/// {"size": "64MiB", "count": 4, "physical": true, "hold_ms": 500}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PressureConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_ms: Option<u64>,
}

impl PressureConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Options for the fields that are present, in declaration order.
    #[must_use]
    pub fn options(&self) -> Vec<AllocOption> {
        let mut opts = Vec::new();
        if let Some(size) = self.size {
            opts.push(AllocOption::Size(size));
        }
        if let Some(count) = self.count {
            opts.push(AllocOption::Count(count));
        }
        if let Some(physical) = self.physical {
            opts.push(AllocOption::Physical(physical));
        }
        if let Some(ms) = self.hold_ms {
            opts.push(AllocOption::Hold(Duration::from_millis(ms)));
        }
        opts
    }
}
