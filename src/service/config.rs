//! Service configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::copy::COPY_NAME_SUFFIX;

/// Configuration for `BlockService`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    /// Appended to the source name when a copy is made without a name
    pub copy_name_suffix: String,
    /// Upper bound on blocks per building, checked on create and copy
    pub max_blocks_per_building: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            copy_name_suffix: COPY_NAME_SUFFIX.to_string(),
            max_blocks_per_building: 1024,
        }
    }
}

impl ServiceConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: ServiceConfig =
            serde_json::from_str(json).context("failed to parse service config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_blocks_per_building == 0 {
            bail!("maxBlocksPerBuilding must be at least 1");
        }
        Ok(())
    }
}
