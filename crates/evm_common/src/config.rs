use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::block_mapping::BlockMapping;
use crate::error::ConfigError;

/// Anchor and cadence of the synthetic EVM block clock.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingConfig {
    #[serde(default)]
    pub genesis_time: i64,
    #[serde(default = "default_block_interval_secs")]
    pub block_interval_secs: u32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            genesis_time: 0,
            block_interval_secs: default_block_interval_secs(),
        }
    }
}

impl MappingConfig {
    pub fn mapping(&self) -> BlockMapping {
        BlockMapping::from_config(self)
    }
}

fn default_block_interval_secs() -> u32 {
    1
}

/// Reads any of the workspace's config sections from a TOML file.
pub fn load_from_path<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}
