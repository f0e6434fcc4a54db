use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::bencode::{DecodeOptions, KeyOrder, DEFAULT_MAX_DEPTH};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "benparse.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub relaxed_key_order: bool,
    /// Deepest container nesting accepted on decode. Decoded trees live on
    /// the heap, so large values cost memory, not stack.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relaxed_key_order: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Reads `path`, or `benparse.toml` when `path` is `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        if path.is_none() && !config_path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            key_order: if self.relaxed_key_order {
                KeyOrder::Relaxed
            } else {
                KeyOrder::Strict
            },
            max_depth: self.max_depth,
        }
    }
}
