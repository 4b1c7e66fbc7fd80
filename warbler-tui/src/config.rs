use std::path::Path;

use serde::{Deserialize, Serialize};
use warbler_client_shared::cover_art_cache;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: General,
}
impl Config {
    pub const FILENAME: &str = "warbler-tui.toml";

    /// Reads the config from `data_dir`, falling back to defaults.
    pub fn load(data_dir: &Path) -> Self {
        warbler_client_shared::config::load_config(&data_dir.join(Self::FILENAME))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub tick_rate_ms: u64,
    pub art_cache_size: usize,
}
impl Default for General {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            art_cache_size: cover_art_cache::DEFAULT_CAPACITY,
        }
    }
}
