/// Configuration helpers shared between clients.
use std::path::Path;

/// Load a TOML config file, returning `T::default()` if the file doesn't exist
/// or can't be parsed.
pub fn load_config<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("failed to parse {}, using defaults: {e}", path.display());
                T::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no {} found, using default config", path.display());
            T::default()
        }
        Err(e) => {
            tracing::warn!("failed to read {}, using defaults: {e}", path.display());
            T::default()
        }
    }
}
