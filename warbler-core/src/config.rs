use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bs::RepeatMode;

/// User settings, persisted as `settings.json` in the data directory.
///
/// Missing fields take their defaults, so older or hand-edited files load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Relative paths are resolved against the data directory on load.
    pub music_folder: PathBuf,
    pub volume: f32,
    pub repeat_mode: RepeatMode,
    pub last_open_playlist: Option<String>,
    pub mini_player: bool,
}
impl Settings {
    pub const DEFAULT_VOLUME: f32 = 0.7;
    pub const DEFAULT_MUSIC_FOLDER: &str = "music";
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            music_folder: PathBuf::from(Self::DEFAULT_MUSIC_FOLDER),
            volume: Self::DEFAULT_VOLUME,
            repeat_mode: RepeatMode::Off,
            last_open_playlist: None,
            mini_player: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"volume": 0.25, "repeat_mode": 2}"#).unwrap();
        assert_eq!(settings.volume, 0.25);
        assert_eq!(settings.repeat_mode, RepeatMode::One);
        assert_eq!(settings.music_folder, PathBuf::from("music"));
        assert_eq!(settings.last_open_playlist, None);
        assert!(!settings.mini_player);
    }

    #[test]
    fn repeat_mode_is_written_as_an_integer() {
        let settings = Settings {
            repeat_mode: RepeatMode::All,
            ..Default::default()
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["repeat_mode"], 1);
        assert_eq!(value["last_open_playlist"], serde_json::Value::Null);
    }
}
