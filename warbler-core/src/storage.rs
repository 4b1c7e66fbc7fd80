use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Settings, bs::TrackId};

/// Playlist name to ordered track IDs.
pub type PlaylistMap = BTreeMap<String, Vec<TrackId>>;

/// Reads and writes the JSON state files in the data directory.
///
/// Loading never fails: missing or malformed files yield defaults. Saving
/// logs and swallows errors. An in-memory storage skips disk entirely.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: Option<PathBuf>,
}
impl Storage {
    pub const SETTINGS_FILENAME: &str = "settings.json";
    pub const PLAYLISTS_FILENAME: &str = "playlists.json";
    pub const HISTORY_FILENAME: &str = "history.json";

    pub const DEFAULT_PLAYLISTS: &[&str] = &["Liked Songs", "My Playlist", "Chill"];

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self { data_dir: None }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn load_settings(&self) -> Settings {
        let mut settings: Settings = self.load(Self::SETTINGS_FILENAME).unwrap_or_default();
        if settings.music_folder.is_relative()
            && let Some(data_dir) = &self.data_dir
        {
            settings.music_folder = data_dir.join(&settings.music_folder);
        }
        settings
    }

    pub fn save_settings(&self, settings: &Settings) {
        self.save(Self::SETTINGS_FILENAME, settings);
    }

    pub fn load_playlists(&self) -> PlaylistMap {
        self.load(Self::PLAYLISTS_FILENAME)
            .unwrap_or_else(default_playlists)
    }

    pub fn save_playlists(&self, playlists: &PlaylistMap) {
        self.save(Self::PLAYLISTS_FILENAME, playlists);
    }

    pub fn load_history(&self) -> Vec<TrackId> {
        self.load(Self::HISTORY_FILENAME).unwrap_or_default()
    }

    pub fn save_history(&self, history: &[TrackId]) {
        self.save(Self::HISTORY_FILENAME, history);
    }

    fn load<T: DeserializeOwned>(&self, filename: &str) -> Option<T> {
        let path = self.data_dir.as_ref()?.join(filename);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no {filename} found, using defaults");
                return None;
            }
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("failed to parse {}, using defaults: {e}", path.display());
                None
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, filename: &str, value: &T) {
        let Some(data_dir) = &self.data_dir else {
            return;
        };
        let path = data_dir.join(filename);
        let contents = match serde_json::to_string_pretty(value) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("failed to serialize {filename}: {e}");
                return;
            }
        };
        match std::fs::write(&path, contents) {
            Ok(()) => tracing::debug!("saved {}", path.display()),
            Err(e) => tracing::warn!("failed to save {}: {e}", path.display()),
        }
    }
}

/// The playlists created on first run, all empty.
pub fn default_playlists() -> PlaylistMap {
    Storage::DEFAULT_PLAYLISTS
        .iter()
        .map(|name| (name.to_string(), vec![]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bs::RepeatMode;

    #[test]
    fn missing_files_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let settings = storage.load_settings();
        assert_eq!(settings.music_folder, dir.path().join("music"));
        assert_eq!(settings.volume, Settings::DEFAULT_VOLUME);
        assert_eq!(
            storage.load_playlists().keys().collect::<Vec<_>>(),
            ["Chill", "Liked Songs", "My Playlist"]
        );
        assert!(storage.load_history().is_empty());
    }

    #[test]
    fn malformed_files_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(Storage::SETTINGS_FILENAME), "{not json").unwrap();
        std::fs::write(dir.path().join(Storage::PLAYLISTS_FILENAME), "[1, 2, 3]").unwrap();
        std::fs::write(dir.path().join(Storage::HISTORY_FILENAME), r#"{"a": 1}"#).unwrap();

        let storage = Storage::new(dir.path());
        assert_eq!(storage.load_settings().repeat_mode, RepeatMode::Off);
        assert_eq!(storage.load_playlists(), default_playlists());
        assert!(storage.load_history().is_empty());
    }

    #[test]
    fn state_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let settings = Settings {
            music_folder: dir.path().join("tunes"),
            volume: 0.4,
            repeat_mode: RepeatMode::One,
            last_open_playlist: Some("Chill".to_string()),
            mini_player: true,
        };
        storage.save_settings(&settings);
        assert_eq!(storage.load_settings(), settings);

        let mut playlists = default_playlists();
        playlists.insert("Road".to_string(), vec![TrackId::from("a"), TrackId::from("b")]);
        storage.save_playlists(&playlists);
        assert_eq!(storage.load_playlists(), playlists);

        storage.save_history(&[TrackId::from("b")]);
        assert_eq!(storage.load_history(), vec![TrackId::from("b")]);
    }

    #[test]
    fn in_memory_storage_never_touches_disk() {
        let storage = Storage::in_memory();
        storage.save_history(&[TrackId::from("a")]);
        assert!(storage.load_history().is_empty());
        assert_eq!(storage.load_settings().music_folder, PathBuf::from("music"));
    }
}
