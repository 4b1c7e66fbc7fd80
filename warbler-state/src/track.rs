use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A track ID, derived from the track's file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub String);
impl TrackId {
    /// Builds the ID for the file at `path`.
    pub fn from_path(path: &Path) -> Self {
        TrackId(path.to_string_lossy().into_owned())
    }
}
impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        TrackId(value.to_string())
    }
}

/// A track, as `warbler` cares about it
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// The track ID
    pub id: TrackId,
    /// The track title
    pub title: String,
    /// The track artist
    pub artist: String,
    /// The duration in seconds
    pub duration: u32,
    /// The file backing this track. Placeholder entries have none.
    pub file_path: Option<PathBuf>,
}
impl Track {
    /// Duration used when tags cannot be read (3:30).
    pub const FALLBACK_DURATION: u32 = 210;

    /// Whether this track can be handed to an audio output.
    pub fn is_playable(&self) -> bool {
        self.file_path.is_some()
    }

    /// Whether `needle` (already lowercased) appears in the title or artist.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.artist.to_lowercase().contains(needle)
    }
}
