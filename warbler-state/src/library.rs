use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{TagReader, Track, TrackId};

/// File extensions (lowercase) that are treated as audio.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

/// Folder names probed by [`auto_discover`].
pub const MUSIC_FOLDER_NAMES: &[&str] = &[
    "music", "Music", "songs", "Songs", "audio", "Audio", "tracks", "Tracks",
];

/// The ID of the entry substituted into an empty library.
pub const PLACEHOLDER_ID: &str = "demo_0";

/// The ordered catalog of tracks, sorted by title.
///
/// A library is never mutated in place; rescanning builds a new one.
#[derive(Debug, Clone, Default)]
pub struct Library {
    tracks: Vec<Track>,
    index: HashMap<TrackId, usize>,
}

impl Library {
    /// Builds a library from `tracks`, dropping duplicate IDs (first wins)
    /// and sorting by title.
    pub fn new(tracks: Vec<Track>) -> Self {
        let mut seen = HashMap::new();
        let mut tracks: Vec<Track> = tracks
            .into_iter()
            .filter(|t| seen.insert(t.id.clone(), ()).is_none())
            .collect();
        sort_by_title(&mut tracks);

        let index = tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        Self { tracks, index }
    }

    /// Scans `folder` (non-recursively) for audio files.
    ///
    /// Titles fall back to the file stem, artists to `"Unknown"` and
    /// durations to 3:30 when the tags can't be read. An inaccessible folder
    /// yields an empty library.
    pub fn scan(folder: &Path, tag_reader: &dyn TagReader) -> Self {
        let files = match audio_files(folder) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("music folder {} not accessible: {e}", folder.display());
                return Self::default();
            }
        };

        let tracks = files
            .into_iter()
            .map(|path| {
                let tags = tag_reader.read(&path);
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Track {
                    id: TrackId::from_path(&path),
                    title: tags.title.unwrap_or(stem),
                    artist: tags.artist.unwrap_or_else(|| "Unknown".to_string()),
                    duration: tags.duration_seconds.unwrap_or(Track::FALLBACK_DURATION),
                    file_path: Some(path),
                }
            })
            .collect();

        let library = Self::new(tracks);
        tracing::info!(
            "scanned {} tracks from {}",
            library.len(),
            folder.display()
        );
        library
    }

    /// A library holding only the "no audio found" entry, which is not playable.
    pub fn placeholder() -> Self {
        Self::new(vec![Track {
            id: TrackId(PLACEHOLDER_ID.to_string()),
            title: "Drop audio files".to_string(),
            artist: "in the music folder".to_string(),
            duration: 0,
            file_path: None,
        }])
    }

    /// Returns `self`, or [`Library::placeholder`] if it is empty.
    pub fn or_placeholder(self) -> Self {
        if self.is_empty() {
            Self::placeholder()
        } else {
            self
        }
    }

    /// All tracks, in display order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Looks up a track by ID.
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.index.get(id).map(|&i| &self.tracks[i])
    }

    /// Whether the library contains a track with this ID.
    pub fn contains(&self, id: &TrackId) -> bool {
        self.index.contains_key(id)
    }

    /// The first track, if any.
    pub fn first(&self) -> Option<&Track> {
        self.tracks.first()
    }

    /// The number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether there are no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// The outcome of [`auto_discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// The folder to scan.
    pub folder: PathBuf,
    /// Whether `folder` differs from the configured folder and should be persisted.
    pub changed: bool,
}

/// Picks a music folder at startup.
///
/// Keeps `configured` if it holds audio. Otherwise probes [`MUSIC_FOLDER_NAMES`]
/// under `app_root`, its parent, and each immediate subdirectory of `app_root`,
/// choosing the candidate with the most audio files. If nothing is found,
/// `configured` is created empty.
pub fn auto_discover(app_root: &Path, configured: &Path) -> Discovery {
    if count_audio_files(configured) > 0 {
        return Discovery {
            folder: configured.to_path_buf(),
            changed: false,
        };
    }

    tracing::info!("music folder not found or empty, auto-searching");
    let mut best: Option<(usize, PathBuf)> = None;
    for candidate in candidate_folders(app_root) {
        let count = count_audio_files(&candidate);
        if count > 0 && best.as_ref().is_none_or(|(best_count, _)| count > *best_count) {
            best = Some((count, candidate));
        }
    }

    if let Some((count, folder)) = best {
        tracing::info!(
            "auto-detected music folder {} ({count} files)",
            folder.display()
        );
        let changed = folder != configured;
        return Discovery { folder, changed };
    }

    match std::fs::create_dir_all(configured) {
        Ok(()) => tracing::info!("created default music folder {}", configured.display()),
        Err(e) => tracing::warn!(
            "could not create music folder {}: {e}",
            configured.display()
        ),
    }
    Discovery {
        folder: configured.to_path_buf(),
        changed: false,
    }
}

/// Whether `path` has one of the [`AUDIO_EXTENSIONS`].
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// The number of audio files directly inside `dir`; zero if it can't be read.
pub fn count_audio_files(dir: &Path) -> usize {
    audio_files(dir).map(|files| files.len()).unwrap_or(0)
}

fn audio_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = vec![];
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // The folder itself couldn't be read
            Err(e) if e.depth() == 0 => return Err(e),
            Err(e) => {
                tracing::debug!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.into_path();
        if path.is_file() && is_audio_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn candidate_folders(app_root: &Path) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = MUSIC_FOLDER_NAMES
        .iter()
        .map(|name| app_root.join(name))
        .collect();

    if let Some(parent) = app_root.parent() {
        candidates.extend(MUSIC_FOLDER_NAMES.iter().map(|name| parent.join(name)));
    }

    let subdirs = WalkDir::new(app_root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir());
    for subdir in subdirs {
        candidates.extend(
            MUSIC_FOLDER_NAMES
                .iter()
                .map(|name| subdir.path().join(name)),
        );
    }

    candidates.retain(|c| c.is_dir());
    candidates
}

fn sort_by_title(tracks: &mut [Track]) {
    // Digits compare one at a time, so "Track 10" sorts before "Track 2"
    let collator_preferences = icu_collator::CollatorPreferences::default();

    let mut collator_options = icu_collator::options::CollatorOptions::default();
    collator_options.strength = Some(icu_collator::options::Strength::Secondary);
    collator_options.case_level = Some(icu_collator::options::CaseLevel::Off);

    match icu_collator::Collator::try_new(collator_preferences, collator_options) {
        Ok(collator) => tracks.sort_by(|a, b| {
            collator
                .compare(&a.title, &b.title)
                .then_with(|| a.id.cmp(&b.id))
        }),
        Err(e) => {
            tracing::warn!("collator unavailable, sorting by lowercase title: {e}");
            tracks.sort_by_cached_key(|t| (t.title.to_lowercase(), t.id.clone()));
        }
    }
}
