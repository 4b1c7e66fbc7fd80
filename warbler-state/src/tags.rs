use std::path::Path;

use lofty::{
    file::{AudioFile, TaggedFileExt},
    picture::PictureType,
    tag::Accessor,
};

/// Metadata read from an audio file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagInfo {
    /// The track title
    pub title: Option<String>,
    /// The track artist
    pub artist: Option<String>,
    /// The duration in whole seconds
    pub duration_seconds: Option<u32>,
    /// Raw embedded cover art (encoded image bytes)
    pub cover_bytes: Option<Vec<u8>>,
}

/// Reads metadata from audio files.
///
/// Implementations must never fail: anything unreadable yields
/// [`TagInfo::default`].
pub trait TagReader {
    /// Reads the metadata of the file at `path`.
    fn read(&self, path: &Path) -> TagInfo;
}

/// A [`TagReader`] backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read(&self, path: &Path) -> TagInfo {
        let tagged_file = match lofty::read_from_path(path) {
            Ok(tagged_file) => tagged_file,
            Err(e) => {
                tracing::warn!("couldn't read metadata for {}: {e}", path.display());
                return TagInfo::default();
            }
        };

        let duration_seconds = Some(tagged_file.properties().duration().as_secs() as u32)
            .filter(|secs| *secs > 0);

        // Get the primary tag or first available tag
        let Some(tag) = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
        else {
            return TagInfo {
                duration_seconds,
                ..Default::default()
            };
        };

        let non_empty = |s: std::borrow::Cow<'_, str>| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        let cover_bytes = tag
            .pictures()
            .iter()
            .find(|p| p.pic_type() == PictureType::CoverFront)
            .or_else(|| tag.pictures().first())
            .map(|p| p.data().to_vec());

        TagInfo {
            title: tag.title().and_then(non_empty),
            artist: tag.artist().and_then(non_empty),
            duration_seconds,
            cover_bytes,
        }
    }
}
