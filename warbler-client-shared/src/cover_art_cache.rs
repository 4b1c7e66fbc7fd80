use std::path::{Path, PathBuf};

use warbler_core::warbler_state::{TagReader, Track};

use crate::lru::LruCache;

pub const DEFAULT_CAPACITY: usize = 96;
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 40;

/// Clients implement this to produce their own data from a decoded thumbnail.
/// Called once per track when its art is first requested.
pub trait ClientData: Clone {
    fn from_thumbnail(thumbnail: &image::RgbaImage, path: &Path) -> Self;
}

/// Album art keyed by file path, decoded lazily on first request.
///
/// Tracks without readable art are remembered as misses so their files
/// aren't re-read every frame.
pub struct CoverArtCache<T: ClientData> {
    cache: LruCache<PathBuf, Option<T>>,
    thumbnail_size: u32,
}
impl<T: ClientData> CoverArtCache<T> {
    pub fn new(capacity: usize, thumbnail_size: u32) -> Self {
        Self {
            cache: LruCache::new(capacity),
            thumbnail_size: thumbnail_size.max(1),
        }
    }

    /// Get client data for `track`'s art, reading and decoding it if needed.
    /// Returns `None` for placeholder tracks and tracks without usable art.
    pub fn get(&mut self, track: &Track, tag_reader: &dyn TagReader) -> Option<&T> {
        let path = track.file_path.as_ref()?;
        let thumbnail_size = self.thumbnail_size;
        self.cache
            .get_or_insert_with(path.clone(), || {
                load_thumbnail(path, tag_reader, thumbnail_size)
            })
            .as_ref()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
impl<T: ClientData> Default for CoverArtCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_THUMBNAIL_SIZE)
    }
}

fn load_thumbnail<T: ClientData>(path: &Path, tag_reader: &dyn TagReader, size: u32) -> Option<T> {
    let bytes = tag_reader.read(path).cover_bytes?;
    let image = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(e) => {
            tracing::debug!("couldn't decode cover art for {}: {e}", path.display());
            return None;
        }
    };
    let thumbnail = image
        .resize_to_fill(size, size, image::imageops::FilterType::Triangle)
        .to_rgba8();
    tracing::trace!("decoded cover art for {}", path.display());
    Some(T::from_thumbnail(&thumbnail, path))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use warbler_core::warbler_state::{TagInfo, TrackId};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Corner([u8; 4], u32);
    impl ClientData for Corner {
        fn from_thumbnail(thumbnail: &image::RgbaImage, _path: &Path) -> Self {
            Corner(thumbnail.get_pixel(0, 0).0, thumbnail.width())
        }
    }

    /// Serves a solid red PNG for `.mp3` files and garbage for `.ogg` files.
    #[derive(Default)]
    struct PngTags {
        reads: Cell<usize>,
    }
    impl TagReader for PngTags {
        fn read(&self, path: &Path) -> TagInfo {
            self.reads.set(self.reads.get() + 1);
            let cover_bytes = match path.extension().and_then(|e| e.to_str()) {
                Some("mp3") => {
                    let image = image::RgbaImage::from_pixel(64, 32, image::Rgba([255, 0, 0, 255]));
                    let mut buffer = std::io::Cursor::new(Vec::new());
                    image.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
                    Some(buffer.into_inner())
                }
                Some("ogg") => Some(b"not an image".to_vec()),
                _ => None,
            };
            TagInfo {
                cover_bytes,
                ..Default::default()
            }
        }
    }

    fn track(path: &str) -> Track {
        Track {
            id: TrackId::from(path),
            title: path.to_string(),
            artist: "Unknown".to_string(),
            duration: 1,
            file_path: Some(PathBuf::from(path)),
        }
    }

    #[test]
    fn decodes_square_thumbnails_once() {
        let tags = PngTags::default();
        let mut cache = CoverArtCache::<Corner>::new(4, 8);
        let song = track("/music/song.mp3");

        assert_eq!(cache.get(&song, &tags), Some(&Corner([255, 0, 0, 255], 8)));
        assert_eq!(cache.get(&song, &tags), Some(&Corner([255, 0, 0, 255], 8)));
        assert_eq!(tags.reads.get(), 1);
    }

    #[test]
    fn misses_are_cached_too() {
        let tags = PngTags::default();
        let mut cache = CoverArtCache::<Corner>::new(4, 8);
        let broken = track("/music/broken.ogg");
        let bare = track("/music/bare.flac");

        assert_eq!(cache.get(&broken, &tags), None);
        assert_eq!(cache.get(&bare, &tags), None);
        assert_eq!(cache.get(&broken, &tags), None);
        assert_eq!(tags.reads.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn placeholders_have_no_art() {
        let tags = PngTags::default();
        let mut cache = CoverArtCache::<Corner>::default();
        let placeholder = Track {
            file_path: None,
            ..track("demo")
        };
        assert_eq!(cache.get(&placeholder, &tags), None);
        assert!(cache.is_empty());
        assert_eq!(tags.reads.get(), 0);
    }

    #[test]
    fn capacity_bounds_the_cache() {
        let tags = PngTags::default();
        let mut cache = CoverArtCache::<Corner>::new(2, 4);
        for name in ["a", "b", "c"] {
            cache.get(&track(&format!("/music/{name}.mp3")), &tags);
        }
        assert_eq!(cache.len(), 2);

        cache.get(&track("/music/a.mp3"), &tags);
        assert_eq!(tags.reads.get(), 4);
    }
}
