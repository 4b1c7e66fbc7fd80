//! Representations of warbler's state, as well as a way to build it from a local music folder.
//!
//! Separated out to allow for use in other utilities.
#![deny(missing_docs)]

mod library;
pub use library::{
    AUDIO_EXTENSIONS, Discovery, Library, MUSIC_FOLDER_NAMES, PLACEHOLDER_ID, auto_discover,
    count_audio_files, is_audio_file,
};

mod repeat_mode;
pub use repeat_mode::RepeatMode;

mod tags;
pub use tags::{LoftyTagReader, TagInfo, TagReader};

mod track;
pub use track::{Track, TrackId};
