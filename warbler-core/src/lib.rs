pub mod audio;
pub mod keys;
pub mod util;
pub mod view;

mod app;
pub use app::{App, AppArgs, Command, FrameOutcome, InputEvent};

mod config;
pub use config::Settings;

mod history;
pub use history::HistoryLog;

mod playlists;
pub use playlists::PlaylistStore;

mod queue;
pub use queue::PlayQueue;

mod scroll;
pub use scroll::ScrollState;

mod session;
pub use session::{Session, SessionArgs};

mod storage;
pub use storage::{PlaylistMap, Storage, default_playlists};

#[cfg(test)]
mod test_support;

pub use warbler_state;
use warbler_state as bs;
