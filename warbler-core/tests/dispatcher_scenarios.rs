mod common;

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use common::CountingOutput;
use warbler_core::{
    App, AppArgs, Command, FrameOutcome, InputEvent, Settings, Storage,
    keys::Key,
    view::View,
    warbler_state::{PLACEHOLDER_ID, RepeatMode, TagInfo, TagReader, TrackId},
};

/// Titles are the file stem; everything lasts two minutes.
struct StemTags;
impl TagReader for StemTags {
    fn read(&self, path: &Path) -> TagInfo {
        TagInfo {
            title: path.file_stem().map(|s| s.to_string_lossy().into_owned()),
            artist: None,
            duration_seconds: Some(120),
            cover_bytes: None,
        }
    }
}

fn write_files(folder: &Path, names: &[&str]) {
    std::fs::create_dir_all(folder).unwrap();
    for name in names {
        std::fs::write(folder.join(name), b"").unwrap();
    }
}

fn start(root: &Path, output: CountingOutput) -> App {
    App::new(AppArgs {
        storage: Storage::new(root),
        app_root: root.to_path_buf(),
        music_folder: None,
        output: Box::new(output),
        tag_reader: Box::new(StemTags),
        rng_seed: Some(3),
    })
}

fn titles(app: &App) -> Vec<String> {
    app.active_list().iter().map(|t| t.title.clone()).collect()
}

#[test]
fn search_narrows_the_active_list() {
    let root = tempfile::tempdir().unwrap();
    write_files(&root.path().join("music"), &["Chill Vibes.mp3", "Study.ogg"]);
    let mut app = start(root.path(), CountingOutput::default());

    let events = [Key::Char('/'), Key::Char('c'), Key::Char('h'), Key::Char('i')]
        .map(InputEvent::Key);
    app.frame(Instant::now(), events);
    assert_eq!(app.view().view(), View::Search);
    assert_eq!(titles(&app), ["Chill Vibes"]);

    // Enter keeps the query but hands keys back to the shortcuts
    app.frame(Instant::now(), [InputEvent::Key(Key::Enter), InputEvent::Key(Key::Space)]);
    assert_eq!(titles(&app), ["Chill Vibes"]);
    assert!(app.session().is_playing());
}

#[test]
fn next_follows_the_browsed_list() {
    let root = tempfile::tempdir().unwrap();
    write_files(&root.path().join("music"), &["a.mp3", "b.mp3", "c.mp3", "d.mp3"]);
    let mut app = start(root.path(), CountingOutput::default());
    let id = |name: &str| TrackId::from_path(&root.path().join("music").join(name));

    let mut playlists_events = vec![];
    for name in ["d.mp3", "b.mp3"] {
        playlists_events.push(InputEvent::Command(Command::ShowAddToPlaylist(id(name))));
        playlists_events.push(InputEvent::Command(Command::AddToPlaylist("Chill".to_string())));
    }
    playlists_events.push(InputEvent::Command(Command::OpenPlaylist("Chill".to_string())));
    playlists_events.push(InputEvent::Command(Command::PlayTrack(id("d.mp3"))));
    playlists_events.push(InputEvent::Key(Key::Right));
    app.frame(Instant::now(), playlists_events);

    assert_eq!(titles(&app), ["d", "b"]);
    assert_eq!(app.session().current_track_id(), Some(&id("b.mp3")));

    // Stopping at the end of the playlist, not the library
    app.frame(Instant::now(), [InputEvent::Key(Key::Right)]);
    assert!(!app.session().is_playing());
}

#[test]
fn track_end_scenario_over_real_frames() {
    let root = tempfile::tempdir().unwrap();
    write_files(&root.path().join("music"), &["A.mp3", "B.mp3"]);
    let mut app = start(root.path(), CountingOutput::default());

    let t0 = Instant::now();
    app.frame(t0, [InputEvent::Key(Key::Space)]);
    let mut now = t0;
    for _ in 0..121 {
        now += Duration::from_secs(1);
        app.frame(now, []);
    }
    let current = app.session().current_track().unwrap();
    assert_eq!(current.title, "B");
    assert!(app.session().is_playing());
    assert!(app.session().progress() < 2.0);
}

#[test]
fn state_survives_a_restart() {
    let root = tempfile::tempdir().unwrap();
    write_files(&root.path().join("music"), &["a.mp3", "b.mp3"]);
    let a = TrackId::from_path(&root.path().join("music").join("a.mp3"));

    {
        let mut app = start(root.path(), CountingOutput::default());
        app.frame(
            Instant::now(),
            [
                InputEvent::Command(Command::PlayTrack(a.clone())),
                InputEvent::Command(Command::ShowAddToPlaylist(a.clone())),
                InputEvent::Command(Command::AddToPlaylist("Liked Songs".to_string())),
                InputEvent::Command(Command::OpenPlaylist("Liked Songs".to_string())),
                InputEvent::Command(Command::SetRepeatMode(RepeatMode::One)),
                InputEvent::Key(Key::Char('m')),
            ],
        );
    }

    let app = start(root.path(), CountingOutput::default());
    assert_eq!(app.view().view(), View::Playlist);
    assert_eq!(app.view().selected_playlist(), Some("Liked Songs"));
    assert_eq!(app.session().repeat_mode(), RepeatMode::One);
    assert!(app.settings().mini_player);
    assert_eq!(app.session().history().entries(), [a.clone()]);
    assert_eq!(app.playlists().get("Liked Songs").unwrap(), [a]);
}

#[test]
fn quitting_tears_down_exactly_once() {
    let root = tempfile::tempdir().unwrap();
    write_files(&root.path().join("music"), &["a.mp3"]);
    let output = CountingOutput::default();
    let mut app = start(root.path(), output.clone());

    let outcome = app.frame(
        Instant::now(),
        [
            InputEvent::Key(Key::Space),
            InputEvent::Close,
            InputEvent::Key(Key::Right),
        ],
    );
    assert_eq!(outcome, FrameOutcome::Quit);
    assert!(app.session().is_playing());

    app.shutdown();
    drop(app);
    assert_eq!(output.count("stop"), 1);
    assert_eq!(Storage::new(root.path()).load_history().len(), 1);
}

#[test]
fn discovery_persists_the_chosen_folder() {
    let root = tempfile::tempdir().unwrap();
    let songs: PathBuf = root.path().join("Songs");
    write_files(&songs, &["x.flac"]);

    let app = start(root.path(), CountingOutput::default());
    assert_eq!(app.settings().music_folder, songs);
    assert_eq!(app.session().library().len(), 1);

    let saved: Settings = Storage::new(root.path()).load_settings();
    assert_eq!(saved.music_folder, songs);
}

#[test]
fn unplayable_placeholder_is_shown_but_inert() {
    let root = tempfile::tempdir().unwrap();
    let output = CountingOutput::default();
    let mut app = start(root.path(), output.clone());
    assert!(root.path().join("music").is_dir());

    let placeholder = TrackId::from(PLACEHOLDER_ID);
    assert_eq!(app.active_list()[0].id, placeholder);
    app.frame(
        Instant::now(),
        [
            InputEvent::Command(Command::PlayTrack(placeholder.clone())),
            InputEvent::Command(Command::QueueNext(placeholder)),
            InputEvent::Key(Key::Right),
        ],
    );
    assert_eq!(app.session().current_track_id(), None);
    assert_eq!(output.count("load"), 0);
}

#[test]
fn wheel_scrolling_has_momentum() {
    let root = tempfile::tempdir().unwrap();
    write_files(&root.path().join("music"), &["a.mp3"]);
    let mut app = start(root.path(), CountingOutput::default());
    app.view_mut().scroll.set_bounds(2000.0, 200.0);

    app.frame(Instant::now(), [InputEvent::Wheel(1.0)]);
    assert_eq!(app.view().scroll.offset(), 0.0);
    app.frame(Instant::now(), []);
    assert_eq!(app.view().scroll.offset(), 25.0);
    app.frame(Instant::now(), []);
    assert!(app.view().scroll.offset() > 47.0);

    app.frame(Instant::now(), [InputEvent::Command(Command::ShowView(View::History))]);
    assert_eq!(app.view().scroll.offset(), 0.0);
}
