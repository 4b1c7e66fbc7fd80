use std::{path::PathBuf, time::Instant};

use crate::{
    PlaylistStore, Session, SessionArgs, Settings, Storage,
    audio::AudioOutput,
    bs::{Library, RepeatMode, TagReader, Track, TrackId, auto_discover},
    keys::{self, Action, KEY_ESCAPE, Key, TextEdit},
    view::{Drag, Escape, Modal, View, ViewState},
};

/// Input for one frame, in the order it occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(Key),
    /// Wheel notches; positive scrolls down.
    Wheel(f32),
    /// A semantic action resolved by the front-end's hit-testing.
    Command(Command),
    /// The window or terminal asked to close.
    Close,
}

/// Pointer-driven actions. Positions are fractions of the control's extent
/// unless noted.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Perform(Action),
    ShowView(View),
    OpenPlaylist(String),

    PlayTrack(TrackId),
    QueueNext(TrackId),
    ShowAddToPlaylist(TrackId),
    /// Removes the track from the selected playlist.
    RemoveFromPlaylist(TrackId),

    SetRepeatMode(RepeatMode),
    SetVolume(f32),
    /// Seconds into the current track.
    Seek(f64),

    ShowCreatePlaylist,
    ShowContextMenu {
        playlist_name: String,
        anchor: (f32, f32),
    },
    /// Picks a playlist in the add-to-playlist modal.
    AddToPlaylist(String),
    SubmitPlaylistName,
    ContextOpen,
    ContextDelete,
    ConfirmDelete,
    DismissModal,

    PlayQueued(usize),
    RemoveQueued(usize),

    BeginSeekDrag(f32),
    BeginVolumeDrag(f32),
    BeginScrollbarDrag(f32),
    /// `row` indexes [`App::queued_tracks`]; `y` and `row_pitch` are in
    /// the renderer's units.
    BeginQueueDrag {
        row: usize,
        y: f32,
        row_pitch: f32,
    },
    /// A fraction for slider drags, or `y` for queue drags.
    DragTo(f32),
    EndDrag,
    ScrollTo(f32),

    EditMusicFolder,
    SubmitMusicFolder,
    Rescan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Everything needed to start an [`App`].
pub struct AppArgs {
    pub storage: Storage,
    /// Where music folder auto-discovery starts.
    pub app_root: PathBuf,
    /// Overrides (and persists) the configured music folder.
    pub music_folder: Option<PathBuf>,
    pub output: Box<dyn AudioOutput>,
    pub tag_reader: Box<dyn TagReader>,
    pub rng_seed: Option<u64>,
}

/// The event dispatcher: owns the session, the view state and the stores,
/// and applies one frame of input at a time.
pub struct App {
    session: Session,
    view: ViewState,
    playlists: PlaylistStore,
    settings: Settings,
    storage: Storage,
    tag_reader: Box<dyn TagReader>,
    /// Instant of the last frame; momentum steps once per instant.
    last_frame: Option<Instant>,
    should_quit: bool,
    shut_down: bool,
}
impl App {
    pub fn new(args: AppArgs) -> Self {
        let AppArgs {
            storage,
            app_root,
            music_folder,
            output,
            tag_reader,
            rng_seed,
        } = args;

        let mut settings = storage.load_settings();
        let mut settings_changed = false;
        if let Some(music_folder) = music_folder {
            settings.music_folder = music_folder;
            settings_changed = true;
        }

        let discovery = auto_discover(&app_root, &settings.music_folder);
        if discovery.changed {
            settings.music_folder = discovery.folder;
            settings_changed = true;
        }

        let library = Library::scan(&settings.music_folder, tag_reader.as_ref()).or_placeholder();
        let playlists = PlaylistStore::load(storage.clone());
        let session = Session::new(SessionArgs {
            library,
            history: storage.load_history(),
            output,
            storage: storage.clone(),
            volume: settings.volume,
            repeat_mode: settings.repeat_mode,
            rng_seed,
        });
        settings.volume = session.volume();

        let mut view = ViewState::default();
        if let Some(name) = settings.last_open_playlist.as_deref()
            && playlists.contains(name)
        {
            view.open_playlist(name);
        }

        let app = Self {
            session,
            view,
            playlists,
            settings,
            storage,
            tag_reader,
            last_frame: None,
            should_quit: false,
            shut_down: false,
        };
        if settings_changed {
            app.save_settings();
        }
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn playlists(&self) -> &PlaylistStore {
        &self.playlists
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tag_reader(&self) -> &dyn TagReader {
        self.tag_reader.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The tracks being browsed; see [`ViewState::active_list`].
    pub fn active_list(&self) -> Vec<&Track> {
        self.view.active_list(
            self.session.library(),
            &self.playlists,
            self.session.history(),
        )
    }

    fn active_ids(&self) -> Vec<TrackId> {
        self.active_list().into_iter().map(|t| t.id.clone()).collect()
    }

    /// The queue, skipping entries no longer in the library. Each item
    /// keeps its index in the underlying queue.
    pub fn queued_tracks(&self) -> Vec<(usize, &Track)> {
        let library = self.session.library();
        self.session
            .queue()
            .iter()
            .enumerate()
            .filter_map(|(i, id)| library.get(id).map(|t| (i, t)))
            .collect()
    }

    /// Runs one frame: advances the progress clock and scroll momentum,
    /// then applies `events` in order.
    ///
    /// Further frames at the same `now` only apply their events, so a
    /// front-end may split one tick's input across several calls.
    pub fn frame(
        &mut self,
        now: Instant,
        events: impl IntoIterator<Item = InputEvent>,
    ) -> FrameOutcome {
        let active = self.active_ids();
        self.session.advance_clock(now, &active);
        if self.last_frame.replace(now) != Some(now) {
            self.view.scroll.tick();
        }

        for event in events {
            self.handle(event);
            if self.should_quit {
                break;
            }
        }
        self.view.scroll.clamp();

        if self.should_quit {
            FrameOutcome::Quit
        } else {
            FrameOutcome::Continue
        }
    }

    fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Wheel(notches) => {
                if self.view.modal().is_none() {
                    self.view.scroll.wheel(notches);
                }
            }
            InputEvent::Command(command) => self.handle_command(command),
            InputEvent::Close => {
                tracing::info!("close requested");
                self.should_quit = true;
            }
        }
    }

    fn handle_key(&mut self, key: Key) {
        if key == KEY_ESCAPE {
            match self.view.escape() {
                Escape::Quit => {
                    tracing::info!("quit requested");
                    self.should_quit = true;
                }
                Escape::ClosedModal(modal) => tracing::debug!("closed {modal:?}"),
                Escape::CancelledTextEntry => tracing::debug!("cancelled text entry"),
            }
            return;
        }

        if self.view.has_text_focus() {
            if let Some(edit) = keys::text_edit(key) {
                self.edit_text(edit);
            }
            return;
        }

        let Some(action) = keys::action(key) else {
            return;
        };
        // The shortcuts overlay swallows everything but its own toggle
        if self.view.modal() == Some(&Modal::Shortcuts) && action != Action::ToggleShortcuts {
            return;
        }
        self.perform(action);
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::TogglePlay => self.session.toggle_play(),
            Action::Next => {
                let active = self.active_ids();
                self.session.next(&active);
            }
            Action::Previous => {
                let active = self.active_ids();
                self.session.prev(&active);
            }
            Action::ToggleShuffle => {
                let shuffle = self.session.toggle_shuffle();
                tracing::debug!("shuffle {}", if shuffle { "on" } else { "off" });
            }
            Action::CycleRepeat => {
                self.session.cycle_repeat_mode();
                self.save_settings();
            }
            Action::ToggleMiniPlayer => {
                self.settings.mini_player = !self.settings.mini_player;
                self.save_settings();
            }
            Action::ToggleShortcuts => {
                if self.view.modal() == Some(&Modal::Shortcuts) {
                    self.view.close_modal();
                } else {
                    self.view.open_modal(Modal::Shortcuts);
                }
            }
            Action::FocusSearch => {
                // Typed text must reach the search box
                self.view.close_modal();
                self.view.activate_search();
            }
        }
    }

    fn edit_text(&mut self, edit: TextEdit) {
        if let Some(Modal::CreatePlaylist { draft_name }) = self.view.modal_mut() {
            match edit {
                TextEdit::Insert(c) => {
                    if draft_name.chars().count() < PlaylistStore::MAX_NAME_LEN && !c.is_control() {
                        draft_name.push(c);
                    }
                }
                TextEdit::Backspace => {
                    draft_name.pop();
                }
                TextEdit::Commit => {
                    let name = std::mem::take(draft_name);
                    self.view.close_modal();
                    self.playlists.create(&name);
                }
            }
            return;
        }

        if self.view.folder_draft().is_some() {
            match edit {
                TextEdit::Insert(c) => self.view.push_folder_char(c),
                TextEdit::Backspace => self.view.pop_folder_char(),
                TextEdit::Commit => self.commit_music_folder(),
            }
            return;
        }

        match edit {
            TextEdit::Insert(c) => self.view.push_search_char(c),
            TextEdit::Backspace => self.view.pop_search_char(),
            TextEdit::Commit => self.view.commit_search(),
        }
    }

    fn handle_command(&mut self, command: Command) {
        // Drag motion isn't a click: it is never blocked and cancels nothing
        match command {
            Command::DragTo(position) => return self.drag_to(position),
            Command::EndDrag => return self.end_drag(),
            _ => {}
        }

        if self.view.folder_draft().is_some()
            && !matches!(
                command,
                Command::EditMusicFolder | Command::SubmitMusicFolder
            )
        {
            self.view.take_folder_draft();
        }

        let command = match self.view.modal().cloned() {
            Some(modal) => match self.route_to_modal(modal, command) {
                Some(command) => command,
                None => return,
            },
            None => command,
        };

        match command {
            Command::Perform(action) => self.perform(action),
            Command::ShowView(view) => self.view.set_view(view),
            Command::OpenPlaylist(name) => self.open_playlist(&name),

            Command::PlayTrack(id) => {
                self.session.play(&id, 0.0);
            }
            Command::QueueNext(id) => {
                if self.session.library().get(&id).is_some_and(Track::is_playable) {
                    self.session.queue_mut().enqueue(id, true);
                }
            }
            Command::ShowAddToPlaylist(track_id) => {
                self.view.open_modal(Modal::AddToPlaylist { track_id });
            }
            Command::RemoveFromPlaylist(id) => {
                if let Some(name) = self.view.selected_playlist() {
                    self.playlists.remove(&id, name);
                }
            }

            Command::SetRepeatMode(repeat_mode) => {
                self.session.set_repeat_mode(repeat_mode);
                self.save_settings();
            }
            Command::SetVolume(volume) => self.set_volume(volume),
            Command::Seek(offset) => self.session.seek(offset),

            Command::ShowCreatePlaylist => {
                self.view.open_modal(Modal::CreatePlaylist {
                    draft_name: String::new(),
                });
            }
            Command::ShowContextMenu {
                playlist_name,
                anchor,
            } => {
                if self.playlists.contains(&playlist_name) {
                    self.view.open_modal(Modal::ContextMenu {
                        playlist_name,
                        anchor,
                    });
                }
            }
            Command::AddToPlaylist(_)
            | Command::SubmitPlaylistName
            | Command::ContextOpen
            | Command::ContextDelete
            | Command::ConfirmDelete
            | Command::DismissModal => {
                tracing::debug!("ignoring {command:?} with no modal open");
            }

            Command::PlayQueued(index) => {
                if let Some(id) = self.session.queue_mut().remove_at(index) {
                    self.session.play(&id, 0.0);
                }
            }
            Command::RemoveQueued(index) => {
                self.session.queue_mut().remove_at(index);
            }

            Command::BeginSeekDrag(fraction) => {
                if self.view.begin_drag(Drag::Progress) {
                    self.session.set_seek_dragging(true);
                    self.session
                        .seek(fraction.clamp(0.0, 1.0) as f64 * self.session.progress_max());
                }
            }
            Command::BeginVolumeDrag(fraction) => {
                if self.view.begin_drag(Drag::Volume) {
                    self.set_volume(fraction);
                }
            }
            Command::BeginScrollbarDrag(fraction) => {
                if self.view.begin_drag(Drag::Scrollbar) {
                    self.view.scroll.scroll_to_fraction(fraction);
                }
            }
            Command::BeginQueueDrag { row, y, row_pitch } => {
                if row < self.queued_tracks().len() {
                    self.view.begin_drag(Drag::QueueItem {
                        row,
                        anchor: y,
                        offset: 0.0,
                        row_pitch,
                    });
                }
            }
            Command::DragTo(_) | Command::EndDrag => {}
            Command::ScrollTo(fraction) => self.view.scroll.scroll_to_fraction(fraction),

            Command::EditMusicFolder => {
                let current = self.settings.music_folder.to_string_lossy().into_owned();
                self.view.begin_folder_edit(&current);
            }
            Command::SubmitMusicFolder => self.commit_music_folder(),
            Command::Rescan => self.rescan(),
        }
    }

    /// Applies `command` to the open modal. Returns the command if it should
    /// also reach the page underneath.
    fn route_to_modal(&mut self, modal: Modal, command: Command) -> Option<Command> {
        match (modal, command) {
            (_, Command::DismissModal) | (Modal::Shortcuts, _) => {
                self.view.close_modal();
                None
            }

            (Modal::AddToPlaylist { track_id }, Command::AddToPlaylist(name)) => {
                self.view.close_modal();
                self.playlists.add(&track_id, &name);
                None
            }
            (Modal::AddToPlaylist { .. }, Command::ShowCreatePlaylist) => {
                self.view.open_modal(Modal::CreatePlaylist {
                    draft_name: String::new(),
                });
                None
            }
            (Modal::CreatePlaylist { draft_name }, Command::SubmitPlaylistName) => {
                self.view.close_modal();
                self.playlists.create(&draft_name);
                None
            }
            (Modal::AddToPlaylist { .. } | Modal::CreatePlaylist { .. }, _) => None,

            (Modal::ConfirmDelete { playlist_name }, Command::ConfirmDelete) => {
                self.view.close_modal();
                self.delete_playlist(&playlist_name);
                None
            }
            (Modal::ConfirmDelete { .. }, _) => {
                self.view.close_modal();
                None
            }

            (Modal::ContextMenu { playlist_name, .. }, Command::ContextOpen) => {
                self.view.close_modal();
                self.open_playlist(&playlist_name);
                None
            }
            (Modal::ContextMenu { playlist_name, .. }, Command::ContextDelete) => {
                self.view.open_modal(Modal::ConfirmDelete { playlist_name });
                None
            }
            (Modal::ContextMenu { .. }, command) => {
                self.view.close_modal();
                Some(command)
            }
        }
    }

    fn drag_to(&mut self, position: f32) {
        let Some(drag) = self.view.drag().copied() else {
            return;
        };
        match drag {
            Drag::Progress => {
                let offset = position.clamp(0.0, 1.0) as f64 * self.session.progress_max();
                self.session.scrub_to(offset);
            }
            Drag::Volume => self.set_volume(position),
            Drag::Scrollbar => self.view.scroll.scroll_to_fraction(position),
            Drag::QueueItem { anchor, .. } => {
                if let Some(Drag::QueueItem { offset, .. }) = self.view.drag_mut() {
                    *offset = position - anchor;
                }
            }
        }
    }

    fn end_drag(&mut self) {
        let Some(drag) = self.view.end_drag() else {
            return;
        };
        match drag {
            Drag::Progress => self.session.set_seek_dragging(false),
            Drag::QueueItem { row, .. } => {
                // Rows skip stale entries; the queue moves by raw index
                let visible: Vec<usize> = self.queued_tracks().iter().map(|(i, _)| *i).collect();
                let Some(target) = drag.queue_drop_row(visible.len()) else {
                    return;
                };
                if let (Some(&from), Some(&to)) = (visible.get(row), visible.get(target))
                    && self.session.queue_mut().move_item(from, to)
                {
                    tracing::debug!("moved queue item {from} to {to}");
                }
            }
            Drag::Volume | Drag::Scrollbar => {}
        }
    }

    fn open_playlist(&mut self, name: &str) {
        if !self.playlists.contains(name) {
            return;
        }
        self.view.open_playlist(name);
        self.settings.last_open_playlist = Some(name.to_string());
        self.save_settings();
    }

    fn delete_playlist(&mut self, name: &str) {
        if !self.playlists.delete(name) {
            return;
        }
        self.view.playlist_deleted(name);
        if self.settings.last_open_playlist.as_deref() == Some(name) {
            self.settings.last_open_playlist = None;
            self.save_settings();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.session.set_volume(volume);
        self.save_settings();
    }

    fn commit_music_folder(&mut self) {
        let Some(draft) = self.view.take_folder_draft() else {
            return;
        };
        let draft = draft.trim();
        if draft.is_empty() {
            return;
        }
        let folder = PathBuf::from(draft);
        if let Err(e) = std::fs::create_dir_all(&folder) {
            tracing::warn!("can't use {} as the music folder: {e}", folder.display());
            return;
        }
        tracing::info!("music folder changed to {}", folder.display());
        self.settings.music_folder = folder;
        self.rescan();
        self.save_settings();
    }

    /// Rebuilds the library from the configured music folder.
    pub fn rescan(&mut self) {
        let library =
            Library::scan(&self.settings.music_folder, self.tag_reader.as_ref()).or_placeholder();
        self.session.replace_library(library);
        self.view.scroll.reset();
    }

    fn save_settings(&self) {
        let settings = Settings {
            volume: self.session.volume(),
            repeat_mode: self.session.repeat_mode(),
            ..self.settings.clone()
        };
        self.storage.save_settings(&settings);
    }

    /// Persists every store and stops the audio output. Runs once; later
    /// calls (including the one from `Drop`) do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        tracing::info!("shutting down");

        self.settings.volume = self.session.volume();
        self.settings.repeat_mode = self.session.repeat_mode();
        self.storage.save_settings(&self.settings);
        self.playlists.save();
        self.session.shutdown();
    }
}
impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
