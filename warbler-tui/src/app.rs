use std::time::Instant;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use warbler_core::{
    self as wc, App, Command, FrameOutcome, InputEvent,
    view::{Drag, Modal, View},
    warbler_state::{Track, TrackId},
};

use crate::{
    config::Config,
    cover_art::CoverArtCache,
    keys::{self, Action},
    ui::{
        self, Areas, Hit,
        layout::{self, PAGE_SCROLL_SIZE, ROW_UNITS, SEEK_STEP_SECS, VOLUME_STEP},
        modals::{self, ModalOption},
        settings,
        sidebar::{self, SidebarEntry},
    },
};

/// The terminal front-end: the dispatcher plus the state only a terminal
/// needs (keyboard selection, art colours, last drawn layout).
pub struct Tui {
    pub core: App,
    pub config: Config,
    pub art: CoverArtCache,

    /// Keyboard-selected row in the current view.
    pub selected: usize,
    /// Highlighted option in the open modal.
    pub modal_cursor: usize,
    pub needs_redraw: bool,
    /// Where everything was drawn last frame, for mouse hit-testing.
    pub areas: Areas,

    shown: (View, Option<String>),
    modal_kind: Option<std::mem::Discriminant<Modal>>,
    /// Terminal input waiting for the next tick.
    pending: Vec<TermInput>,
    /// Dispatcher events produced by the input being translated.
    outbox: Vec<InputEvent>,
}

/// Terminal input the dispatcher hasn't seen yet.
#[derive(Debug, Clone, Copy)]
enum TermInput {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

impl Tui {
    pub fn new(core: App, config: Config) -> Self {
        let art = CoverArtCache::new(
            config.general.art_cache_size,
            warbler_client_shared::cover_art_cache::DEFAULT_THUMBNAIL_SIZE,
        );
        let shown = Self::shown_page(&core);
        Self {
            core,
            config,
            art,
            selected: 0,
            modal_cursor: 0,
            needs_redraw: true,
            areas: Areas::default(),
            shown,
            modal_kind: None,
            pending: Vec::new(),
            outbox: Vec::new(),
        }
    }

    fn shown_page(core: &App) -> (View, Option<String>) {
        let view = core.view();
        (view.view(), view.selected_playlist().map(str::to_string))
    }

    /// Runs the dispatcher frame for `now`.
    ///
    /// Buffered input is translated in arrival order, each piece against
    /// the state the previous one left, and every resulting event reaches
    /// the dispatcher through [`App::frame`] at the same instant.
    pub fn tick(&mut self, now: Instant) -> FrameOutcome {
        let mut outcome = self.core.frame(now, self.outbox.drain(..));
        self.sync();
        for input in std::mem::take(&mut self.pending) {
            if outcome == FrameOutcome::Quit {
                break;
            }
            match input {
                TermInput::Key(key) => self.key_input(&key),
                TermInput::Mouse(mouse) => self.mouse_input(&mouse),
            }
            outcome = self.core.frame(now, self.outbox.drain(..));
            self.sync();
        }
        self.needs_redraw = true;
        outcome
    }

    pub fn has_pending_input(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn should_quit(&self) -> bool {
        self.core.should_quit()
    }

    fn send(&mut self, event: InputEvent) {
        self.outbox.push(event);
    }

    fn command(&mut self, command: Command) {
        self.send(InputEvent::Command(command));
    }

    /// Keeps terminal-side selection consistent with the dispatcher.
    fn sync(&mut self) {
        let shown = Self::shown_page(&self.core);
        if shown != self.shown {
            self.shown = shown;
            self.selected = 0;
        }
        let modal_kind = self.core.view().modal().map(std::mem::discriminant);
        if modal_kind != self.modal_kind {
            self.modal_kind = modal_kind;
            self.modal_cursor = 0;
        }
        self.selected = self.selected.min(self.row_count().saturating_sub(1));
    }

    /// Number of selectable rows in the current view.
    pub fn row_count(&self) -> usize {
        match self.core.view().view() {
            View::Queue => self.core.queued_tracks().len(),
            View::Settings => settings::ROWS.len(),
            _ => self.core.active_list().len(),
        }
    }

    /// The track under the selection, in views that list tracks.
    pub fn selected_track(&self) -> Option<&Track> {
        match self.core.view().view() {
            View::Queue => self
                .core
                .queued_tracks()
                .get(self.selected)
                .map(|(_, track)| *track),
            View::Settings => None,
            _ => self.core.active_list().get(self.selected).copied(),
        }
    }

    fn selected_track_id(&self) -> Option<TrackId> {
        self.selected_track().map(|t| t.id.clone())
    }

    /// Queue index of the selected queue row.
    fn selected_queue_index(&self) -> Option<usize> {
        self.core
            .queued_tracks()
            .get(self.selected)
            .map(|(index, _)| *index)
    }

    pub fn select(&mut self, row: usize) {
        self.selected = row.min(self.row_count().saturating_sub(1));
        let viewport = self.areas.list.height as f32 * ROW_UNITS;
        self.core.view_mut().scroll.ensure_visible(
            self.selected as f32 * ROW_UNITS,
            ROW_UNITS,
            viewport,
        );
    }

    fn move_selection(&mut self, delta: i64) {
        let last = self.row_count().saturating_sub(1) as i64;
        let row = (self.selected as i64 + delta).clamp(0, last.max(0));
        self.select(row as usize);
    }

    // ── Keyboard ─────────────────────────────────────────────────────────

    /// Buffers a key press for the next tick.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        self.needs_redraw = true;
        self.pending.push(TermInput::Key(*key));
    }

    fn key_input(&mut self, key: &KeyEvent) {
        let text_focus = self.core.view().has_text_focus();
        let action = if text_focus {
            keys::text_action(key)
        } else {
            keys::browse_action(key)
        };
        let Some(action) = action else {
            return;
        };

        if !text_focus && self.core.view().modal().is_some() {
            self.modal_key(action);
            return;
        }

        match action {
            Action::Quit => self.send(InputEvent::Close),
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-(PAGE_SCROLL_SIZE as i64)),
            Action::PageDown => self.move_selection(PAGE_SCROLL_SIZE as i64),
            Action::GotoTop => self.select(0),
            Action::GotoBottom => self.select(usize::MAX),
            Action::Select => self.activate_selected(),
            Action::NextView => self.cycle_view(1),
            Action::PreviousView => self.cycle_view(-1),
            Action::QueueNext => {
                if let Some(id) = self.selected_track_id() {
                    self.command(Command::QueueNext(id));
                }
            }
            Action::AddToPlaylist => {
                if let Some(id) = self.selected_track_id() {
                    self.command(Command::ShowAddToPlaylist(id));
                }
            }
            Action::Remove => self.remove_selected(),
            Action::NewPlaylist => self.command(Command::ShowCreatePlaylist),
            Action::PlaylistMenu => {
                if let Some(name) = self.core.view().selected_playlist().map(str::to_string) {
                    let anchor = (self.areas.list.x as f32, self.areas.list.y as f32);
                    self.command(Command::ShowContextMenu {
                        playlist_name: name,
                        anchor,
                    });
                }
            }
            Action::ConfirmYes => {}
            Action::SeekForward => self.seek_relative(SEEK_STEP_SECS),
            Action::SeekBackward => self.seek_relative(-SEEK_STEP_SECS),
            Action::VolumeUp => self.adjust_volume(VOLUME_STEP),
            Action::VolumeDown => self.adjust_volume(-VOLUME_STEP),
            Action::Rescan => self.command(Command::Rescan),
            Action::Core(key) => self.send(InputEvent::Key(key)),
        }
    }

    fn modal_key(&mut self, action: Action) {
        let options = modals::options(&self.core);
        match action {
            Action::Quit => self.send(InputEvent::Close),
            Action::MoveUp => self.modal_cursor = self.modal_cursor.saturating_sub(1),
            Action::MoveDown => {
                self.modal_cursor = (self.modal_cursor + 1).min(options.len().saturating_sub(1));
            }
            Action::Select => match options.get(self.modal_cursor) {
                Some(option) => self.activate_modal_option(option.clone()),
                None => self.command(Command::DismissModal),
            },
            Action::ConfirmYes if options.contains(&ModalOption::Confirm) => {
                self.activate_modal_option(ModalOption::Confirm);
            }
            // Transport stays live under the modal
            Action::Core(key) => self.send(InputEvent::Key(key)),
            Action::SeekForward => self.seek_relative(SEEK_STEP_SECS),
            Action::SeekBackward => self.seek_relative(-SEEK_STEP_SECS),
            Action::VolumeUp => self.adjust_volume(VOLUME_STEP),
            Action::VolumeDown => self.adjust_volume(-VOLUME_STEP),
            _ => {}
        }
    }

    fn activate_modal_option(&mut self, option: ModalOption) {
        self.command(match option {
            ModalOption::NewPlaylist => Command::ShowCreatePlaylist,
            ModalOption::AddTo(name) => Command::AddToPlaylist(name),
            ModalOption::Open => Command::ContextOpen,
            ModalOption::Delete => Command::ContextDelete,
            ModalOption::Confirm => Command::ConfirmDelete,
            ModalOption::Cancel => Command::DismissModal,
        });
    }

    fn activate_selected(&mut self) {
        match self.core.view().view() {
            View::Queue => {
                if let Some(index) = self.selected_queue_index() {
                    self.command(Command::PlayQueued(index));
                }
            }
            View::Settings => {
                if let Some(command) = settings::activate(&self.core, self.selected) {
                    self.command(command);
                }
            }
            _ => {
                if let Some(id) = self.selected_track_id() {
                    self.command(Command::PlayTrack(id));
                }
            }
        }
    }

    fn remove_selected(&mut self) {
        match self.core.view().view() {
            View::Queue => {
                if let Some(index) = self.selected_queue_index() {
                    self.command(Command::RemoveQueued(index));
                }
            }
            View::Playlist => {
                if let Some(id) = self.selected_track_id() {
                    self.command(Command::RemoveFromPlaylist(id));
                }
            }
            _ => {}
        }
    }

    fn cycle_view(&mut self, step: i64) {
        let entries: Vec<SidebarEntry> = sidebar::entries(&self.core)
            .into_iter()
            .filter(|e| *e != SidebarEntry::NewPlaylist)
            .collect();
        if entries.is_empty() {
            return;
        }
        let current = sidebar::current_index(&self.core, &entries).unwrap_or(0) as i64;
        let next = (current + step).rem_euclid(entries.len() as i64) as usize;
        if let Some(command) = entries[next].command() {
            self.command(command);
        }
    }

    pub fn seek_relative(&mut self, seconds: f64) {
        let session = self.core.session();
        if session.current_track().is_none() {
            return;
        }
        let target = (session.progress() + seconds).clamp(0.0, session.progress_max());
        self.command(Command::Seek(target));
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        let volume = (self.core.session().volume() + delta).clamp(0.0, 1.0);
        self.command(Command::SetVolume(volume));
    }

    // ── Mouse ────────────────────────────────────────────────────────────

    /// Buffers a mouse event for the next tick.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if mouse.kind == MouseEventKind::Moved {
            return;
        }
        self.pending.push(TermInput::Mouse(*mouse));
    }

    fn mouse_input(&mut self, mouse: &MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = ui::hit_test(self, x, y);
                if let Some(Hit::Modal(option)) = hit {
                    if let Some(index) = option {
                        self.modal_cursor = index;
                        if let Some(option) = modals::options(&self.core).get(index).cloned() {
                            self.activate_modal_option(option);
                        }
                    }
                    return;
                }
                match self.click_command(hit) {
                    Some(command) => self.command(command),
                    None if self.core.view().modal().is_some() => {
                        self.command(Command::DismissModal)
                    }
                    None => {}
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                let command = match ui::hit_test(self, x, y) {
                    Some(Hit::Row(row)) if self.core.view().view() != View::Settings => {
                        self.selected = row;
                        self.selected_track_id().map(Command::ShowAddToPlaylist)
                    }
                    Some(Hit::Sidebar(SidebarEntry::Playlist(playlist_name))) => {
                        Some(Command::ShowContextMenu {
                            playlist_name,
                            anchor: (x as f32, y as f32),
                        })
                    }
                    _ => None,
                };
                if let Some(command) = command {
                    self.command(command);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = self.core.view().drag().copied() else {
                    return;
                };
                let position = match drag {
                    Drag::Progress => {
                        layout::fraction(x, self.areas.scrub.x, self.areas.scrub.width)
                    }
                    Drag::Volume => {
                        let bar = layout::volume_bar(self.areas.volume);
                        layout::fraction(x, bar.x, bar.width)
                    }
                    Drag::Scrollbar => match self.areas.scrollbar {
                        Some(track) => layout::fraction(y, track.y, track.height),
                        None => return,
                    },
                    Drag::QueueItem { .. } => y as f32,
                };
                self.command(Command::DragTo(position));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.core.view().drag().is_some() {
                        self.command(Command::EndDrag);
                }
            }
            MouseEventKind::ScrollUp => {
                self.send(InputEvent::Wheel(-1.0));
            }
            MouseEventKind::ScrollDown => {
                self.send(InputEvent::Wheel(1.0));
            }
            _ => {}
        }
    }

    /// The command a left click on `hit` issues. Row clicks also move the
    /// selection; clicking the selected track plays it.
    fn click_command(&mut self, hit: Option<Hit>) -> Option<Command> {
        let view = self.core.view().view();
        match hit? {
            Hit::Modal(_) => None,
            Hit::Transport(action) => Some(Command::Perform(action)),
            Hit::Scrub(fraction) => Some(Command::BeginSeekDrag(fraction)),
            Hit::Volume(fraction) => Some(Command::BeginVolumeDrag(fraction)),
            Hit::Scrollbar(fraction) => Some(Command::BeginScrollbarDrag(fraction)),
            Hit::SearchBox => Some(Command::Perform(wc::keys::Action::FocusSearch)),
            Hit::Sidebar(entry) => entry.command(),
            Hit::Row(row) => match view {
                View::Queue => {
                    self.selected = row;
                    self.selected_queue_index()?;
                    Some(Command::BeginQueueDrag {
                        row,
                        y: self.areas.list.y as f32 + (row - self.areas.first_row) as f32,
                        row_pitch: 1.0,
                    })
                }
                View::Settings => {
                    self.selected = row;
                    settings::activate(&self.core, row)
                }
                _ => {
                    let already_selected = self.selected == row;
                    self.selected = row;
                    if already_selected {
                        self.selected_track_id().map(Command::PlayTrack)
                    } else {
                        None
                    }
                }
            },
            Hit::RowAction(row) => {
                self.selected = row;
                match view {
                    View::Queue => self.selected_queue_index().map(Command::RemoveQueued),
                    View::Playlist => self.selected_track_id().map(Command::RemoveFromPlaylist),
                    _ => self.selected_track_id().map(Command::QueueNext),
                }
            }
        }
    }
}
