use crate::{
    HistoryLog, PlaylistStore, ScrollState,
    bs::{Library, Track, TrackId},
};

/// The page shown in the main content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Library,
    Search,
    Playlist,
    Queue,
    History,
    Settings,
}
impl View {
    /// The views reachable from the sidebar, in order. Playlist views are
    /// reached by picking a playlist instead.
    pub const SIDEBAR: [View; 5] = [
        View::Library,
        View::Search,
        View::Queue,
        View::History,
        View::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Library => "Library",
            View::Search => "Search",
            View::Playlist => "Playlist",
            View::Queue => "Queue",
            View::History => "History",
            View::Settings => "Settings",
        }
    }
}

/// An overlay that captures input until it is dismissed.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    AddToPlaylist { track_id: TrackId },
    CreatePlaylist { draft_name: String },
    ConfirmDelete { playlist_name: String },
    Shortcuts,
    ContextMenu { playlist_name: String, anchor: (f32, f32) },
}
impl Modal {
    /// Whether the modal owns a text entry.
    pub fn takes_text(&self) -> bool {
        matches!(self, Modal::CreatePlaylist { .. })
    }
}

/// A pointer drag in progress. Only one can be active at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drag {
    Progress,
    Volume,
    Scrollbar,
    /// `row` counts only the queue entries still in the library.
    QueueItem {
        row: usize,
        anchor: f32,
        offset: f32,
        row_pitch: f32,
    },
}
impl Drag {
    /// The visible row a dragged queue item lands on, given how many
    /// rows the queue shows.
    pub fn queue_drop_row(&self, visible_len: usize) -> Option<usize> {
        let Drag::QueueItem {
            row,
            offset,
            row_pitch,
            ..
        } = *self
        else {
            return None;
        };
        if visible_len == 0 || row_pitch <= 0.0 {
            return None;
        }
        let shift = (offset / row_pitch).round() as i64;
        let target = (row as i64 + shift).clamp(0, visible_len as i64 - 1);
        Some(target as usize)
    }
}

/// What pressing Escape did.
#[derive(Debug, Clone, PartialEq)]
pub enum Escape {
    ClosedModal(Modal),
    CancelledTextEntry,
    Quit,
}

/// UI navigation state that isn't playback.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    view: View,
    selected_playlist: Option<String>,
    search_query: String,
    search_active: bool,
    folder_draft: Option<String>,
    modal: Option<Modal>,
    drag: Option<Drag>,
    pub scroll: ScrollState,
}
impl ViewState {
    pub const MAX_SEARCH_LEN: usize = 120;
    pub const MAX_FOLDER_LEN: usize = 260;

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_playlist(&self) -> Option<&str> {
        self.selected_playlist.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_search_active(&self) -> bool {
        self.search_active
    }

    pub fn folder_draft(&self) -> Option<&str> {
        self.folder_draft.as_deref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    /// Switches to a non-playlist view, deselecting any playlist and
    /// resetting the scroll position.
    pub fn set_view(&mut self, view: View) {
        if view != View::Playlist {
            self.selected_playlist = None;
        }
        if view != self.view {
            self.scroll.reset();
        }
        self.view = view;
    }

    pub fn open_playlist(&mut self, name: &str) {
        self.selected_playlist = Some(name.to_string());
        self.view = View::Playlist;
        self.scroll.reset();
    }

    /// Leaves a playlist that no longer exists.
    pub fn playlist_deleted(&mut self, name: &str) {
        if self.selected_playlist.as_deref() == Some(name) {
            self.selected_playlist = None;
            self.view = View::Library;
            self.scroll.reset();
        }
    }

    /// Opens `modal`, returning the one it superseded.
    pub fn open_modal(&mut self, modal: Modal) -> Option<Modal> {
        self.modal.replace(modal)
    }

    pub fn close_modal(&mut self) -> Option<Modal> {
        self.modal.take()
    }

    pub fn modal_mut(&mut self) -> Option<&mut Modal> {
        self.modal.as_mut()
    }

    /// Starts `drag` unless another drag is already active.
    pub fn begin_drag(&mut self, drag: Drag) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.drag = Some(drag);
        true
    }

    pub fn drag_mut(&mut self) -> Option<&mut Drag> {
        self.drag.as_mut()
    }

    pub fn end_drag(&mut self) -> Option<Drag> {
        self.drag.take()
    }

    pub fn activate_search(&mut self) {
        self.set_view(View::Search);
        self.search_active = true;
    }

    /// Stops typing into the search box, keeping the query.
    pub fn commit_search(&mut self) {
        self.search_active = false;
    }

    pub fn push_search_char(&mut self, c: char) {
        if self.search_query.chars().count() < Self::MAX_SEARCH_LEN && !c.is_control() {
            self.search_query.push(c);
            self.scroll.reset();
        }
    }

    pub fn pop_search_char(&mut self) {
        if self.search_query.pop().is_some() {
            self.scroll.reset();
        }
    }

    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.scroll.reset();
    }

    pub fn begin_folder_edit(&mut self, current: &str) {
        self.folder_draft = Some(current.chars().take(Self::MAX_FOLDER_LEN).collect());
    }

    pub fn push_folder_char(&mut self, c: char) {
        if let Some(draft) = &mut self.folder_draft
            && draft.chars().count() < Self::MAX_FOLDER_LEN
            && !c.is_control()
        {
            draft.push(c);
        }
    }

    pub fn pop_folder_char(&mut self) {
        if let Some(draft) = &mut self.folder_draft {
            draft.pop();
        }
    }

    pub fn take_folder_draft(&mut self) -> Option<String> {
        self.folder_draft.take()
    }

    /// Whether typed characters go to a text entry rather than shortcuts.
    pub fn has_text_focus(&self) -> bool {
        self.modal.as_ref().is_some_and(Modal::takes_text)
            || (self.modal.is_none() && (self.search_active || self.folder_draft.is_some()))
    }

    /// Escape closes the modal, else cancels text entry, else quits.
    pub fn escape(&mut self) -> Escape {
        if let Some(modal) = self.modal.take() {
            return Escape::ClosedModal(modal);
        }
        if self.folder_draft.take().is_some() {
            return Escape::CancelledTextEntry;
        }
        if self.search_active {
            self.clear_search();
            return Escape::CancelledTextEntry;
        }
        Escape::Quit
    }

    /// The tracks the current view shows, in display order.
    ///
    /// IDs no longer in the library are skipped. Views without a track list
    /// of their own browse the whole library.
    pub fn active_list<'a>(
        &self,
        library: &'a Library,
        playlists: &PlaylistStore,
        history: &HistoryLog,
    ) -> Vec<&'a Track> {
        let everything = || -> Vec<&'a Track> { library.tracks().iter().collect() };
        match self.view {
            View::Search => {
                let needle = self.search_query.to_lowercase();
                if needle.is_empty() {
                    return everything();
                }
                library
                    .tracks()
                    .iter()
                    .filter(|t| t.matches(&needle))
                    .collect()
            }
            View::Playlist => match self
                .selected_playlist
                .as_deref()
                .and_then(|name| playlists.get(name))
            {
                Some(ids) => ids.iter().filter_map(|id| library.get(id)).collect(),
                None => everything(),
            },
            View::History => history
                .recent_unique()
                .into_iter()
                .filter_map(|id| library.get(id))
                .collect(),
            View::Library | View::Queue | View::Settings => everything(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Storage,
        storage::default_playlists,
        test_support::{id, library},
    };

    fn titles(tracks: &[&Track]) -> Vec<String> {
        tracks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn search_filters_case_insensitively() {
        let library = library(&["Chill Vibes", "Lofi Study", "Rock"]);
        let playlists = PlaylistStore::new(default_playlists(), Storage::in_memory());
        let history = HistoryLog::default();

        let mut view = ViewState::default();
        let search = |view: &mut ViewState, query: &str| {
            view.clear_search();
            view.activate_search();
            for c in query.chars() {
                view.push_search_char(c);
            }
            titles(&view.active_list(&library, &playlists, &history))
        };
        assert_eq!(search(&mut view, "CHILL "), ["Chill Vibes"]);
        // Spaces are part of the query
        assert_eq!(search(&mut view, "vibes "), Vec::<String>::new());
        assert_eq!(search(&mut view, " rock"), Vec::<String>::new());

        view.clear_search();
        view.activate_search();
        let list = view.active_list(&library, &playlists, &history);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn playlist_and_history_skip_stale_ids() {
        let library = library(&["a", "b"]);
        let mut playlists = PlaylistStore::new(default_playlists(), Storage::in_memory());
        playlists.add(&id("b"), "Chill");
        playlists.add(&id("gone"), "Chill");
        playlists.add(&id("a"), "Chill");
        let history = HistoryLog::new(vec![id("a"), id("gone"), id("b"), id("a")]);

        let mut view = ViewState::default();
        view.open_playlist("Chill");
        let list = view.active_list(&library, &playlists, &history);
        assert_eq!(titles(&list), ["b", "a"]);

        view.set_view(View::History);
        assert_eq!(view.selected_playlist(), None);
        let list = view.active_list(&library, &playlists, &history);
        assert_eq!(titles(&list), ["a", "b"]);

        view.set_view(View::Queue);
        assert_eq!(view.active_list(&library, &playlists, &history).len(), 2);
    }

    #[test]
    fn modals_supersede_each_other() {
        let mut view = ViewState::default();
        assert_eq!(view.open_modal(Modal::Shortcuts), None);
        let previous = view.open_modal(Modal::ConfirmDelete {
            playlist_name: "Chill".to_string(),
        });
        assert_eq!(previous, Some(Modal::Shortcuts));
        assert!(matches!(view.modal(), Some(Modal::ConfirmDelete { .. })));
    }

    #[test]
    fn only_one_drag_at_a_time() {
        let mut view = ViewState::default();
        assert!(view.begin_drag(Drag::Progress));
        assert!(!view.begin_drag(Drag::Volume));
        assert_eq!(view.end_drag(), Some(Drag::Progress));
        assert!(view.begin_drag(Drag::Volume));
    }

    #[test]
    fn queue_drop_row_rounds_and_clamps() {
        let drag = |row, offset| Drag::QueueItem {
            row,
            anchor: 0.0,
            offset,
            row_pitch: 30.0,
        };
        assert_eq!(drag(0, 70.0).queue_drop_row(5), Some(2));
        assert_eq!(drag(1, -100.0).queue_drop_row(5), Some(0));
        assert_eq!(drag(3, 400.0).queue_drop_row(5), Some(4));
        assert_eq!(drag(3, 14.0).queue_drop_row(5), Some(3));
        assert_eq!(Drag::Volume.queue_drop_row(5), None);
    }

    #[test]
    fn escape_unwinds_one_layer_at_a_time() {
        let mut view = ViewState::default();
        view.activate_search();
        view.push_search_char('x');
        view.open_modal(Modal::Shortcuts);

        assert_eq!(view.escape(), Escape::ClosedModal(Modal::Shortcuts));
        assert!(view.has_text_focus());
        assert_eq!(view.escape(), Escape::CancelledTextEntry);
        assert_eq!(view.search_query(), "");
        assert!(!view.has_text_focus());
        assert_eq!(view.escape(), Escape::Quit);
    }

    #[test]
    fn text_entries_are_bounded() {
        let mut view = ViewState::default();
        view.activate_search();
        for _ in 0..200 {
            view.push_search_char('a');
        }
        assert_eq!(view.search_query().len(), ViewState::MAX_SEARCH_LEN);

        view.begin_folder_edit("/music");
        view.push_folder_char('/');
        view.pop_folder_char();
        view.pop_folder_char();
        assert_eq!(view.folder_draft(), Some("/musi"));
    }
}
