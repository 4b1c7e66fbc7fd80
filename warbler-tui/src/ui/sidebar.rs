use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use warbler_core::{App, Command, view::View};

use super::{ACCENT, SELECTED_BG, fit};

/// One clickable row of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEntry {
    View(View),
    Playlist(String),
    NewPlaylist,
}
impl SidebarEntry {
    pub fn command(&self) -> Option<Command> {
        Some(match self {
            SidebarEntry::View(view) => Command::ShowView(*view),
            SidebarEntry::Playlist(name) => Command::OpenPlaylist(name.clone()),
            SidebarEntry::NewPlaylist => Command::ShowCreatePlaylist,
        })
    }
}

/// Sidebar rows in display order: the fixed views, then playlists, then the
/// create-playlist button.
pub fn entries(app: &App) -> Vec<SidebarEntry> {
    View::SIDEBAR
        .into_iter()
        .map(SidebarEntry::View)
        .chain(
            app.playlists()
                .names()
                .map(|name| SidebarEntry::Playlist(name.to_string())),
        )
        .chain(std::iter::once(SidebarEntry::NewPlaylist))
        .collect()
}

/// Index of the entry for the page currently shown.
pub fn current_index(app: &App, entries: &[SidebarEntry]) -> Option<usize> {
    let view = app.view();
    entries.iter().position(|entry| match entry {
        SidebarEntry::View(v) => *v == view.view(),
        SidebarEntry::Playlist(name) => {
            view.view() == View::Playlist && view.selected_playlist() == Some(name.as_str())
        }
        SidebarEntry::NewPlaylist => false,
    })
}

/// Row layout inside the sidebar's inner area: views, a blank line and a
/// "Playlists" heading, then the playlist rows.
const PLAYLIST_HEADING_ROWS: usize = 2;

fn row_of(index: usize) -> usize {
    if index < View::SIDEBAR.len() {
        index
    } else {
        index + PLAYLIST_HEADING_ROWS
    }
}

/// The entry drawn at `y`, if any.
pub fn entry_at(app: &App, inner: Rect, y: u16) -> Option<SidebarEntry> {
    if y < inner.y || y >= inner.bottom() {
        return None;
    }
    let row = (y - inner.y) as usize;
    entries(app)
        .into_iter()
        .enumerate()
        .find(|(index, _)| row_of(*index) == row)
        .map(|(_, entry)| entry)
}

pub fn draw(frame: &mut Frame, app: &App, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = entries(app);
    let current = current_index(app, &entries);
    let width = inner.width as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if index == View::SIDEBAR.len() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " Playlists",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        let (label, color) = match entry {
            SidebarEntry::View(view) => (view.as_str().to_string(), Color::White),
            SidebarEntry::Playlist(name) => {
                let count = app.playlists().get(name).map_or(0, |ids| ids.len());
                (format!("{name} ({count})"), Color::Rgb(100, 180, 255))
            }
            SidebarEntry::NewPlaylist => ("+ New playlist".to_string(), Color::DarkGray),
        };
        let style = if current == Some(index) {
            Style::default()
                .fg(ACCENT)
                .bg(SELECTED_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        lines.push(Line::from(Span::styled(fit(&format!(" {label}"), width), style)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
    inner
}
