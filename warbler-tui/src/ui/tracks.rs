use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr as _;
use warbler_core::{util::format_time, view::View, warbler_state::Track};

use super::{
    ACCENT, DIM, DURATION_COLOR, ROW_ACTION_WIDTH, SELECTED_BG, begin_list, draw_scrollbar,
    layout::DURATION_WIDTH, string_to_color, truncate,
};
use crate::app::Tui;

/// Draws the library, search, playlist and history pages.
pub fn draw(frame: &mut Frame, tui: &mut Tui, area: Rect) {
    let view = tui.core.view().view();
    let total = tui.row_count();
    let title = match view {
        View::Search => " Search ".to_string(),
        View::Playlist => format!(
            " {} ",
            tui.core.view().selected_playlist().unwrap_or("Playlist")
        ),
        View::History => " Recently played ".to_string(),
        _ => " Library ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(format!(" {total} tracks ")).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if view == View::Search {
            Color::Yellow
        } else {
            Color::White
        }));
    let mut inner = block.inner(area);
    frame.render_widget(block, area);

    if view == View::Search && inner.height > 0 {
        let search_box = Rect::new(inner.x, inner.y, inner.width, 1);
        draw_search_box(frame, tui, search_box);
        tui.areas.search_box = Some(search_box);
        inner.y += 1;
        inner.height -= 1;
    }

    if total == 0 {
        let message = match view {
            View::Search => format!("No tracks match \"{}\"", tui.core.view().search_query()),
            View::Playlist => "This playlist is empty. Press a on a track to add it.".to_string(),
            View::History => "Nothing played yet.".to_string(),
            _ => "No tracks found".to_string(),
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(DIM)),
            inner,
        );
        return;
    }

    let rows = begin_list(tui, inner, total);
    let session = tui.core.session();
    let current = session.current_track_id();
    let playing = session.is_playing();
    let action = if view == View::Playlist { "\u{00D7}" } else { "+" };

    let lines: Vec<Line> = tui
        .core
        .active_list()
        .into_iter()
        .enumerate()
        .skip(tui.areas.first_row)
        .take(rows.height as usize)
        .map(|(i, track)| {
            let is_current = current == Some(&track.id);
            let mut line = track_line(track, rows.width as usize, is_current, playing, action);
            if i == tui.selected {
                line = line.style(Style::default().bg(SELECTED_BG));
            }
            line
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows);
    draw_scrollbar(frame, tui);
}

fn draw_search_box(frame: &mut Frame, tui: &Tui, area: Rect) {
    let view = tui.core.view();
    let mut spans = vec![
        Span::styled("/ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            view.search_query().to_string(),
            Style::default().fg(Color::White),
        ),
    ];
    if view.is_search_active() {
        spans.push(Span::styled("\u{2588}", Style::default().fg(Color::Yellow)));
    } else if view.search_query().is_empty() {
        spans.push(Span::styled(
            "press / to search",
            Style::default().fg(DIM),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// One track row: marker, title and artist, duration, and the row action.
pub(crate) fn track_line(
    track: &Track,
    width: usize,
    is_current: bool,
    playing: bool,
    action: &'static str,
) -> Line<'static> {
    let marker = match (is_current, playing) {
        (true, true) => "\u{25B6} ",
        (true, false) => "\u{23F8} ",
        _ => "  ",
    };
    let duration = if track.is_playable() {
        format_time(track.duration as f64)
    } else {
        String::new()
    };

    let text_width = width.saturating_sub(2 + DURATION_WIDTH + ROW_ACTION_WIDTH as usize);
    let title = truncate(&track.title, text_width);
    let artist_width = text_width.saturating_sub(title.width() + 3);
    let artist = truncate(&track.artist, artist_width);
    let used = title.width() + if artist.is_empty() { 0 } else { artist.width() + 3 };

    let title_style = if !track.is_playable() {
        Style::default().fg(DIM)
    } else if is_current {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(ACCENT)),
        Span::styled(title, title_style),
    ];
    if !artist.is_empty() {
        spans.push(Span::styled(" \u{00B7} ", Style::default().fg(DIM)));
        spans.push(Span::styled(
            artist.clone(),
            Style::default().fg(string_to_color(&track.artist)),
        ));
    }
    spans.push(Span::raw(" ".repeat(text_width.saturating_sub(used))));
    spans.push(Span::styled(
        format!("{duration:>DURATION_WIDTH$}"),
        Style::default().fg(DURATION_COLOR),
    ));
    if track.is_playable() {
        spans.push(Span::styled(
            format!("{action:>w$}", w = ROW_ACTION_WIDTH as usize),
            Style::default().fg(DIM),
        ));
    }
    Line::from(spans)
}
