use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use super::{DIM, SELECTED_BG, begin_list, draw_scrollbar, tracks::track_line};
use crate::app::Tui;

/// Draws the up-next queue. While a queue row is being dragged, the row it
/// would land on is highlighted.
pub fn draw(frame: &mut Frame, tui: &mut Tui, area: Rect) {
    let total = tui.row_count();
    let block = Block::default()
        .title(" Up next ")
        .title_bottom(Line::from(format!(" {total} queued ")).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if total == 0 {
        frame.render_widget(
            Paragraph::new("The queue is empty. Press u on a track to play it next.")
                .style(Style::default().fg(DIM)),
            inner,
        );
        return;
    }

    let rows = begin_list(tui, inner, total);
    let dragged = tui
        .core
        .view()
        .drag()
        .and_then(|drag| drag.queue_drop_row(total));

    let lines: Vec<Line> = tui
        .core
        .queued_tracks()
        .into_iter()
        .enumerate()
        .skip(tui.areas.first_row)
        .take(rows.height as usize)
        .map(|(row, (_, track))| {
            let line = track_line(track, rows.width as usize, false, false, "\u{00D7}");
            if dragged == Some(row) {
                line.style(Style::default().bg(Color::Rgb(60, 60, 90)))
            } else if dragged.is_none() && row == tui.selected {
                line.style(Style::default().bg(SELECTED_BG))
            } else {
                line
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows);
    draw_scrollbar(frame, tui);
}
