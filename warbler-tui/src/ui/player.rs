use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};
use warbler_core::{keys::Action as CoreAction, util::format_time, warbler_state::RepeatMode};

use super::{
    ACCENT, BACKGROUND, DIM, DURATION_COLOR, art_row_spans,
    layout::{
        self, ART_COLS, ART_LEFT_MARGIN, TRANSPORT_BTN_NEXT, TRANSPORT_BTN_PLAY,
        TRANSPORT_BTN_PREV, TRANSPORT_BTN_REPEAT, TRANSPORT_BTN_SHUFFLE, TRANSPORT_BTN_WIDTH,
    },
    string_to_color, truncate,
};
use crate::app::Tui;

const BUTTONS: [(u16, CoreAction); 5] = [
    (TRANSPORT_BTN_SHUFFLE, CoreAction::ToggleShuffle),
    (TRANSPORT_BTN_PREV, CoreAction::Previous),
    (TRANSPORT_BTN_PLAY, CoreAction::TogglePlay),
    (TRANSPORT_BTN_NEXT, CoreAction::Next),
    (TRANSPORT_BTN_REPEAT, CoreAction::CycleRepeat),
];

/// The transport button under `(x, y)`. Buttons sit on the middle row.
pub fn transport_hit(area: Rect, x: u16, y: u16) -> Option<CoreAction> {
    if y != area.y + 1 || x < area.x {
        return None;
    }
    let column = x - area.x;
    BUTTONS
        .iter()
        .find(|(offset, _)| column >= *offset && column < offset + TRANSPORT_BTN_WIDTH)
        .map(|(_, action)| *action)
}

pub fn draw(frame: &mut Frame, tui: &mut Tui, area: Rect, scrub_area: Rect) {
    let player = layout::split_player(area);
    tui.areas.transport = player.transport;

    let session = tui.core.session();
    match session.current_track() {
        Some(track) => {
            let art = tui
                .art
                .get(track, tui.core.tag_reader())
                .copied()
                .unwrap_or_default();
            if player.album_art.height > 1 {
                let art_rect = Rect::new(
                    player.album_art.x + ART_LEFT_MARGIN,
                    player.album_art.y + 1,
                    ART_COLS.min(player.album_art.width),
                    1,
                );
                frame.render_widget(Paragraph::new(Line::from(art_row_spans(&art))), art_rect);
            }

            let width = player.track_info.width as usize;
            let info = vec![
                Line::from(""),
                Line::from(Span::styled(
                    truncate(&track.title, width),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    truncate(&track.artist, width),
                    Style::default().fg(string_to_color(&track.artist)),
                )),
            ];
            frame.render_widget(Paragraph::new(info), player.track_info);
        }
        None => draw_idle(frame, tui, player.track_info),
    }

    draw_transport(frame, tui, player.transport);
    draw_scrub_bar(frame, tui, scrub_area);
}

fn draw_idle(frame: &mut Frame, tui: &Tui, area: Rect) {
    let track_count = tui.core.session().library().len();
    let status = if track_count > 0 {
        format!("{track_count} tracks in library")
    } else {
        "No tracks found. Set the music folder in Settings.".to_string()
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "warbler",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(status, Style::default().fg(DIM))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_transport(frame: &mut Frame, tui: &Tui, area: Rect) {
    let session = tui.core.session();
    let on = Style::default().fg(ACCENT);
    let off = Style::default().fg(DIM);
    let plain = Style::default().fg(Color::White);

    let (play_icon, play_style) = if session.is_playing() {
        (" \u{23F8} ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
    } else {
        (" \u{25B6} ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    };
    let repeat = match session.repeat_mode() {
        RepeatMode::Off => Span::styled(" \u{21BB} ", off),
        RepeatMode::All => Span::styled(" \u{21BB} ", on),
        RepeatMode::One => Span::styled(" \u{21BB}\u{00B9}", on),
    };

    let gap = || Span::raw(" ");
    let buttons = Line::from(vec![
        gap(),
        Span::styled(" \u{21C4} ", if session.shuffle() { on } else { off }),
        gap(),
        Span::styled(" \u{23EE} ", plain),
        gap(),
        Span::styled(play_icon, play_style),
        gap(),
        Span::styled(" \u{23ED} ", plain),
        gap(),
        repeat,
    ]);

    let mut mode = session.repeat_mode().as_str().to_string();
    if session.shuffle() {
        mode.push_str(" \u{00B7} Shuffle");
    }
    let lines = vec![
        Line::from(""),
        buttons,
        Line::from(Span::styled(format!(" [{mode}]"), off)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_scrub_bar(frame: &mut Frame, tui: &mut Tui, area: Rect) {
    let sv = layout::split_scrub_volume(area);
    tui.areas.scrub = sv.scrub_bar;
    tui.areas.volume = sv.volume;

    let session = tui.core.session();
    let (position, duration) = if session.current_track().is_some() {
        (session.progress(), session.progress_max())
    } else {
        (0.0, 0.0)
    };
    let ratio = if duration > 0.0 {
        (position / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT).bg(BACKGROUND))
        .ratio(ratio)
        .label(format!(
            " {} / {} ",
            format_time(position),
            format_time(duration)
        ));
    frame.render_widget(gauge, sv.scrub_bar);

    // "♪ ████░░░░ nn%"
    let volume = session.volume();
    let bar_width = (sv.volume.width as usize).saturating_sub(layout::VOLUME_BAR_PADDING as usize);
    let filled = ((volume * bar_width as f32).round() as usize).min(bar_width);
    let empty = bar_width.saturating_sub(filled);
    let dragging = matches!(
        tui.core.view().drag(),
        Some(warbler_core::view::Drag::Volume)
    );
    let color = if dragging { ACCENT } else { DURATION_COLOR };

    let line = Line::from(vec![
        Span::styled("\u{266A} ", Style::default().fg(color)),
        Span::styled("\u{2588}".repeat(filled), Style::default().fg(color)),
        Span::styled("\u{2591}".repeat(empty), Style::default().fg(DIM)),
        Span::styled(
            format!(" {:3.0}%", volume * 100.0),
            Style::default().fg(color),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), sv.volume);
}
