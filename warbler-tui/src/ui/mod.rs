pub(crate) mod layout;
pub(crate) mod modals;
pub(crate) mod player;
pub(crate) mod queue;
pub(crate) mod settings;
pub(crate) mod sidebar;
pub(crate) mod tracks;

use std::hash::{Hash as _, Hasher as _};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use unicode_width::{UnicodeWidthChar as _, UnicodeWidthStr as _};
use warbler_core::{keys::Action as CoreAction, view::View};

use crate::{app::Tui, cover_art::ArtColors, keys};

use layout::{ROW_UNITS, contains};
use sidebar::SidebarEntry;

pub const BACKGROUND: Color = Color::Rgb(18, 18, 24);
pub const ACCENT: Color = Color::Cyan;
pub const SELECTED_BG: Color = Color::Rgb(40, 40, 60);
pub const DIM: Color = Color::DarkGray;
pub const DURATION_COLOR: Color = Color::Rgb(100, 180, 150);

/// Where each interactive element was drawn last frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Areas {
    pub transport: Rect,
    pub scrub: Rect,
    pub volume: Rect,
    pub sidebar: Rect,
    pub list: Rect,
    /// Index of the row drawn at the top of `list`.
    pub first_row: usize,
    pub scrollbar: Option<Rect>,
    pub search_box: Option<Rect>,
    pub modal: Option<Rect>,
    pub modal_options: Option<Rect>,
}

/// What a pointer position lands on.
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    /// Inside the open modal, possibly on one of its options.
    Modal(Option<usize>),
    Transport(CoreAction),
    Scrub(f32),
    Volume(f32),
    Scrollbar(f32),
    SearchBox,
    Sidebar(SidebarEntry),
    Row(usize),
    /// The action column at the end of a row.
    RowAction(usize),
}

pub const ROW_ACTION_WIDTH: u16 = 2;

pub fn hit_test(tui: &Tui, x: u16, y: u16) -> Option<Hit> {
    let areas = &tui.areas;
    if let Some(modal) = areas.modal
        && contains(modal, x, y)
    {
        let option = areas
            .modal_options
            .filter(|options| contains(*options, x, y))
            .map(|options| (y - options.y) as usize);
        return Some(Hit::Modal(option));
    }
    if contains(areas.transport, x, y) {
        return player::transport_hit(areas.transport, x, y).map(Hit::Transport);
    }
    if contains(areas.scrub, x, y) {
        return Some(Hit::Scrub(layout::fraction(
            x,
            areas.scrub.x,
            areas.scrub.width,
        )));
    }
    let volume_bar = layout::volume_bar(areas.volume);
    if contains(volume_bar, x, y) {
        return Some(Hit::Volume(layout::fraction(
            x,
            volume_bar.x,
            volume_bar.width,
        )));
    }
    if contains(areas.sidebar, x, y) {
        return sidebar::entry_at(&tui.core, areas.sidebar, y).map(Hit::Sidebar);
    }
    if let Some(search_box) = areas.search_box
        && contains(search_box, x, y)
    {
        return Some(Hit::SearchBox);
    }
    if let Some(scrollbar) = areas.scrollbar
        && contains(scrollbar, x, y)
    {
        return Some(Hit::Scrollbar(layout::fraction(
            y,
            scrollbar.y,
            scrollbar.height,
        )));
    }
    if contains(areas.list, x, y) {
        let row = areas.first_row + (y - areas.list.y) as usize;
        if row >= tui.row_count() {
            return None;
        }
        let on_action = x >= areas.list.right().saturating_sub(ROW_ACTION_WIDTH);
        if on_action && tui.core.view().view() != View::Settings {
            return Some(Hit::RowAction(row));
        }
        return Some(Hit::Row(row));
    }
    None
}

pub fn draw(frame: &mut Frame, tui: &mut Tui) {
    let size = frame.area();
    tui.areas = Areas::default();

    let bg = Block::default().style(Style::default().bg(BACKGROUND));
    frame.render_widget(bg, size);

    let mini = tui.core.settings().mini_player;
    let main = if mini {
        layout::split_mini(size)
    } else {
        layout::split_main(size)
    };

    player::draw(frame, tui, main.player, main.scrub_bar);

    if !mini {
        tui.areas.sidebar = sidebar::draw(frame, &tui.core, main.sidebar);
        match tui.core.view().view() {
            View::Queue => queue::draw(frame, tui, main.content),
            View::Settings => settings::draw(frame, tui, main.content),
            View::Library | View::Search | View::Playlist | View::History => {
                tracks::draw(frame, tui, main.content)
            }
        }
    }

    draw_help_bar(frame, mini, main.help_bar);
    modals::draw(frame, tui, size);
}

/// Sizes the scroll range for a list of `total_rows` in `area` and returns
/// where the rows go. Records the list geometry for hit-testing.
pub(crate) fn begin_list(tui: &mut Tui, area: Rect, total_rows: usize) -> Rect {
    let geometry = layout::list_geometry(area, total_rows);
    let scroll = &mut tui.core.view_mut().scroll;
    scroll.set_bounds(
        total_rows as f32 * ROW_UNITS,
        geometry.rows.height as f32 * ROW_UNITS,
    );
    tui.areas.first_row = (scroll.offset() / ROW_UNITS).floor() as usize;
    tui.areas.list = geometry.rows;
    tui.areas.scrollbar = geometry.scrollbar;
    geometry.rows
}

/// Renders the scrollbar recorded by [`begin_list`], if the list overflows.
pub(crate) fn draw_scrollbar(frame: &mut Frame, tui: &Tui) {
    let Some(track) = tui.areas.scrollbar else {
        return;
    };
    let height = track.height as usize;
    let total = tui.row_count().max(1);
    let thumb = (height * height / total).clamp(1, height);
    let fraction = tui.core.view().scroll.fraction();
    let start = ((height - thumb) as f32 * fraction).round() as usize;

    let lines: Vec<Line> = (0..height)
        .map(|row| {
            if row >= start && row < start + thumb {
                Line::from(Span::styled("\u{2588}", Style::default().fg(DIM)))
            } else {
                Line::from(Span::styled("\u{2502}", Style::default().fg(SELECTED_BG)))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), track);
}

fn draw_help_bar(frame: &mut Frame, mini: bool, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    let mut push = |key: &str, label: &str| {
        spans.push(Span::styled(key.to_string(), Style::default().fg(ACCENT)));
        spans.push(Span::styled(
            format!(":{label} "),
            Style::default().fg(Color::Gray),
        ));
    };

    if mini {
        let key = warbler_core::keys::KEY_MINI_PLAYER.label().to_lowercase();
        push(&key, "full player");
    }
    for action in keys::BROWSE_HELP {
        if let Some((key, label)) = action.help_label() {
            push(key.as_str(), label.as_str());
        }
    }

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(BACKGROUND));
    frame.render_widget(help, area);
}

/// Builds half-block art spans for one terminal row from a 4x2 color grid.
pub(crate) fn art_row_spans(colors: &ArtColors) -> Vec<Span<'static>> {
    (0..4)
        .map(|col| {
            Span::styled(
                "\u{2580}",
                Style::default()
                    .fg(colors.colors[0][col])
                    .bg(colors.colors[1][col]),
            )
        })
        .collect()
}

/// Cuts `s` to at most `width` columns, ending with an ellipsis if cut.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

/// Truncates or pads `s` to exactly `width` columns.
pub fn fit(s: &str, width: usize) -> String {
    let mut out = truncate(s, width);
    let pad = width.saturating_sub(out.width());
    out.extend(std::iter::repeat_n(' ', pad));
    out
}

/// Hashes a string to produce a pleasing colour.
pub fn string_to_color(s: &str) -> Color {
    const DISTINCT_COLOURS: u64 = 36_000;

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    let hue = (hasher.finish() % DISTINCT_COLOURS) as f32 / DISTINCT_COLOURS as f32;
    hsv_to_color([hue, 0.75, 0.75])
}

/// HSV (all 0-1, value linear) to a gamma-corrected terminal colour.
fn hsv_to_color([h, s, v]: [f32; 3]) -> Color {
    let h = (h.fract() + 1.0).fract();
    let s = s.clamp(0.0, 1.0);

    let f = h * 6.0 - (h * 6.0).floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let [r, g, b] = match (h * 6.0).floor() as i32 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    };

    fn gamma_u8_from_linear_f32(l: f32) -> u8 {
        if l <= 0.0 {
            0
        } else if l <= 0.0031308 {
            (3294.6 * l + 0.5) as u8
        } else if l <= 1.0 {
            (269.025 * l.powf(1.0 / 2.4) - 14.025 + 0.5) as u8
        } else {
            255
        }
    }

    Color::Rgb(
        gamma_u8_from_linear_f32(r),
        gamma_u8_from_linear_f32(g),
        gamma_u8_from_linear_f32(b),
    )
}
