use ratatui::layout::{Constraint, Direction, Layout, Rect};

// ── Main vertical layout ────────────────────────────────────────────────────

pub const PLAYER_HEIGHT: u16 = 3;
pub const SCRUB_BAR_HEIGHT: u16 = 1;
pub const CONTENT_MIN_HEIGHT: u16 = 3;
pub const HELP_BAR_HEIGHT: u16 = 1;
pub const SIDEBAR_WIDTH: u16 = 24;

pub struct MainLayout {
    pub player: Rect,
    pub scrub_bar: Rect,
    pub sidebar: Rect,
    pub content: Rect,
    pub help_bar: Rect,
}

pub fn split_main(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PLAYER_HEIGHT),
            Constraint::Length(SCRUB_BAR_HEIGHT),
            Constraint::Min(CONTENT_MIN_HEIGHT),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(chunks[2]);
    MainLayout {
        player: chunks[0],
        scrub_bar: chunks[1],
        sidebar: body[0],
        content: body[1],
        help_bar: chunks[3],
    }
}

/// The mini player keeps only the player bar and scrub bar, centred
/// vertically.
pub fn split_mini(area: Rect) -> MainLayout {
    let height = PLAYER_HEIGHT + SCRUB_BAR_HEIGHT;
    let top = area.y + area.height.saturating_sub(height + HELP_BAR_HEIGHT) / 2;
    let clip = |y: u16, h: u16| {
        let y = y.min(area.bottom());
        Rect::new(area.x, y, area.width, h.min(area.bottom() - y))
    };
    MainLayout {
        player: clip(top, PLAYER_HEIGHT),
        scrub_bar: clip(top + PLAYER_HEIGHT, SCRUB_BAR_HEIGHT),
        sidebar: Rect::new(area.x, area.y, 0, 0),
        content: Rect::new(area.x, area.y, 0, 0),
        help_bar: clip(area.bottom().saturating_sub(HELP_BAR_HEIGHT), HELP_BAR_HEIGHT),
    }
}

// ── Player bar horizontal layout ────────────────────────────────────────────

pub const TRACK_INFO_MIN_WIDTH: u16 = 20;
pub const TRANSPORT_WIDTH: u16 = 22;
pub const ART_LEFT_MARGIN: u16 = 1;
pub const ART_COLS: u16 = 4;

pub struct PlayerLayout {
    pub album_art: Rect,
    pub track_info: Rect,
    pub transport: Rect,
}

pub fn split_player(area: Rect) -> PlayerLayout {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(ART_LEFT_MARGIN + ART_COLS + 2),
            Constraint::Min(TRACK_INFO_MIN_WIDTH),
            Constraint::Length(TRANSPORT_WIDTH),
        ])
        .split(area);
    PlayerLayout {
        album_art: chunks[0],
        track_info: chunks[1],
        transport: chunks[2],
    }
}

// ── Transport buttons ───────────────────────────────────────────────────────

/// Column offsets of the transport buttons inside the transport area, on
/// its middle row.
pub const TRANSPORT_BTN_SHUFFLE: u16 = 1;
pub const TRANSPORT_BTN_PREV: u16 = 5;
pub const TRANSPORT_BTN_PLAY: u16 = 9;
pub const TRANSPORT_BTN_NEXT: u16 = 13;
pub const TRANSPORT_BTN_REPEAT: u16 = 17;
pub const TRANSPORT_BTN_WIDTH: u16 = 3;

// ── Scrub bar + volume horizontal layout ────────────────────────────────────

pub const SCRUB_BAR_MIN_WIDTH: u16 = 20;
pub const VOLUME_SLIDER_WIDTH: u16 = 18;
pub const VOLUME_ICON_WIDTH: u16 = 2;
pub const VOLUME_BAR_PADDING: u16 = 7; // = ICON (2) + LABEL (5)

pub struct ScrubVolumeLayout {
    pub scrub_bar: Rect,
    pub volume: Rect,
}

pub fn split_scrub_volume(area: Rect) -> ScrubVolumeLayout {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(SCRUB_BAR_MIN_WIDTH),
            Constraint::Length(VOLUME_SLIDER_WIDTH),
        ])
        .split(area);
    ScrubVolumeLayout {
        scrub_bar: chunks[0],
        volume: chunks[1],
    }
}

/// The clickable bar inside the volume slider, after the icon and before
/// the percentage label.
pub fn volume_bar(volume: Rect) -> Rect {
    Rect::new(
        volume.x + VOLUME_ICON_WIDTH,
        volume.y,
        volume.width.saturating_sub(VOLUME_BAR_PADDING),
        volume.height,
    )
}

// ── Lists ───────────────────────────────────────────────────────────────────

/// Scroll units per list row. The dispatcher's wheel impulse is in these
/// units.
pub const ROW_UNITS: f32 = 25.0;
pub const DURATION_WIDTH: usize = 8;

pub struct ListGeometry {
    pub rows: Rect,
    pub scrollbar: Option<Rect>,
}

/// Splits a list's inner area into rows and, when the content overflows,
/// a one-column scrollbar track on the right.
pub fn list_geometry(area: Rect, total_rows: usize) -> ListGeometry {
    if total_rows <= area.height as usize || area.width < 2 {
        return ListGeometry {
            rows: area,
            scrollbar: None,
        };
    }
    ListGeometry {
        rows: Rect::new(area.x, area.y, area.width - 1, area.height),
        scrollbar: Some(Rect::new(area.right() - 1, area.y, 1, area.height)),
    }
}

/// Fraction of `extent` covered up to `pos`, for slider and scrollbar hits.
pub fn fraction(pos: u16, start: u16, extent: u16) -> f32 {
    if extent <= 1 {
        return 0.0;
    }
    (pos.saturating_sub(start) as f32 / (extent - 1) as f32).clamp(0.0, 1.0)
}

// ── Interaction constants ───────────────────────────────────────────────────

pub const PAGE_SCROLL_SIZE: usize = 20;
pub const SEEK_STEP_SECS: f64 = 5.0;
pub const VOLUME_STEP: f32 = 0.05;

// ── Modals ──────────────────────────────────────────────────────────────────

pub const MODAL_WIDTH: u16 = 44;
pub const MODAL_BORDER_OVERHEAD: u16 = 2;

/// A centred modal box for `rows` rows of content.
pub fn modal_rect(size: Rect, rows: u16) -> Rect {
    let width = MODAL_WIDTH.min(size.width);
    let height = (rows + MODAL_BORDER_OVERHEAD).min(size.height);
    let x = size.x + size.width.saturating_sub(width) / 2;
    let y = size.y + size.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// A context menu box anchored at the click position, kept on screen.
pub fn menu_rect(size: Rect, anchor: (f32, f32), rows: u16, width: u16) -> Rect {
    let width = width.min(size.width);
    let height = (rows + MODAL_BORDER_OVERHEAD).min(size.height);
    let x = (anchor.0.max(0.0) as u16).min(size.right().saturating_sub(width));
    let y = (anchor.1.max(0.0) as u16).min(size.bottom().saturating_sub(height));
    Rect::new(x, y, width, height)
}

pub fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_layout_fills_the_terminal() {
        let main = split_main(Rect::new(0, 0, 100, 30));
        assert_eq!(main.player.height, PLAYER_HEIGHT);
        assert_eq!(main.scrub_bar.y, PLAYER_HEIGHT);
        assert_eq!(main.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(main.content.x, SIDEBAR_WIDTH);
        assert_eq!(main.content.width, 100 - SIDEBAR_WIDTH);
        assert_eq!(main.help_bar.y, 29);
    }

    #[test]
    fn mini_layout_hides_the_body() {
        let mini = split_mini(Rect::new(0, 0, 60, 20));
        assert_eq!(mini.content.area(), 0);
        assert_eq!(mini.sidebar.area(), 0);
        assert_eq!(mini.scrub_bar.y, mini.player.y + PLAYER_HEIGHT);
        assert_eq!(mini.help_bar.y, 19);
    }

    #[test]
    fn scrollbar_only_when_overflowing() {
        let area = Rect::new(10, 5, 30, 10);
        assert!(list_geometry(area, 10).scrollbar.is_none());

        let geometry = list_geometry(area, 11);
        assert_eq!(geometry.rows.width, 29);
        assert_eq!(geometry.scrollbar, Some(Rect::new(39, 5, 1, 10)));
    }

    #[test]
    fn fractions_span_the_extent() {
        assert_eq!(fraction(10, 10, 11), 0.0);
        assert_eq!(fraction(20, 10, 11), 1.0);
        assert_eq!(fraction(15, 10, 11), 0.5);
        assert_eq!(fraction(5, 10, 11), 0.0);
        assert_eq!(fraction(40, 10, 1), 0.0);
    }

    #[test]
    fn menus_stay_on_screen() {
        let size = Rect::new(0, 0, 80, 24);
        let rect = menu_rect(size, (78.0, 23.0), 2, 12);
        assert_eq!(rect, Rect::new(68, 20, 12, 4));
        let rect = menu_rect(size, (3.0, 4.0), 2, 12);
        assert_eq!(rect, Rect::new(3, 4, 12, 4));
    }
}
