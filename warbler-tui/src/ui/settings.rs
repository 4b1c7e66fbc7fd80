use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use warbler_core::{App, Command, keys::Action as CoreAction};

use super::{ACCENT, DIM, SELECTED_BG, begin_list, fit, truncate};
use crate::app::Tui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    MusicFolder,
    Rescan,
    Repeat,
    Volume,
    MiniPlayer,
}
impl SettingsRow {
    fn label(&self) -> &'static str {
        match self {
            SettingsRow::MusicFolder => "Music folder",
            SettingsRow::Rescan => "Rescan library",
            SettingsRow::Repeat => "Repeat",
            SettingsRow::Volume => "Volume",
            SettingsRow::MiniPlayer => "Mini player",
        }
    }
}

pub const ROWS: [SettingsRow; 5] = [
    SettingsRow::MusicFolder,
    SettingsRow::Rescan,
    SettingsRow::Repeat,
    SettingsRow::Volume,
    SettingsRow::MiniPlayer,
];

const LABEL_WIDTH: usize = 16;

/// What activating a settings row does. Volume is adjusted with the
/// volume keys instead.
pub fn activate(app: &App, row: usize) -> Option<Command> {
    match ROWS.get(row)? {
        SettingsRow::MusicFolder if app.view().folder_draft().is_some() => {
            Some(Command::SubmitMusicFolder)
        }
        SettingsRow::MusicFolder => Some(Command::EditMusicFolder),
        SettingsRow::Rescan => Some(Command::Rescan),
        SettingsRow::Repeat => Some(Command::SetRepeatMode(
            app.session().repeat_mode().cycle(),
        )),
        SettingsRow::Volume => None,
        SettingsRow::MiniPlayer => Some(Command::Perform(CoreAction::ToggleMiniPlayer)),
    }
}

fn value(app: &App, row: SettingsRow) -> Vec<Span<'static>> {
    match row {
        SettingsRow::MusicFolder => match app.view().folder_draft() {
            Some(draft) => vec![
                Span::styled(draft.to_string(), Style::default().fg(Color::White)),
                Span::styled("\u{2588}", Style::default().fg(Color::Yellow)),
            ],
            None => vec![Span::styled(
                app.settings().music_folder.display().to_string(),
                Style::default().fg(Color::White),
            )],
        },
        SettingsRow::Rescan => {
            let count = app.session().library().len();
            vec![Span::styled(
                format!("{count} tracks"),
                Style::default().fg(DIM),
            )]
        }
        SettingsRow::Repeat => vec![Span::styled(
            app.session().repeat_mode().as_str(),
            Style::default().fg(ACCENT),
        )],
        SettingsRow::Volume => vec![Span::styled(
            format!("{:.0}%", app.session().volume() * 100.0),
            Style::default().fg(ACCENT),
        )],
        SettingsRow::MiniPlayer => vec![Span::styled(
            if app.settings().mini_player { "on" } else { "off" },
            Style::default().fg(ACCENT),
        )],
    }
}

pub fn draw(frame: &mut Frame, tui: &mut Tui, area: Rect) {
    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = begin_list(tui, inner, ROWS.len());
    let value_width = (rows.width as usize).saturating_sub(LABEL_WIDTH + 2);
    let lines: Vec<Line> = ROWS
        .iter()
        .enumerate()
        .skip(tui.areas.first_row)
        .take(rows.height as usize)
        .map(|(i, row)| {
            let mut spans = vec![Span::styled(
                fit(&format!(" {}", row.label()), LABEL_WIDTH),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            for span in value(&tui.core, *row) {
                let content = truncate(&span.content, value_width);
                spans.push(Span::styled(content, span.style));
            }
            let line = Line::from(spans);
            if i == tui.selected {
                line.style(Style::default().bg(SELECTED_BG))
            } else {
                line
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows);
}
