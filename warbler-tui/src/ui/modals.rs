use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use warbler_core::{App, keys, view::Modal};

use super::{ACCENT, BACKGROUND, DIM, SELECTED_BG, fit, layout};
use crate::{app::Tui, keys::EXTRA_SHORTCUTS};

/// A selectable line in a modal.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalOption {
    NewPlaylist,
    AddTo(String),
    Open,
    Delete,
    Confirm,
    Cancel,
}
impl ModalOption {
    fn label(&self) -> String {
        match self {
            ModalOption::NewPlaylist => "+ New playlist".to_string(),
            ModalOption::AddTo(name) => name.clone(),
            ModalOption::Open => "Open".to_string(),
            ModalOption::Delete => "Delete".to_string(),
            ModalOption::Confirm => "Delete (y)".to_string(),
            ModalOption::Cancel => "Cancel".to_string(),
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, ModalOption::Delete | ModalOption::Confirm)
    }
}

/// The options of the open modal, top to bottom.
pub fn options(app: &App) -> Vec<ModalOption> {
    match app.view().modal() {
        Some(Modal::AddToPlaylist { .. }) => std::iter::once(ModalOption::NewPlaylist)
            .chain(
                app.playlists()
                    .names()
                    .map(|name| ModalOption::AddTo(name.to_string())),
            )
            .collect(),
        Some(Modal::ContextMenu { .. }) => vec![ModalOption::Open, ModalOption::Delete],
        Some(Modal::ConfirmDelete { .. }) => vec![ModalOption::Confirm, ModalOption::Cancel],
        Some(Modal::CreatePlaylist { .. } | Modal::Shortcuts) | None => vec![],
    }
}

const MENU_WIDTH: u16 = 16;
const KEY_COLUMN_WIDTH: usize = 10;

pub fn draw(frame: &mut Frame, tui: &mut Tui, size: Rect) {
    let Some(modal) = tui.core.view().modal().cloned() else {
        return;
    };
    let options = options(&tui.core);

    // Lines above the options, and the box they go in
    let (title, header, rect) = match &modal {
        Modal::AddToPlaylist { track_id } => {
            let title = tui
                .core
                .session()
                .library()
                .get(track_id)
                .map_or_else(|| "Add to playlist".to_string(), |t| format!("Add \"{}\" to", t.title));
            let rect = layout::modal_rect(size, options.len() as u16);
            (title, vec![], rect)
        }
        Modal::CreatePlaylist { draft_name } => {
            let header = vec![
                Line::from(vec![
                    Span::styled(draft_name.clone(), Style::default().fg(Color::White)),
                    Span::styled("\u{2588}", Style::default().fg(Color::Yellow)),
                ]),
                Line::from(Span::styled(
                    "Enter to create, Esc to cancel",
                    Style::default().fg(DIM),
                )),
            ];
            ("New playlist".to_string(), header, layout::modal_rect(size, 2))
        }
        Modal::ConfirmDelete { playlist_name } => {
            let header = vec![
                Line::from(format!("Delete \"{playlist_name}\"?")),
                Line::from(""),
            ];
            let rect = layout::modal_rect(size, header.len() as u16 + options.len() as u16);
            ("Delete playlist".to_string(), header, rect)
        }
        Modal::ContextMenu {
            playlist_name,
            anchor,
        } => {
            let rect = layout::menu_rect(size, *anchor, options.len() as u16, MENU_WIDTH);
            (playlist_name.clone(), vec![], rect)
        }
        Modal::Shortcuts => {
            let header = shortcut_lines();
            let rect = layout::modal_rect(size, header.len() as u16);
            ("Keyboard shortcuts".to_string(), header, rect)
        }
    };

    frame.render_widget(Clear, rect);
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .style(Style::default().bg(BACKGROUND));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    tui.areas.modal = Some(rect);

    let width = inner.width as usize;
    let header_rows = (header.len() as u16).min(inner.height);
    frame.render_widget(
        Paragraph::new(header),
        Rect::new(inner.x, inner.y, inner.width, header_rows),
    );

    if options.is_empty() {
        return;
    }
    let options_rect = Rect::new(
        inner.x,
        inner.y + header_rows,
        inner.width,
        (options.len() as u16).min(inner.height - header_rows),
    );
    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let color = if option.is_destructive() {
                Color::Red
            } else {
                Color::White
            };
            let mut style = Style::default().fg(color);
            if i == tui.modal_cursor {
                style = style.bg(SELECTED_BG).add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(fit(&format!(" {}", option.label()), width), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), options_rect);
    tui.areas.modal_options = Some(options_rect);
}

fn shortcut_lines() -> Vec<Line<'static>> {
    let core = keys::SHORTCUTS
        .iter()
        .map(|action| (action.key().label(), action.description().to_string()));
    let extra = EXTRA_SHORTCUTS
        .iter()
        .map(|(key, label)| (key.to_string(), label.to_string()));
    core.chain(extra)
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(fit(&format!(" {key}"), KEY_COLUMN_WIDTH), Style::default().fg(ACCENT)),
                Span::styled(label, Style::default().fg(Color::Gray)),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_list_every_binding() {
        let lines = shortcut_lines();
        assert_eq!(lines.len(), keys::SHORTCUTS.len() + EXTRA_SHORTCUTS.len());
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(first.contains("Space"));
        assert!(first.contains("Play / pause"));
    }

    #[test]
    fn destructive_options_are_flagged() {
        assert!(ModalOption::Confirm.is_destructive());
        assert!(ModalOption::Delete.is_destructive());
        assert!(!ModalOption::Cancel.is_destructive());
        assert_eq!(ModalOption::AddTo("Chill".into()).label(), "Chill");
    }
}
