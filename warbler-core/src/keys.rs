/// A key press, independent of the windowing or terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    Backspace,
    Char(char),
}

/// Actions bound to keys while no text entry has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePlay,
    Next,
    Previous,
    ToggleShuffle,
    CycleRepeat,
    ToggleMiniPlayer,
    ToggleShortcuts,
    FocusSearch,
}

/// Edits applied to whichever text entry has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Commit,
}

// ── Key constants ───────────────────────────────────────────────

pub const KEY_TOGGLE_PLAY: Key = Key::Space;
pub const KEY_NEXT: Key = Key::Right;
pub const KEY_PREVIOUS: Key = Key::Left;
pub const KEY_SHUFFLE: Key = Key::Char('s');
pub const KEY_REPEAT: Key = Key::Char('r');
pub const KEY_MINI_PLAYER: Key = Key::Char('m');
pub const KEY_SHORTCUTS: Key = Key::Char('k');
pub const KEY_SEARCH: Key = Key::Char('/');
pub const KEY_ESCAPE: Key = Key::Escape;

impl Action {
    pub fn key(&self) -> Key {
        match self {
            Action::TogglePlay => KEY_TOGGLE_PLAY,
            Action::Next => KEY_NEXT,
            Action::Previous => KEY_PREVIOUS,
            Action::ToggleShuffle => KEY_SHUFFLE,
            Action::CycleRepeat => KEY_REPEAT,
            Action::ToggleMiniPlayer => KEY_MINI_PLAYER,
            Action::ToggleShortcuts => KEY_SHORTCUTS,
            Action::FocusSearch => KEY_SEARCH,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Action::TogglePlay => "Play / pause",
            Action::Next => "Next track",
            Action::Previous => "Previous track",
            Action::ToggleShuffle => "Toggle shuffle",
            Action::CycleRepeat => "Cycle repeat mode",
            Action::ToggleMiniPlayer => "Toggle mini player",
            Action::ToggleShortcuts => "Show shortcuts",
            Action::FocusSearch => "Search",
        }
    }
}

impl Key {
    pub fn label(&self) -> String {
        match self {
            Key::Space => "Space".to_string(),
            Key::Left => "←".to_string(),
            Key::Right => "→".to_string(),
            Key::Up => "↑".to_string(),
            Key::Down => "↓".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Escape => "Esc".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Char(c) => c.to_uppercase().to_string(),
        }
    }
}

/// Ordered list of bindings for the shortcuts overlay.
pub const SHORTCUTS: &[Action] = &[
    Action::TogglePlay,
    Action::Next,
    Action::Previous,
    Action::ToggleShuffle,
    Action::CycleRepeat,
    Action::ToggleMiniPlayer,
    Action::ToggleShortcuts,
    Action::FocusSearch,
];

/// Resolve a key into an action. Letters match either case.
pub fn action(key: Key) -> Option<Action> {
    let key = match key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        key => key,
    };
    match key {
        KEY_TOGGLE_PLAY => Some(Action::TogglePlay),
        KEY_NEXT => Some(Action::Next),
        KEY_PREVIOUS => Some(Action::Previous),
        KEY_SHUFFLE => Some(Action::ToggleShuffle),
        KEY_REPEAT => Some(Action::CycleRepeat),
        KEY_MINI_PLAYER => Some(Action::ToggleMiniPlayer),
        KEY_SHORTCUTS => Some(Action::ToggleShortcuts),
        KEY_SEARCH => Some(Action::FocusSearch),
        _ => None,
    }
}

/// Resolve a key into a text edit for the focused entry.
pub fn text_edit(key: Key) -> Option<TextEdit> {
    match key {
        Key::Char(c) => Some(TextEdit::Insert(c)),
        Key::Space => Some(TextEdit::Insert(' ')),
        Key::Backspace => Some(TextEdit::Backspace),
        Key::Enter => Some(TextEdit::Commit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_match_either_case() {
        assert_eq!(action(Key::Char('S')), Some(Action::ToggleShuffle));
        assert_eq!(action(Key::Char('k')), Some(Action::ToggleShortcuts));
        assert_eq!(action(Key::Char('x')), None);
        assert_eq!(action(Key::Escape), None);
    }

    #[test]
    fn every_shortcut_round_trips_through_its_key() {
        for shortcut in SHORTCUTS {
            assert_eq!(action(shortcut.key()), Some(*shortcut));
        }
    }

    #[test]
    fn text_entry_takes_spaces_and_letters() {
        assert_eq!(text_edit(Key::Space), Some(TextEdit::Insert(' ')));
        assert_eq!(text_edit(Key::Char('S')), Some(TextEdit::Insert('S')));
        assert_eq!(text_edit(Key::Enter), Some(TextEdit::Commit));
        assert_eq!(text_edit(Key::Left), None);
    }
}
