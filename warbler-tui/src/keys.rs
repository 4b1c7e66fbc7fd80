use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use smol_str::{SmolStr, format_smolstr};
use warbler_core::keys::{self as core_keys, Key};

/// Terminal-only key actions. Everything else is forwarded to the
/// dispatcher as a [`Key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    Select,
    NextView,
    PreviousView,
    QueueNext,
    AddToPlaylist,
    Remove,
    NewPlaylist,
    PlaylistMenu,
    ConfirmYes,
    SeekForward,
    SeekBackward,
    VolumeUp,
    VolumeDown,
    Rescan,
    Core(Key),
}

// ── Key code constants ───────────────────────────────────────────

pub const KEY_QUIT: KeyCode = KeyCode::Char('q');
pub const KEY_SELECT: KeyCode = KeyCode::Enter;
pub const KEY_NEXT_VIEW: KeyCode = KeyCode::Tab;
pub const KEY_PREVIOUS_VIEW: KeyCode = KeyCode::BackTab;
pub const KEY_QUEUE_NEXT: KeyCode = KeyCode::Char('u');
pub const KEY_ADD_TO_PLAYLIST: KeyCode = KeyCode::Char('a');
pub const KEY_REMOVE: KeyCode = KeyCode::Char('x');
pub const KEY_REMOVE_ALT: KeyCode = KeyCode::Delete;
pub const KEY_NEW_PLAYLIST: KeyCode = KeyCode::Char('n');
pub const KEY_PLAYLIST_MENU: KeyCode = KeyCode::Char('p');
pub const KEY_CONFIRM_YES: KeyCode = KeyCode::Char('y');
pub const KEY_SEEK_BACK: KeyCode = KeyCode::Char(',');
pub const KEY_SEEK_FWD: KeyCode = KeyCode::Char('.');
pub const KEY_VOLUME_DOWN: KeyCode = KeyCode::Char('-');
pub const KEY_VOLUME_UP: KeyCode = KeyCode::Char('=');
pub const KEY_VOLUME_UP_ALT: KeyCode = KeyCode::Char('+');
pub const KEY_RESCAN: KeyCode = KeyCode::F(5);
pub const KEY_UP: KeyCode = KeyCode::Up;
pub const KEY_DOWN: KeyCode = KeyCode::Down;
pub const KEY_PAGE_UP: KeyCode = KeyCode::PageUp;
pub const KEY_PAGE_DOWN: KeyCode = KeyCode::PageDown;
pub const KEY_GOTO_TOP: KeyCode = KeyCode::Home;
pub const KEY_GOTO_BOTTOM: KeyCode = KeyCode::End;

impl Action {
    /// Label shown in the help bar. Returns `None` for actions that
    /// shouldn't appear (navigation, text input, etc.).
    pub fn help_label(&self) -> Option<(SmolStr, SmolStr)> {
        let (key, desc): (SmolStr, &str) = match self {
            Action::Quit => (code_label(KEY_QUIT), "quit"),
            Action::Select => ("enter".into(), "play"),
            Action::NextView => ("tab".into(), "view"),
            Action::QueueNext => (code_label(KEY_QUEUE_NEXT), "queue"),
            Action::AddToPlaylist => (code_label(KEY_ADD_TO_PLAYLIST), "add"),
            Action::Remove => (code_label(KEY_REMOVE), "remove"),
            Action::NewPlaylist => (code_label(KEY_NEW_PLAYLIST), "new list"),
            Action::SeekBackward => (code_label(KEY_SEEK_BACK), "seek-"),
            Action::SeekForward => (code_label(KEY_SEEK_FWD), "seek+"),
            Action::VolumeDown => (code_label(KEY_VOLUME_DOWN), "vol-"),
            Action::VolumeUp => (code_label(KEY_VOLUME_UP), "vol+"),
            Action::Core(key) => {
                let action = core_keys::action(*key)?;
                (key.label().to_lowercase().into(), action.description())
            }
            _ => return None,
        };
        Some((key, desc.into()))
    }
}

fn code_label(code: KeyCode) -> SmolStr {
    match code {
        KeyCode::Char(c) => format_smolstr!("{c}"),
        KeyCode::F(n) => format_smolstr!("f{n}"),
        other => format_smolstr!("{other}").to_lowercase().into(),
    }
}

/// Translate a terminal key into a dispatcher key, if it has one.
pub fn core_key(key: &KeyEvent) -> Option<Key> {
    Some(match key.code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    })
}

/// Resolve a key event while a text entry has focus. Only list navigation
/// stays with the terminal; everything else is typed.
pub fn text_action(key: &KeyEvent) -> Option<Action> {
    if is_interrupt(key) {
        return Some(Action::Quit);
    }
    match key.code {
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        _ => core_key(key).map(Action::Core),
    }
}

/// Resolve a key event in browsing context.
pub fn browse_action(key: &KeyEvent) -> Option<Action> {
    if is_interrupt(key) {
        return Some(Action::Quit);
    }
    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        code => code,
    };
    match code {
        KEY_QUIT => Some(Action::Quit),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        KEY_SELECT => Some(Action::Select),
        KEY_NEXT_VIEW => Some(Action::NextView),
        KEY_PREVIOUS_VIEW => Some(Action::PreviousView),
        KEY_QUEUE_NEXT => Some(Action::QueueNext),
        KEY_ADD_TO_PLAYLIST => Some(Action::AddToPlaylist),
        KEY_REMOVE | KEY_REMOVE_ALT => Some(Action::Remove),
        KEY_NEW_PLAYLIST => Some(Action::NewPlaylist),
        KEY_PLAYLIST_MENU => Some(Action::PlaylistMenu),
        KEY_CONFIRM_YES => Some(Action::ConfirmYes),
        KEY_SEEK_BACK => Some(Action::SeekBackward),
        KEY_SEEK_FWD => Some(Action::SeekForward),
        KEY_VOLUME_DOWN => Some(Action::VolumeDown),
        KEY_VOLUME_UP | KEY_VOLUME_UP_ALT => Some(Action::VolumeUp),
        KEY_RESCAN => Some(Action::Rescan),
        _ => core_key(key).map(Action::Core),
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Ordered list of actions to show in the help bar.
pub const BROWSE_HELP: &[Action] = &[
    Action::Core(core_keys::KEY_TOGGLE_PLAY),
    Action::Core(core_keys::KEY_PREVIOUS),
    Action::Core(core_keys::KEY_NEXT),
    Action::Select,
    Action::QueueNext,
    Action::AddToPlaylist,
    Action::Remove,
    Action::NextView,
    Action::Core(core_keys::KEY_SEARCH),
    Action::Core(core_keys::KEY_SHORTCUTS),
    Action::Quit,
];

/// Terminal-only bindings listed under the dispatcher's in the shortcuts
/// overlay.
pub const EXTRA_SHORTCUTS: &[(&str, &str)] = &[
    ("↑/↓", "Move selection"),
    ("Enter", "Play selection"),
    ("Tab", "Next view"),
    ("U", "Play next"),
    ("A", "Add to playlist"),
    ("X", "Remove"),
    ("N", "New playlist"),
    ("P", "Playlist menu"),
    (", / .", "Seek 5s"),
    ("- / =", "Volume"),
    ("F5", "Rescan"),
    ("Q", "Quit"),
];
