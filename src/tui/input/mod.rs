mod confirm;
mod edit;
mod navigate;
mod prompt;

use crossterm::event::{KeyCode, KeyEvent};

use crate::io::store::Storage;

use super::app::{App, Mode};

use confirm::handle_confirm;
use edit::handle_edit;
use navigate::handle_navigate;
use prompt::handle_prompt;

/// Handle a key event in the current mode
pub fn handle_key<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    // Status messages last until the next key
    app.message = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search | Mode::Add => handle_prompt(app, key),
        Mode::ConfirmDelete => handle_confirm(app, key),
        Mode::Edit => handle_edit(app, key),
    }
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::io::store::Storage;
    use crate::tui::app::App;

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Press each character of `keys` in turn
    pub fn press<S: Storage>(app: &mut App<S>, keys: &str) {
        for c in keys.chars() {
            super::handle_key(app, key(KeyCode::Char(c)));
        }
    }
}
