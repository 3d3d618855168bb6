use crossterm::event::{KeyCode, KeyEvent};

use crate::io::store::Storage;
use crate::tui::app::App;

/// y/Enter confirms the pending delete; n/Esc cancels. Other keys are ignored.
pub(super) fn handle_confirm<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Mode;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn stray_keys_keep_waiting() {
        let mut app = app_with_seed();
        press(&mut app, "d");
        press(&mut app, "jq");
        assert_eq!(app.mode, Mode::ConfirmDelete);
        assert!(!app.should_quit);
        handle_confirm(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.pending_delete, None);
        assert_eq!(app.store.tasks().len(), 5);
    }

    #[test]
    fn enter_confirms() {
        let mut app = app_with_seed();
        press(&mut app, "d");
        handle_confirm(&mut app, key(KeyCode::Enter));
        assert!(app.store.get("seed-1").is_none());
    }
}
