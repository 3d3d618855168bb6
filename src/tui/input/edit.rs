use crossterm::event::{KeyCode, KeyEvent};

use crate::io::store::Storage;
use crate::tui::app::App;
use crate::tui::edit_form::EditField;

use super::prompt::edit_line;

/// Keys in the edit form. Tab and the arrows move between fields; the
/// priority field cycles with left/right or space.
pub(super) fn handle_edit<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => return app.cancel_edit(),
        KeyCode::Enter => return app.submit_edit(),
        _ => {}
    }
    let Some(form) = app.edit.as_mut() else {
        return app.cancel_edit();
    };
    form.error = None;

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.step_field(1),
        KeyCode::BackTab | KeyCode::Up => form.step_field(-1),
        _ if form.field == EditField::Priority => match key.code {
            KeyCode::Left | KeyCode::Char('h') => form.priority = form.priority.cycle(-1),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                form.priority = form.priority.cycle(1)
            }
            _ => {}
        },
        _ => {
            if let Some(prompt) = form.focused_text_mut() {
                edit_line(prompt, key);
            }
        }
    }
}
