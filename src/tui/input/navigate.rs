use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::store::Storage;
use crate::model::config::ViewMode;
use crate::tui::app::App;

pub(super) fn handle_navigate<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            if !app.query.is_empty() {
                app.query.clear();
                app.clamp_cursors();
            }
        }

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('h') | KeyCode::Left => app.move_lane_focus(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_lane_focus(1),
        KeyCode::Char('t') => app.jump_to_today(),

        // Moving cards
        KeyCode::Char('H') => app.move_selected_to_adjacent_lane(-1),
        KeyCode::Char('L') => app.move_selected_to_adjacent_lane(1),
        KeyCode::Char('J') => app.move_selected_vertically(true),
        KeyCode::Char('K') => app.move_selected_vertically(false),

        // Task actions
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected(),
        KeyCode::Char('a') => app.begin_add(),
        KeyCode::Char('A') => app.begin_add_form(),
        KeyCode::Char('e') | KeyCode::Enter => app.begin_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('/') => app.begin_search(),

        // Views
        KeyCode::Char('v') | KeyCode::Tab => app.set_view(app.view.next()),
        KeyCode::Char(c @ '1'..='3') => {
            let idx = c as usize - '1' as usize;
            app.set_view(ViewMode::ALL[idx]);
        }
        _ => {}
    }
}
