use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::store::Storage;
use crate::tui::app::{App, Mode, Prompt};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Keys while typing in the search or add prompt
pub(super) fn handle_prompt<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => match app.mode {
            Mode::Search => app.commit_search(),
            Mode::Add => app.submit_add(),
            _ => {}
        },
        _ => {
            edit_line(&mut app.prompt, key);
        }
    }

    // The board filters as the query is typed
    if app.mode == Mode::Search {
        app.clamp_cursors();
    }
}

/// Single-line editing keys shared by every text input. Returns false for
/// keys that are not editing keys.
pub(super) fn edit_line(prompt: &mut Prompt, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('a') if ctrl => prompt.cursor = 0,
        KeyCode::Char('e') if ctrl => prompt.cursor = prompt.text.len(),
        KeyCode::Char('u') if ctrl => clear_to_start(prompt),
        KeyCode::Char(c) if !ctrl => insert_char(prompt, c),
        KeyCode::Backspace => backspace(prompt),
        KeyCode::Delete => delete_forward(prompt),
        KeyCode::Left => move_left(prompt),
        KeyCode::Right => move_right(prompt),
        KeyCode::Home => prompt.cursor = 0,
        KeyCode::End => prompt.cursor = prompt.text.len(),
        _ => return false,
    }
    true
}

fn insert_char(prompt: &mut Prompt, c: char) {
    prompt.text.insert(prompt.cursor, c);
    prompt.cursor += c.len_utf8();
}

fn backspace(prompt: &mut Prompt) {
    if let Some(start) = prev_grapheme_boundary(&prompt.text, prompt.cursor) {
        prompt.text.replace_range(start..prompt.cursor, "");
        prompt.cursor = start;
    }
}

fn delete_forward(prompt: &mut Prompt) {
    if let Some(end) = next_grapheme_boundary(&prompt.text, prompt.cursor) {
        prompt.text.replace_range(prompt.cursor..end, "");
    }
}

fn move_left(prompt: &mut Prompt) {
    if let Some(pos) = prev_grapheme_boundary(&prompt.text, prompt.cursor) {
        prompt.cursor = pos;
    }
}

fn move_right(prompt: &mut Prompt) {
    if let Some(pos) = next_grapheme_boundary(&prompt.text, prompt.cursor) {
        prompt.cursor = pos;
    }
}

fn clear_to_start(prompt: &mut Prompt) {
    prompt.text.replace_range(..prompt.cursor, "");
    prompt.cursor = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn editing_respects_graphemes() {
        let mut p = Prompt::default();
        for c in "cafe\u{301}!".chars() {
            insert_char(&mut p, c);
        }
        move_left(&mut p);
        backspace(&mut p);
        assert_eq!(p.text, "caf!");
        assert_eq!(p.cursor, 3);

        move_right(&mut p);
        move_right(&mut p);
        assert_eq!(p.cursor, 4);
        move_left(&mut p);
        move_left(&mut p);
        delete_forward(&mut p);
        assert_eq!(p.text, "ca!");
    }

    #[test]
    fn ctrl_u_clears_before_cursor() {
        let mut p = Prompt::with_text("hello world");
        p.cursor = 6;
        clear_to_start(&mut p);
        assert_eq!(p.text, "world");
        assert_eq!(p.cursor, 0);
    }

    #[test]
    fn typing_filters_live() {
        let mut app = app_with_seed();
        app.cursors[1] = 1;
        press(&mut app, "/proposal");
        assert_eq!(app.mode, Mode::Search);
        assert_eq!(app.lane_tasks(1).len(), 1);
        assert_eq!(app.cursors[1], 0);

        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.prompt.text, "proposa");

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.query, "");
    }

    #[test]
    fn home_end_and_ctrl_keys() {
        let mut app = app_with_seed();
        press(&mut app, "a");
        press(&mut app, "bc");
        handle_key(&mut app, key(KeyCode::Home));
        press(&mut app, "a");
        handle_key(&mut app, ctrl('e'));
        press(&mut app, "d");
        assert_eq!(app.prompt.text, "abcd");
        handle_key(&mut app, ctrl('u'));
        assert_eq!(app.prompt.text, "");
    }
}
