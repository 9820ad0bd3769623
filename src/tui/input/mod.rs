mod confirm;
mod filter;
mod form;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::handle_confirm;
use filter::handle_filter;
use form::handle_form;
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Messages last until the next key press
    app.status = None;

    // Help overlay swallows everything until closed
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Input => handle_form(app, key),
        Mode::Filter => handle_filter(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Shared single-line editing keys. Returns true if the key was consumed.
fn edit_line(line: &mut crate::util::input_line::InputLine, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (m, KeyCode::Char('w')) if m.contains(KeyModifiers::CONTROL) => line.delete_word_back(),
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => line.clear(),
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => line.move_home(),
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => line.move_end(),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => line.insert_char(c),
        (_, KeyCode::Backspace) => line.backspace(),
        (_, KeyCode::Delete) => line.delete(),
        (_, KeyCode::Left) => line.move_left(),
        (_, KeyCode::Right) => line.move_right(),
        (_, KeyCode::Home) => line.move_home(),
        (_, KeyCode::End) => line.move_end(),
        _ => return false,
    }
    true
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::tui::app::App;

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            super::handle_key(app, ch(c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;
    use crate::tui::render::test_helpers::app_with_items;

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut app = app_with_items(&[]);
        app.mode = Mode::Input;
        handle_key(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = app_with_items(&["milk"]);
        handle_key(&mut app, ch('?'));
        assert!(app.show_help);
        handle_key(&mut app, ch('d'));
        assert_eq!(app.mode, Mode::Navigate);
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn key_press_clears_status() {
        let mut app = app_with_items(&["milk"]);
        app.set_status(crate::tui::app::StatusKind::Info, "hello");
        handle_key(&mut app, ch('j'));
        assert!(app.status.is_none());
    }
}
