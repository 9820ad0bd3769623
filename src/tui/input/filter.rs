use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::controller::Intent;
use crate::tui::app::{App, Mode};

use super::edit_line;

pub(super) fn handle_filter(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.mode = Mode::Navigate,
        KeyCode::Esc => {
            app.filter_input.clear();
            app.dispatch(Intent::FilterChange(String::new()));
            app.mode = Mode::Navigate;
        }
        _ => {
            let before = app.filter_input.text().to_string();
            if edit_line(&mut app.filter_input, key) && app.filter_input.text() != before {
                let text = app.filter_input.text().to_string();
                app.dispatch(Intent::FilterChange(text));
            }
        }
    }
}
