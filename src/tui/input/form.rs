use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::controller::Intent;
use crate::tui::app::{App, Mode};

use super::edit_line;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let text = app.input.text().to_string();
            app.dispatch(Intent::Submit(text));
        }
        KeyCode::Esc => {
            if app.controller.mode().is_editing() {
                app.dispatch(Intent::CancelEdit);
            }
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab => app.mode = Mode::Navigate,
        _ => {
            edit_line(&mut app.input, key);
        }
    }
}
