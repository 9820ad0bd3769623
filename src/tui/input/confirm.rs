use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::controller::Intent;
use crate::tui::app::App;

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.dispatch(Intent::ConfirmRemove),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.dispatch(Intent::CancelRemove)
        }
        _ => {}
    }
}
