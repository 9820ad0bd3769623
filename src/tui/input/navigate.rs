use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::controller::Intent;
use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    let count = app.visible().len();
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char('j') | KeyCode::Down => {
            if app.cursor + 1 < count {
                app.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.cursor = count.saturating_sub(1),

        KeyCode::Char('a') | KeyCode::Char('i') => app.mode = Mode::Input,
        KeyCode::Char('/') => app.mode = Mode::Filter,

        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(index) = app.selected_index() {
                app.dispatch(Intent::EditActivate(index));
            }
        }
        KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => {
            if let Some(index) = app.selected_index() {
                app.dispatch(Intent::RemoveActivate(index));
            }
        }
        KeyCode::Char('C') => {
            // Only offered while the list has items
            if app.controller.show_clear_button() {
                app.dispatch(Intent::ClearActivate);
            }
        }

        KeyCode::Esc => {
            if app.controller.mode().is_editing() {
                app.dispatch(Intent::CancelEdit);
            } else if !app.filter_input.is_empty() {
                app.filter_input.clear();
                app.dispatch(Intent::FilterChange(String::new()));
            }
        }
        _ => {}
    }
}
