use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::storage::{MemoryStorage, Storage};
use crate::model::UiConfig;
use crate::ops::controller::Controller;
use crate::ops::list_store::ListStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole screen at the default test size.
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _area| {
        super::render(frame, app);
    })
}

/// Build an App over in-memory storage holding `items` in order.
pub fn app_with_items(items: &[&str]) -> App {
    let storage: Box<dyn Storage> = Box::new(MemoryStorage::new());
    let mut store = ListStore::open(storage, "test");
    for item in items {
        store.add(item).unwrap();
    }
    App::new(Controller::new(store), &UiConfig::default())
}
