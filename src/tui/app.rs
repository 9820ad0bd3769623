use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::Settings;
use crate::io::file_storage::FileStorage;
use crate::io::storage::Storage;
use crate::model::UiConfig;
use crate::ops::controller::{Controller, Intent, Outcome};
use crate::ops::list_store::{ListStore, storage_key};
use crate::util::input_line::InputLine;

use super::input;
use super::render;
use super::theme::Theme;

/// Which widget has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving over the list
    Navigate,
    /// Typing into the add/update form
    Input,
    /// Typing into the filter field
    Filter,
    /// Waiting for y/n on a pending removal
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// One-line message shown in the status row until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Main application state
pub struct App {
    pub controller: Controller<Box<dyn Storage>>,
    pub mode: Mode,
    pub theme: Theme,
    /// Form contents (new item, or the item being renamed)
    pub input: InputLine,
    pub filter_input: InputLine,
    /// Cursor position among the visible (filtered) rows
    pub cursor: usize,
    /// First visible row of the list
    pub scroll: usize,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
    pub show_key_hints: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: Controller<Box<dyn Storage>>, ui: &UiConfig) -> Self {
        let mut app = App {
            controller,
            mode: Mode::Navigate,
            theme: Theme::from_config(ui),
            input: InputLine::new(),
            filter_input: InputLine::new(),
            cursor: 0,
            scroll: 0,
            status: None,
            show_help: false,
            show_key_hints: ui.show_key_hints,
            should_quit: false,
        };
        app.report_storage_warning();
        app
    }

    /// Surface an unreadable stored list in the status row.
    fn report_storage_warning(&mut self) {
        if let Some(warning) = self.controller.take_warning() {
            self.set_status(StatusKind::Warning, warning.message());
        }
    }

    /// Full-list positions of the rows currently shown.
    pub fn visible(&self) -> Vec<usize> {
        self.controller.visible()
    }

    /// Full-list position of the row under the cursor.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible().get(self.cursor).copied()
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.visible().len();
        if count == 0 {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(count - 1);
        }
    }

    /// Put the cursor on the item at full-list position `index`, if shown.
    pub fn select_index(&mut self, index: usize) {
        if let Some(pos) = self.visible().iter().position(|&i| i == index) {
            self.cursor = pos;
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    /// Send an intent to the controller and reflect the outcome in the UI.
    pub fn dispatch(&mut self, intent: Intent) {
        let was_editing = self.controller.mode().is_editing();
        let outcome = match self.controller.dispatch(intent) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "list operation failed");
                self.mode = Mode::Navigate;
                self.set_status(StatusKind::Error, e.to_string());
                return;
            }
        };

        match outcome {
            Outcome::Added(item) => {
                self.input.clear();
                self.select_index(self.controller.store().len() - 1);
                self.set_status(StatusKind::Info, format!("added {}", item));
            }
            Outcome::Renamed { index, item } => {
                self.input.clear();
                self.mode = Mode::Navigate;
                self.select_index(index);
                self.set_status(StatusKind::Info, format!("updated to {}", item));
            }
            Outcome::EditStarted { text, .. } => {
                self.input.set(&text);
                self.mode = Mode::Input;
            }
            Outcome::EditCancelled => {
                self.input.clear();
            }
            Outcome::ConfirmRemoval { .. } => {
                self.mode = Mode::Confirm;
            }
            Outcome::Removed { item, .. } => {
                self.mode = Mode::Navigate;
                if was_editing && !self.controller.mode().is_editing() {
                    self.input.clear();
                }
                self.clamp_cursor();
                self.set_status(StatusKind::Info, format!("removed {}", item));
            }
            Outcome::RemovalCancelled => {
                self.mode = Mode::Navigate;
            }
            Outcome::FilterChanged => {
                self.cursor = 0;
                self.scroll = 0;
            }
            Outcome::Cleared => {
                if was_editing {
                    self.input.clear();
                }
                self.cursor = 0;
                self.scroll = 0;
                self.set_status(StatusKind::Info, "cleared all items");
            }
            Outcome::Warned(warning) => {
                self.set_status(StatusKind::Warning, warning.message());
            }
            Outcome::Ignored => {
                if self.mode == Mode::Confirm {
                    self.mode = Mode::Navigate;
                }
                self.clamp_cursor();
            }
        }
        // Mutations re-read storage and may find it damaged
        self.report_storage_warning();
    }
}

/// Run the TUI application
pub fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FileStorage::open(&settings.data_dir)?;
    // Reject namespaces that cannot name a file before touching the terminal
    storage.path_for(&storage_key(&settings.namespace))?;
    let boxed: Box<dyn Storage> = Box::new(storage);
    let store = ListStore::open(boxed, &settings.namespace);
    tracing::info!(namespace = %settings.namespace, items = store.len(), "starting tui");

    let mut app = App::new(Controller::new(store), &settings.ui);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
