pub mod form;
pub mod help_overlay;
mod helpers;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // form
            Constraint::Length(1), // filter
            Constraint::Min(1),    // list
            Constraint::Length(1), // clear all
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    form::render_form(frame, app, chunks[1]);
    list_view::render_filter_row(frame, app, chunks[2]);
    list_view::render_list_view(frame, app, chunks[3]);
    list_view::render_clear_row(frame, app, chunks[4]);
    status_row::render_status_row(frame, app, chunks[5]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let count = app.controller.store().len();
    let mut spans = vec![Span::styled(
        " Shopping List",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    let counter = match count {
        0 => String::new(),
        1 => "1 item ".to_string(),
        n => format!("{} items ", n),
    };
    let counter_width = counter.len();
    let used = helpers::spans_width(&spans);
    let width = area.width as usize;
    if used + counter_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - counter_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(counter, Style::default().fg(app.theme.dim).bg(bg)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

/// Case-insensitive literal matcher for the current filter, if any.
pub(super) fn filter_regex(filter: &str) -> Option<Regex> {
    if filter.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(filter))).ok()
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    let mut has_match = false;
    for m in re.find_iter(text) {
        has_match = true;
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if !has_match {
        spans.push(Span::styled(text.to_string(), base_style));
    } else if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}
