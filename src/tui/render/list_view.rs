use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

use super::{filter_regex, push_highlighted_spans};

const EDITING_MARK: &str = "  (editing)";
const FILTER_LABEL: &str = " Filter: ";

/// Render the filtered list. Adjusts `app.scroll` to keep the cursor visible.
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let visible = app.visible();
    app.clamp_cursor();

    if visible.is_empty() {
        let msg = if app.controller.filter().is_empty() {
            " No items"
        } else {
            " No matching items"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let height = area.height as usize;
    if height == 0 {
        return;
    }
    if app.cursor < app.scroll {
        app.scroll = app.cursor;
    } else if app.cursor >= app.scroll + height {
        app.scroll = app.cursor + 1 - height;
    }
    app.scroll = app.scroll.min(visible.len().saturating_sub(1));

    let width = area.width as usize;
    let search_re = filter_regex(app.controller.filter());
    let edit_target = app.controller.mode().target();
    let pending = app.controller.pending_removal();

    let mut lines: Vec<Line> = Vec::new();
    for (row, &index) in visible.iter().enumerate().skip(app.scroll).take(height) {
        let Some(item) = app.controller.store().get(index) else {
            continue;
        };
        let is_cursor = row == app.cursor;
        let is_target = edit_target == Some(index);

        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let fg = if pending == Some(index) {
            app.theme.warning
        } else if is_target {
            app.theme.edit_button
        } else if is_cursor {
            app.theme.text_bright
        } else {
            app.theme.text
        };
        let base = Style::default().fg(fg).bg(row_bg);
        let match_style = Style::default()
            .fg(app.theme.match_fg)
            .bg(app.theme.match_bg)
            .add_modifier(Modifier::BOLD);

        let prefix = if is_cursor { "> " } else { "  " };
        let suffix = if is_target { EDITING_MARK } else { "" };
        let room = width.saturating_sub(prefix.len() + suffix.len());
        let text = truncate_to_width(item.as_str(), room);

        let mut spans = vec![Span::styled(
            prefix,
            Style::default().fg(app.theme.highlight).bg(row_bg),
        )];
        push_highlighted_spans(&mut spans, &text, base, match_style, search_re.as_ref());
        if is_target {
            spans.push(Span::styled(
                suffix,
                Style::default().fg(app.theme.dim).bg(row_bg),
            ));
        }
        if is_cursor {
            let used = prefix.len() + display_width(&text) + suffix.len();
            if used < width {
                spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(row_bg)));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Render the filter field, or a dim hint when no filter is set.
pub fn render_filter_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.mode == Mode::Filter;
    let filter = app.filter_input.text();

    let line = if filter.is_empty() && !focused {
        Line::from(Span::styled(
            " / to filter",
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        let label_fg = if focused {
            app.theme.highlight
        } else {
            app.theme.dim
        };
        let mut spans = vec![
            Span::styled(FILTER_LABEL, Style::default().fg(label_fg).bg(bg)),
            Span::styled(
                filter.to_string(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
        ];
        let shown = app.visible().len();
        let total = app.controller.store().len();
        let counter = format!("{} of {} ", shown, total);
        let used = display_width(FILTER_LABEL) + display_width(filter);
        let width = area.width as usize;
        if used + counter.len() < width {
            spans.push(Span::styled(
                " ".repeat(width - used - counter.len()),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(counter, Style::default().fg(app.theme.dim).bg(bg)));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);

    if focused {
        let x = area.x as usize + display_width(FILTER_LABEL) + app.filter_input.cursor_col();
        let x = x.min((area.x + area.width.saturating_sub(1)) as usize) as u16;
        frame.set_cursor_position((x, area.y));
    }
}

/// Render the clear-all affordance, shown only while the list has items.
pub fn render_clear_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let line = if app.controller.show_clear_button() {
        Line::from(vec![
            Span::styled(" [C] ", Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(
                "Clear all",
                Style::default()
                    .fg(app.theme.warning)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
