use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

const ADD_LABEL: &str = " Add Item ";
const UPDATE_LABEL: &str = " Update Item ";

/// Render the add/update form: a bordered input field with the submit
/// button on the right. The button switches label and color in Edit-Mode.
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.mode == Mode::Input;
    let editing = app.controller.mode().is_editing();

    let (title, label, button_bg) = if editing {
        (" Edit item ", UPDATE_LABEL, app.theme.edit_button)
    } else {
        (" New item ", ADD_LABEL, app.theme.add_button)
    };
    let border_color = if focused {
        app.theme.highlight
    } else {
        app.theme.dim
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default().fg(app.theme.text_bright).bg(bg),
        ))
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let width = inner.width as usize;
    let label_width = display_width(label);
    let field_width = width.saturating_sub(label_width + 1);

    // Scroll horizontally so the cursor stays inside the field
    let cursor_col = app.input.cursor_col();
    let skip = cursor_col.saturating_sub(field_width.saturating_sub(1));
    let shown = truncate_to_width(skip_cols(app.input.text(), skip), field_width);

    let mut spans = Vec::new();
    if app.input.is_empty() && !focused {
        spans.push(Span::styled(
            truncate_to_width("press a to add an item", field_width),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else {
        spans.push(Span::styled(
            shown,
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if label_width <= width {
        spans.push(Span::styled(
            " ".repeat(width - label_width - used.min(width - label_width)),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            label,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(button_bg)
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);

    if focused {
        let x = inner.x + (cursor_col - skip).min(field_width) as u16;
        frame.set_cursor_position((x, inner.y));
    }
}

/// Drop leading graphemes until at least `cols` cells are skipped.
fn skip_cols(s: &str, cols: usize) -> &str {
    let mut skipped = 0;
    for (i, g) in s.grapheme_indices(true) {
        if skipped >= cols {
            return &s[i..];
        }
        skipped += display_width(g);
    }
    ""
}
