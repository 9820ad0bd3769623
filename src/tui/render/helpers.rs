use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Push padding so that `hint` ends flush with the right edge, if it fits.
pub(super) fn push_right_aligned<'a>(
    spans: &mut Vec<Span<'a>>,
    hint: &'a str,
    width: usize,
    pad_style: Style,
    hint_style: Style,
) {
    let content_width = spans_width(spans);
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), pad_style));
        spans.push(Span::styled(hint, hint_style));
    }
}
