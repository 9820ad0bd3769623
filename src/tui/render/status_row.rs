use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, StatusKind};

use super::helpers::push_right_aligned;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let pending = app
        .controller
        .pending_removal()
        .and_then(|index| app.controller.store().get(index));

    let line = if let (Mode::Confirm, Some(item)) = (app.mode, pending) {
        let mut spans = vec![Span::styled(
            format!(" Remove \"{}\"? Are you sure?", item),
            Style::default()
                .fg(app.theme.warning)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )];
        push_right_aligned(
            &mut spans,
            "y yes  n no ",
            width,
            Style::default().bg(bg),
            Style::default().fg(app.theme.dim).bg(bg),
        );
        Line::from(spans)
    } else if let Some(status) = &app.status {
        let style = match status.kind {
            StatusKind::Info => Style::default().fg(app.theme.text).bg(bg),
            StatusKind::Warning => Style::default().fg(app.theme.warning).bg(bg),
            StatusKind::Error => Style::default()
                .fg(app.theme.warning)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        };
        Line::from(Span::styled(format!(" {}", status.text), style))
    } else if app.show_key_hints {
        let hint = match app.mode {
            Mode::Navigate => "a add  e edit  d remove  / filter  ? help  q quit ",
            Mode::Input => "Enter submit  Esc cancel  Tab list ",
            Mode::Filter => "Enter keep  Esc clear ",
            Mode::Confirm => "y yes  n no ",
        };
        let mut spans = Vec::new();
        push_right_aligned(
            &mut spans,
            hint,
            width,
            Style::default().bg(bg),
            Style::default().fg(app.theme.dim).bg(bg),
        );
        Line::from(spans)
    } else {
        Line::default()
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
