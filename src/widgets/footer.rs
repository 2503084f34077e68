use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode, View};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let hints: &[(&str, &str)] = match (&app.input_mode, app.view) {
        (InputMode::PendingG, _) => &[("g", "top")],
        (_, View::List) => &[
            ("j/k", "nav"),
            ("Enter", "open"),
            ("/", "search"),
            (":", "cmd"),
            ("p", "polling"),
            ("?", "help"),
            ("q", "quit"),
        ],
        (_, View::Detail) => &[
            ("h/l", "tabs"),
            ("j/k", "scroll"),
            ("Esc", "back"),
            ("Ctrl+R", "reload"),
            ("?", "help"),
        ],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme::INDIGO)));
        spans.push(Span::styled(
            format!(":{}", desc),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}
