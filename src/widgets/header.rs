use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, ConnectionStatus, View};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " histview ",
            Style::default()
                .fg(theme::INDIGO)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme::TEXT_MUTED)),
        Span::styled(
            "History",
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let (View::Detail, Some(id)) = (app.view, app.detail_id.as_ref()) {
        left_spans.push(Span::styled(" > ", Style::default().fg(theme::TEXT_MUTED)));
        left_spans.push(Span::styled(
            format!("#{}", id),
            Style::default().fg(theme::TEXT_DIM),
        ));
    }

    if let Some(filter) = app.filter.describe() {
        left_spans.push(Span::styled("  ", Style::default()));
        left_spans.push(Span::styled(filter, Style::default().fg(theme::GREEN)));
    }

    let mut right_spans: Vec<Span> = Vec::new();

    let connection_indicator = match &app.connection_status {
        ConnectionStatus::Connected => {
            Span::styled("● Connected", Style::default().fg(theme::GREEN))
        }
        ConnectionStatus::Connecting => {
            Span::styled("◌ Connecting...", Style::default().fg(theme::YELLOW))
        }
        ConnectionStatus::Error(msg) => {
            Span::styled(format!("✗ {}", msg), Style::default().fg(theme::RED))
        }
    };
    right_spans.push(connection_indicator);

    right_spans.push(Span::styled(
        format!("  {}", app.api_url),
        Style::default().fg(theme::INDIGO),
    ));

    if !app.polling_enabled {
        right_spans.push(Span::styled("  ⏸ paused", Style::default().fg(theme::YELLOW)));
    } else if app.error_count > 0 {
        right_spans.push(Span::styled(
            format!("  ↻ backoff {}s", app.polling_interval.as_secs()),
            Style::default().fg(theme::YELLOW),
        ));
    } else {
        right_spans.push(Span::styled("  ↻ polling", Style::default().fg(theme::TEXT_MUTED)));
    }

    if let Some(records) = app.history.data() {
        let visible = app.visible_records().len();
        let count = if visible == records.len() {
            format!("  [{} records]", visible)
        } else {
            format!("  [{} of {} records]", visible, records.len())
        };
        right_spans.push(Span::styled(count, Style::default().fg(theme::TEXT_MUTED)));
    }

    right_spans.push(Span::raw(" "));

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
