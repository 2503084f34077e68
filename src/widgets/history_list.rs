use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::{App, LoadState};
use crate::domain::HistoryRecord;
use crate::theme;

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let placeholder = match &app.history {
        LoadState::NotLoaded | LoadState::Loading => Some((" Loading history...", theme::TEXT_MUTED)),
        LoadState::Error(_) => Some((" History could not be loaded", theme::RED)),
        LoadState::Loaded(records) if records.is_empty() => {
            Some((" No history recorded yet", theme::TEXT_MUTED))
        }
        LoadState::Loaded(_) => None,
    };
    if let Some((label, color)) = placeholder {
        frame.render_widget(Paragraph::new(label).style(Style::default().fg(color)), area);
        return;
    }

    let rows: Vec<Row<'static>> = app.visible_records().into_iter().map(record_row).collect();
    if rows.is_empty() {
        let empty = Paragraph::new(" No history records match the filter")
            .style(Style::default().fg(theme::TEXT_MUTED));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from(" Action"),
        Cell::from("Target"),
        Cell::from("Target ID"),
        Cell::from("Admin"),
        Cell::from("Recorded"),
    ])
    .style(
        Style::default()
            .fg(theme::TEXT_DIM)
            .add_modifier(Modifier::BOLD),
    )
    .height(1);

    let widths = [
        Constraint::Length(16),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(
            Style::default()
                .bg(theme::BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn record_row(record: &HistoryRecord) -> Row<'static> {
    let action = record.action_kind;
    let recorded = record
        .recorded_at
        .map(|at| at.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(format!(" {} {}", action.symbol(), action.title()))
            .style(Style::default().fg(theme::tone_color(action.tone()))),
        Cell::from(record.target_kind.title()),
        Cell::from(record.target_id.to_string()),
        Cell::from(record.admin_name.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(recorded).style(Style::default().fg(theme::TEXT_DIM)),
    ])
    .style(Style::default().fg(theme::TEXT))
}
