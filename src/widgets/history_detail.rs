use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::action::DetailTab;
use crate::app::{App, LoadState};
use crate::diff::{FieldDiffEntry, FileStatus, RecordDetail, NO_DATA};
use crate::report::CHANGE_MARKER;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let detail = match &app.detail {
        LoadState::Loaded(detail) => detail,
        LoadState::Error(reason) => {
            let failed = Paragraph::new(format!(" Could not load history details: {}", reason))
                .style(Style::default().fg(theme::RED))
                .wrap(Wrap { trim: false });
            frame.render_widget(failed, area);
            return;
        }
        LoadState::Loading | LoadState::NotLoaded => {
            let loading = Paragraph::new(" Loading history details...")
                .style(Style::default().fg(theme::TEXT_MUTED));
            frame.render_widget(loading, area);
            return;
        }
    };

    let summary = summary_lines(detail);
    let layout = Layout::vertical([
        Constraint::Length(summary.len() as u16),
        Constraint::Length(1), // tab bar
        Constraint::Fill(1),   // content
    ])
    .split(area);

    frame.render_widget(Paragraph::new(summary), layout[0]);
    frame.render_widget(Paragraph::new(tab_line(app.detail_tab)), layout[1]);

    let lines = match app.detail_tab {
        DetailTab::Fields => field_lines(detail),
        DetailTab::Files => file_lines(detail),
    };
    let max_scroll = (lines.len() as u16).saturating_sub(layout[2].height);
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::NONE))
        .scroll((app.detail_scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, layout[2]);
}

fn summary_lines(detail: &RecordDetail) -> Vec<Line<'static>> {
    let record = &detail.record;
    let action = record.action_kind;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} {}", action.symbol(), action.title()),
                Style::default()
                    .fg(theme::tone_color(action.tone()))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} {}", record.target_kind.title(), record.target_id),
                Style::default().fg(theme::TEXT_DIM),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {}", record.summary()),
            Style::default().fg(theme::TEXT),
        )),
    ];

    if let Some(at) = record.recorded_at {
        lines.push(Line::from(Span::styled(
            format!(" Recorded {}", at.format("%d/%m/%Y %H:%M UTC")),
            Style::default().fg(theme::TEXT_MUTED),
        )));
    }

    if let Some(ref notice) = detail.diff.notice {
        lines.push(Line::from(Span::styled(
            format!(" ⚠ {}; showing the recorded values", notice),
            Style::default().fg(theme::YELLOW),
        )));
    } else if detail.diff.is_compared() {
        let changed = detail.diff.changed_count();
        let noun = if changed == 1 { "field" } else { "fields" };
        lines.push(Line::from(Span::styled(
            format!(" {} {} changed", changed, noun),
            Style::default().fg(theme::BLUE),
        )));
    }

    lines.push(Line::from(""));
    lines
}

fn tab_line(active: DetailTab) -> Line<'static> {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for tab in DetailTab::ALL {
        let style = if tab == active {
            Style::default()
                .fg(theme::INDIGO)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        };
        spans.push(Span::styled(format!(" {} ", tab.label()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn field_lines(detail: &RecordDetail) -> Vec<Line<'static>> {
    let mut lines = vec![];
    for entry in &detail.diff.fields {
        push_field(&mut lines, entry, 1);
    }
    lines
}

fn push_field(lines: &mut Vec<Line<'static>>, entry: &FieldDiffEntry, depth: usize) {
    let indent = "  ".repeat(depth);
    let label_style = Style::default()
        .fg(theme::INDIGO)
        .add_modifier(Modifier::BOLD);

    match entry {
        FieldDiffEntry::Plain { label, value, .. } => lines.push(Line::from(vec![
            Span::styled(format!("{}{:<22} ", indent, label), label_style),
            Span::styled(value.clone(), Style::default().fg(theme::TEXT)),
        ])),
        FieldDiffEntry::Changed { label, old, new, .. } => lines.push(Line::from(vec![
            Span::styled(format!("{}{:<22} ", indent, label), label_style),
            Span::styled(
                old.clone(),
                Style::default()
                    .fg(theme::OLD_VALUE)
                    .add_modifier(Modifier::CROSSED_OUT),
            ),
            Span::styled(format!(" {} ", CHANGE_MARKER), Style::default().fg(theme::TEXT_MUTED)),
            Span::styled(new.clone(), Style::default().fg(theme::NEW_VALUE)),
        ])),
        FieldDiffEntry::Group { label, entries, .. } => {
            lines.push(Line::from(Span::styled(format!("{}{}", indent, label), label_style)));
            for child in entries {
                push_field(lines, child, depth + 1);
            }
        }
        FieldDiffEntry::NoData => lines.push(Line::from(Span::styled(
            format!("{}{}", indent, NO_DATA),
            Style::default().fg(theme::TEXT_MUTED),
        ))),
    }
}

fn file_lines(detail: &RecordDetail) -> Vec<Line<'static>> {
    let muted = Style::default().fg(theme::TEXT_MUTED);

    if !detail.record.has_files() {
        return vec![Line::from(Span::styled("  Administrators have no files", muted))];
    }
    if detail.diff.files.is_empty() {
        return vec![Line::from(Span::styled(
            format!("  {}", detail.diff.empty_files_message()),
            muted,
        ))];
    }

    let mut lines = vec![];
    for status in [FileStatus::Removed, FileStatus::Added, FileStatus::Kept] {
        let files: Vec<_> = detail.diff.files_with_status(status).collect();
        if files.is_empty() {
            continue;
        }
        let color = theme::file_status_color(status);
        lines.push(Line::from(Span::styled(
            format!("  {} ({})", status.heading(), files.len()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for file in files {
            lines.push(Line::from(vec![
                Span::styled(format!("    {} ", status.symbol()), Style::default().fg(color)),
                Span::styled(
                    detail.file_name(&file.file_id).to_string(),
                    Style::default().fg(theme::TEXT),
                ),
                Span::styled(format!("  #{}", file.file_id), muted),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}
