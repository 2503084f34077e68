use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::input::commands::{matching_commands, CommandDef, COMMANDS};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let (prefix, style) = match app.input_mode {
        InputMode::Command => (":", Style::default().fg(theme::YELLOW)),
        InputMode::Search => ("/", Style::default().fg(theme::GREEN)),
        _ => return,
    };

    let mut spans = vec![
        Span::styled(prefix, style),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(theme::TEXT)),
    ];

    // Ghost completion while the command word is still being typed
    if app.input_mode == InputMode::Command
        && !app.input_buffer.is_empty()
        && !app.input_buffer.contains(' ')
    {
        if let Some(cmd) = matching_commands(&app.input_buffer).first() {
            if let Some(ghost) = cmd.name.strip_prefix(app.input_buffer.as_str()) {
                spans.push(Span::styled(ghost, Style::default().fg(theme::TEXT_MUTED)));
            }
        }
    }

    spans.push(Span::styled("_", Style::default().fg(theme::TEXT_MUTED)));

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}

pub fn render_suggestions(app: &App, frame: &mut Frame, area: Rect) {
    let background = Style::default().bg(theme::BG_BAR);

    let line = match app.input_mode {
        InputMode::Search => Line::from(Span::styled(
            " admin name, target id or record id",
            Style::default().fg(theme::TEXT_MUTED),
        )),
        InputMode::Command if app.input_buffer.contains(' ') => Line::from(""),
        InputMode::Command => {
            let input_cmd = app.input_buffer.trim();
            let matches: Vec<&CommandDef> = if input_cmd.is_empty() {
                COMMANDS.iter().collect()
            } else {
                matching_commands(input_cmd)
            };
            if matches.is_empty() {
                Line::from(Span::styled(
                    " No matching commands",
                    Style::default().fg(theme::TEXT_MUTED),
                ))
            } else {
                let mut spans: Vec<Span> = vec![Span::raw(" ")];
                for (i, cmd) in matches.iter().enumerate() {
                    let cmd_style = if i == 0 {
                        Style::default().fg(theme::INDIGO)
                    } else {
                        Style::default().fg(theme::TEXT_DIM)
                    };
                    spans.push(Span::styled(format!(":{}", cmd.name), cmd_style));
                    for alias in cmd.aliases {
                        spans.push(Span::styled(
                            format!("|{}", alias),
                            Style::default().fg(theme::TEXT_MUTED),
                        ));
                    }
                    spans.push(Span::styled(
                        format!(" {}  ", cmd.description),
                        Style::default().fg(theme::TEXT_MUTED),
                    ));
                }
                Line::from(spans)
            }
        }
        _ => return,
    };

    frame.render_widget(Paragraph::new(line).style(background), area);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::action::Action;
    use crate::app::App;
    use crate::widgets::testing::{contains, screen};

    #[test]
    fn command_line_shows_ghost_completion() {
        let mut app = App::new("http://localhost:8080".to_string(), Duration::from_secs(5));
        app.update(Action::OpenCommandInput);
        app.update(Action::UpdateInputBuffer("un".to_string()));

        let rows = screen(&mut app, 120, 10);

        assert!(rows[9].starts_with(":until_"));
        assert!(contains(&rows, ":until Only show records on or before a date"));
    }
}
