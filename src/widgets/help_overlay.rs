use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::app::View;
use crate::input::commands::COMMANDS;
use crate::theme;

pub fn render(view: View, frame: &mut Frame, area: Rect) {
    let mut lines = vec![];

    lines.push(Line::from(""));
    lines.push(section("Navigation"));
    lines.push(binding("j / k / Up / Down", "Move / scroll"));
    lines.push(binding("gg / G", "Go to top / bottom"));
    lines.push(binding("Ctrl+D / Ctrl+U", "Page down / up"));
    match view {
        View::List => {
            lines.push(binding("Enter", "Open record"));
            lines.push(binding("/ (slash)", "Search admin or id"));
        }
        View::Detail => {
            lines.push(binding("Esc", "Back to list"));
            lines.push(binding("Tab / h / l", "Fields / Files"));
        }
    }

    lines.push(Line::from(""));
    lines.push(section("Commands"));
    for cmd in COMMANDS {
        lines.push(binding_owned(format!(":{}", cmd.name), cmd.description));
    }

    lines.push(Line::from(""));
    lines.push(section("General"));
    lines.push(binding("Ctrl+R", "Refresh"));
    lines.push(binding("p", "Pause / resume polling"));
    lines.push(binding("?", "Toggle this help"));

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(4));
    let modal_area = centered_rect(70, height, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::INDIGO))
        .title(" Help (? to close) ");

    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(theme::INDIGO)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    binding_owned(key.to_string(), desc)
}

fn binding_owned(key: String, desc: &str) -> Line<'_> {
    Line::from(vec![
        Span::styled(format!("    {:<22}", key), Style::default().fg(theme::YELLOW)),
        Span::styled(desc, Style::default().fg(theme::TEXT)),
    ])
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::action::Action;
    use crate::app::App;
    use crate::widgets::testing::{contains, screen};

    #[test]
    fn lists_registered_commands() {
        let mut app = App::new("http://localhost:8080".to_string(), Duration::from_secs(5));
        app.update(Action::ToggleHelp);

        let rows = screen(&mut app, 120, 40);

        assert!(contains(&rows, "Help (? to close)"));
        assert!(contains(&rows, ":from"));
        assert!(contains(&rows, "Open record"));
    }
}
