pub mod command_input;
pub mod error_toast;
pub mod footer;
pub mod header;
pub mod help_overlay;
pub mod history_detail;
pub mod history_list;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::app::{App, InputMode, Overlay, View};
use crate::theme;

/// Draws the whole screen for the current app state.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(theme::BG_DARK)), area);

    let layout = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Fill(1),   // Content
        Constraint::Length(1), // Footer / input
    ])
    .split(area);

    header::render(app, frame, layout[0]);

    match app.view {
        View::List => history_list::render(app, frame, layout[1]),
        View::Detail => history_detail::render(app, frame, layout[1]),
    }

    match app.input_mode {
        InputMode::Command | InputMode::Search => {
            let suggestions = Rect {
                y: layout[1].bottom().saturating_sub(1),
                height: layout[1].height.min(1),
                ..layout[1]
            };
            command_input::render_suggestions(app, frame, suggestions);
            command_input::render(app, frame, layout[2]);
        }
        InputMode::Normal | InputMode::PendingG => footer::render(app, frame, layout[2]),
    }

    if app.overlay == Overlay::Help {
        help_overlay::render(app.view, frame, area);
    }

    error_toast::render(app, frame, area);
}

pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0]);
    horizontal[0]
}
