use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {key:<10}"),
            Style::default()
                .fg(Theme::selection_marker())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(description, Style::default().fg(Theme::text())),
    ])
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Theme::highlight())
            .add_modifier(Modifier::BOLD),
    ))
}

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Keyboard Shortcuts",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section("Global Navigation"));
    lines.push(key_line("h", "Dashboard/Home"));
    lines.push(key_line("t", "Trips view"));
    lines.push(key_line("q", "Quit application"));
    lines.push(key_line("?", "Toggle this help screen"));
    lines.push(Line::from(""));

    lines.push(section("Navigation"));
    lines.push(key_line("Tab", "Switch between tab bar and content"));
    lines.push(key_line("Left/Right", "Navigate tabs (when focused on tab bar)"));
    lines.push(key_line("Up/Down", "Move selection in the trip list"));
    lines.push(key_line("Enter", "Open selected trip"));
    lines.push(key_line("Esc", "Go back to previous view"));
    lines.push(Line::from(""));

    lines.push(section("Trips & Logs"));
    lines.push(key_line("n", "New trip (trip list) / new log entry (trip detail)"));
    lines.push(key_line("l", "Open the 24-hour duty chart"));
    lines.push(key_line("x", "Export the daily log grid as SVG"));
    lines.push(key_line("d", "Delete trip (asks for confirmation)"));
    lines.push(key_line("r", "Refresh current view"));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Tips",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(vec![
        Span::styled("  •", Style::default().fg(Theme::dim())),
        Span::styled(
            "  A new log entry starts where the previous one ended",
            Style::default().fg(Theme::text()),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  •", Style::default().fg(Theme::dim())),
        Span::styled(
            "  The footer shows the selected trip's cycle compliance",
            Style::default().fg(Theme::text()),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  •", Style::default().fg(Theme::dim())),
        Span::styled(
            "  Use CLI commands for batch operations (haulog --help)",
            Style::default().fg(Theme::text()),
        ),
    ]));

    Text::from(lines)
}
