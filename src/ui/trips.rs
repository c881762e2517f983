use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::clamp_name;
use super::theme::Theme;
use crate::app::App;
use crate::hos;

pub fn build_trips_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    if let Some(status) = &app.status {
        lines.push(Line::from(status.as_str()));
        return Text::from(lines);
    }

    if app.trips.is_empty() {
        lines.push(Line::from("No trips found. Press 'n' to create one."));
        return Text::from(lines);
    }

    lines.push(Line::from(Span::styled(
        format!(
            "  {:>4} {:<40} {:>7} {:>5} {:>9}",
            "Id", "Route", "Cycle", "Logs", "Driving"
        ),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!(
            "  {:>4} {:<40} {:>7} {:>5} {:>9}",
            "----", "----------------------------------------", "-------", "-----", "---------"
        ),
        Style::default().fg(Theme::dim()),
    )));

    let trip_lines = app
        .trips
        .iter()
        .enumerate()
        .map(|(index, trip)| {
            let stats = hos::aggregate(&trip.logs);
            let route = clamp_name(
                &format!(
                    "{} -> {}",
                    trip.pickup_location.address, trip.dropoff_location.address
                ),
                40,
            );
            let selected = index == app.selected_trip_index;
            let route_style = if selected {
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker_style = if selected {
                Style::default().fg(Theme::selection_marker())
            } else {
                Style::default().fg(Theme::dim())
            };
            let cycle_severity = hos::cycle_severity(trip.current_cycle_used);
            Line::from(vec![
                Span::styled(if selected { "> " } else { "  " }, marker_style),
                Span::styled(format!("{:>4} ", trip.id.unwrap_or(0)), Style::default().fg(Theme::dim())),
                Span::styled(route, route_style),
                Span::raw(" "),
                Span::styled(
                    format!("{:>6.1}h", trip.current_cycle_used),
                    Style::default().fg(Theme::severity(cycle_severity)),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:>5}", trip.logs.len()),
                    Style::default().fg(Theme::accent()),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:>8.1}h", stats.driving_hours),
                    Style::default().fg(Theme::accent()),
                ),
            ])
        })
        .collect::<Vec<_>>();
    lines.extend(trip_lines);
    Text::from(lines)
}
