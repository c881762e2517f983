use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{format_duration, format_hours};
use super::theme::Theme;
use crate::app::App;
use crate::hos;
use crate::types::DutyStatus;

pub fn build_trip_detail_text(app: &App) -> Text<'_> {
    if let Some(status) = &app.status {
        return Text::from(status.as_str());
    }
    let Some(trip) = &app.selected_trip else {
        return Text::from("No trip selected.");
    };

    const LABEL_WIDTH: usize = 11;
    let label_style = Style::default().fg(Theme::dim());
    let label = |name: &str| {
        let label_text = format!("{name}:");
        Span::styled(
            format!("{label_text:width$}", width = LABEL_WIDTH),
            label_style,
        )
    };
    let value = |text: &str| Span::raw(text.to_string());

    let stats = hos::aggregate(&trip.logs);
    let checks = hos::evaluate(&stats, trip.current_cycle_used);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                "Trip",
                Style::default()
                    .fg(Theme::primary())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} -> {}",
                    trip.pickup_location.address, trip.dropoff_location.address
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from("----------------------------------------"),
        Line::from(vec![label("Current"), value(&trip.current_location.address)]),
        Line::from(vec![label("Pickup"), value(&trip.pickup_location.address)]),
        Line::from(vec![label("Dropoff"), value(&trip.dropoff_location.address)]),
        Line::from(vec![
            label("Cycle"),
            Span::styled(
                format_hours(trip.current_cycle_used),
                Style::default()
                    .fg(Theme::severity(hos::cycle_severity(trip.current_cycle_used)))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" (initial cycle used)", label_style),
        ]),
        Line::from(vec![
            label("Created"),
            value(&trip.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]),
        Line::from(vec![
            label("Updated"),
            value(&trip.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]),
        Line::from(""),
    ];

    // Stat cards, one per duty status.
    lines.push(Line::from(vec![Span::styled(
        "Hours",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )]));
    let mut card_spans = vec![Span::raw("  ")];
    for status in DutyStatus::ALL {
        card_spans.push(Span::styled(
            format!("{}: ", status.label()),
            Style::default().fg(Theme::status(status)),
        ));
        card_spans.push(Span::styled(
            format_hours(stats.hours_for(status)),
            Style::default()
                .fg(Theme::text())
                .add_modifier(Modifier::BOLD),
        ));
        card_spans.push(Span::raw("   "));
    }
    lines.push(Line::from(card_spans));
    lines.push(Line::from(""));

    let flagged: Vec<_> = checks
        .iter()
        .filter(|check| check.severity != hos::Severity::Normal)
        .collect();
    if !flagged.is_empty() {
        lines.push(Line::from(vec![Span::styled(
            "Alerts",
            Style::default()
                .fg(Theme::warn())
                .add_modifier(Modifier::BOLD),
        )]));
        for check in flagged {
            lines.push(Line::from(vec![
                Span::styled("  ! ", Style::default().fg(Theme::severity(check.severity))),
                Span::styled(
                    format!("{}: {}", check.label, check.message),
                    Style::default().fg(Theme::severity(check.severity)),
                ),
            ]));
        }
        lines.push(Line::from(""));
    }
    for warning in &stats.warnings {
        lines.push(Line::from(Span::styled(
            format!("  ! {warning}"),
            Style::default().fg(Theme::warn()),
        )));
    }

    lines.push(Line::from(vec![Span::styled(
        format!("Log entries ({})", trip.logs.len()),
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )]));

    if trip.logs.is_empty() {
        lines.push(Line::from(vec![Span::styled("  none", label_style)]));
    } else {
        for (index, log) in trip.logs.iter().enumerate() {
            let start = log.start_time.format("%m-%d %H:%M").to_string();
            let end = log.end_time.format("%m-%d %H:%M").to_string();
            let duration = format_duration(log.end_time.signed_duration_since(log.start_time));

            let mut spans = vec![
                Span::raw(format!("  {:>2}) ", index + 1)),
                Span::styled(
                    format!("{:<22}", log.status.label()),
                    Style::default()
                        .fg(Theme::status(log.status))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{start} -> {end} ")),
                Span::styled(format!("({duration})"), Style::default().fg(Theme::dim())),
            ];
            if !log.location.address.is_empty() {
                spans.push(Span::styled(
                    format!("  @ {}", log.location.address),
                    Style::default().fg(Theme::dim()),
                ));
            }
            lines.push(Line::from(spans));
            if !log.remarks.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("        {}", log.remarks),
                    Style::default().fg(Theme::dim()).add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(
        "n: New log   l: Duty chart   x: Export SVG   d: Delete trip   esc: Back",
    ));
    Text::from(lines)
}
