use chrono::Local;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::format_hours;
use super::theme::Theme;
use crate::app::App;
use crate::hos;

pub fn build_dashboard_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    // Welcome section
    let now = Local::now();
    lines.push(Line::from(Span::styled(
        format!("  Welcome to Haulog - {}", now.format("%A, %B %e, %Y")),
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    // Fleet summary section
    lines.push(Line::from(Span::styled(
        "  Fleet Summary",
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "  ──────────────",
        Style::default().fg(Theme::dim()),
    )));

    let total_logs: usize = app.trips.iter().map(|trip| trip.logs.len()).sum();
    lines.push(Line::from(vec![
        Span::styled("  Trips: ", Style::default().fg(Theme::dim())),
        Span::styled(
            format!("{}", app.trips.len()),
            Style::default()
                .fg(Theme::text())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Log entries: ", Style::default().fg(Theme::dim())),
        Span::styled(
            format!("{total_logs}"),
            Style::default()
                .fg(Theme::text())
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));

    // Recent trips section
    lines.push(Line::from(Span::styled(
        "  Recent Trips",
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "  ─────────────",
        Style::default().fg(Theme::dim()),
    )));

    if app.trips.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No trips yet - press 'n' to plan one",
            Style::default().fg(Theme::dim()),
        )));
    } else {
        for trip in app.trips.iter().take(5) {
            let stats = hos::aggregate(&trip.logs);
            let worst = hos::evaluate(&stats, trip.current_cycle_used)
                .into_iter()
                .map(|check| check.severity)
                .max_by_key(|severity| match severity {
                    hos::Severity::Normal => 0,
                    hos::Severity::Warning => 1,
                    hos::Severity::Critical => 2,
                })
                .unwrap_or(hos::Severity::Normal);
            let badge = match worst {
                hos::Severity::Normal => "ok",
                hos::Severity::Warning => "warn",
                hos::Severity::Critical => "CRIT",
            };

            lines.push(Line::from(vec![
                Span::styled("  • ", Style::default().fg(Theme::dim())),
                Span::styled(
                    format!(
                        "{} -> {}",
                        trip.pickup_location.address, trip.dropoff_location.address
                    ),
                    Style::default().fg(Theme::text()),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("[driving {}]", format_hours(stats.driving_hours)),
                    Style::default().fg(Theme::accent()),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("[{badge}]"),
                    Style::default()
                        .fg(Theme::severity(worst))
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
    }
    lines.push(Line::from(""));

    // Thresholds reference section
    lines.push(Line::from(Span::styled(
        "  Limits",
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "  ───────",
        Style::default().fg(Theme::dim()),
    )));
    lines.push(Line::from(Span::styled(
        format!(
            "  Driving {:.0}h max   On duty {:.0}h max   Off duty {:.0}h min   Cycle {:.0}h ({:.0}h warn)",
            hos::DRIVING_LIMIT_HOURS,
            hos::ON_DUTY_LIMIT_HOURS,
            hos::OFF_DUTY_MIN_HOURS,
            hos::CYCLE_LIMIT_HOURS,
            hos::CYCLE_WARN_HOURS,
        ),
        Style::default().fg(Theme::dim()),
    )));

    Text::from(lines)
}
