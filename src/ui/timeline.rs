use chrono::{DateTime, Duration, NaiveDate, Utc};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::format_hours;
use super::theme::Theme;
use crate::app::App;
use crate::hos;
use crate::types::{DutyLog, DutyStatus};

/// One chart row per duty status: seconds of that status in each UTC hour
/// of the displayed day.
struct StatusRow {
    status: DutyStatus,
    hours: [u32; 24],
}

pub fn build_duty_chart_text(app: &App) -> Text<'_> {
    let Some(trip) = &app.selected_trip else {
        return Text::from("No trip selected.");
    };

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        "  24-Hour Duty Chart",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let Some(first_log) = trip.logs.first() else {
        lines.push(Line::from("  No log entries yet. Press esc, then 'n' to add one."));
        return Text::from(lines);
    };

    let day = first_log.start_time.date_naive();
    lines.push(Line::from(Span::styled(
        format!("  Date: {} (UTC)", day.format("%Y-%m-%d")),
        Style::default().fg(Theme::secondary()),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {:<22} {}", "Hours", hour_markers()),
        Style::default().fg(Theme::dim()),
    )));

    let stats = hos::aggregate(&trip.logs);
    for row in build_status_rows(&trip.logs, day) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<22} ", row.status.label()),
                Style::default()
                    .fg(Theme::status(row.status))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(bar_for_hours(&row.hours), Style::default().fg(Theme::text())),
            Span::styled(
                format!("  {}", format_hours(stats.hours_for(row.status))),
                Style::default().fg(Theme::accent()),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Legend: . none  : <15m  = <30m  + <45m  # 45m+",
        Style::default().fg(Theme::dim()),
    )));
    for warning in &stats.warnings {
        lines.push(Line::from(Span::styled(
            format!("  ! {warning}"),
            Style::default().fg(Theme::warn()),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("  x: Export SVG   esc: Back"));

    Text::from(lines)
}

fn build_status_rows(logs: &[DutyLog], day: NaiveDate) -> Vec<StatusRow> {
    let day_start = day.and_hms_opt(0, 0, 0).expect("valid time").and_utc();
    let day_end = day_start + Duration::days(1);

    let mut rows = DutyStatus::ALL.map(|status| StatusRow {
        status,
        hours: [0; 24],
    });

    for log in logs {
        let row = &mut rows[log.status.grid_row()];
        add_interval_to_row(row, log.start_time, log.end_time, day_start, day_end);
    }
    rows.into_iter().collect()
}

fn add_interval_to_row(
    row: &mut StatusRow,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) {
    if end <= day_start || start >= day_end {
        return;
    }

    let overlap_start = if start > day_start { start } else { day_start };
    let overlap_end = if end < day_end { end } else { day_end };
    if overlap_end <= overlap_start {
        return;
    }

    for hour in 0..24 {
        let hour_start = day_start + Duration::hours(hour);
        let hour_end = hour_start + Duration::hours(1);
        if overlap_end > hour_start && overlap_start < hour_end {
            let segment_start = if overlap_start > hour_start {
                overlap_start
            } else {
                hour_start
            };
            let segment_end = if overlap_end < hour_end { overlap_end } else { hour_end };
            let seconds = segment_end
                .signed_duration_since(segment_start)
                .num_seconds()
                .max(0) as u32;
            row.hours[hour as usize] = row.hours[hour as usize].saturating_add(seconds);
        }
    }
}

fn bar_for_hours(hours: &[u32; 24]) -> String {
    hours.iter().map(|&secs| hour_fill(secs)).collect()
}

fn hour_fill(seconds: u32) -> char {
    match seconds {
        0 => '.',
        1..=899 => ':',
        900..=1799 => '=',
        1800..=2699 => '+',
        _ => '#',
    }
}

fn hour_markers() -> String {
    let mut marker = String::new();
    for hour in 0..24 {
        if hour % 4 == 0 {
            marker.push('|');
        } else {
            marker.push(' ');
        }
    }
    marker
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use chrono::TimeZone;

    fn log(status: DutyStatus, start_h: u32, end_h: u32) -> DutyLog {
        DutyLog {
            id: None,
            trip_id: 1,
            status,
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, start_h, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 3, 1, end_h, 0, 0).unwrap(),
            location: Location::at_address(""),
            remarks: String::new(),
        }
    }

    #[test]
    fn full_hours_fill_their_cells() {
        let logs = vec![log(DutyStatus::Driving, 2, 5)];
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rows = build_status_rows(&logs, day);
        let driving = &rows[DutyStatus::Driving.grid_row()];
        assert_eq!(driving.hours[1], 0);
        assert_eq!(driving.hours[2], 3600);
        assert_eq!(driving.hours[4], 3600);
        assert_eq!(driving.hours[5], 0);
        assert_eq!(bar_for_hours(&driving.hours).chars().nth(3), Some('#'));
    }

    #[test]
    fn statuses_land_on_their_own_rows() {
        let logs = vec![
            log(DutyStatus::OffDuty, 0, 6),
            log(DutyStatus::Driving, 6, 10),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rows = build_status_rows(&logs, day);
        assert_eq!(rows[DutyStatus::OffDuty.grid_row()].hours[0], 3600);
        assert_eq!(rows[DutyStatus::Driving.grid_row()].hours[0], 0);
        assert_eq!(rows[DutyStatus::Driving.grid_row()].hours[6], 3600);
    }

    #[test]
    fn spill_past_midnight_is_clipped_to_the_day() {
        let late = DutyLog {
            end_time: Utc.with_ymd_and_hms(2024, 3, 2, 2, 0, 0).unwrap(),
            ..log(DutyStatus::Sleeper, 22, 23)
        };
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rows = build_status_rows(&[late], day);
        let sleeper = &rows[DutyStatus::Sleeper.grid_row()];
        assert_eq!(sleeper.hours[22], 3600);
        assert_eq!(sleeper.hours[23], 3600);
        assert_eq!(sleeper.hours.iter().map(|&s| s as u64).sum::<u64>(), 7200);
    }
}
