mod dashboard;
mod detail;
mod help;
mod helpers;
mod theme;
mod timeline;
mod trips;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, AppView, FocusMode, LogField, TABS, TripField};
use crate::hos;
use crate::types::DutyStatus;
use theme::Theme;

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (title, body_text) = match app.view {
        AppView::Dashboard => (" Dashboard ", dashboard::build_dashboard_text(app)),
        AppView::Trips => (" Trips ", trips::build_trips_text(app)),
        AppView::TripDetail => (" Trip ", detail::build_trip_detail_text(app)),
        AppView::DutyChart => (" Duty Chart ", timeline::build_duty_chart_text(app)),
        AppView::Help => (" Help ", help::build_help_text()),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  Haulog  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "ELD trip logs",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(header, layout[0]);

    let mut body_lines = vec![
        tabs_line(app),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    body_lines.extend(body_text.lines);
    body_lines.push(Line::from(""));
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::dim()),
    )));
    body_lines.extend(keybinds_lines(app));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(body, layout[1]);

    let footer = Paragraph::new(Text::from(compliance_line(app)))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(footer, layout[2]);

    if let Some(popup) = &app.new_trip_popup {
        render_new_trip_popup(frame, popup);
    }
    if let Some(popup) = &app.new_log_popup {
        render_new_log_popup(frame, popup);
    }
    if let Some(popup) = &app.confirm_popup {
        render_confirm_popup(frame, popup);
    }
}

fn render_new_trip_popup(frame: &mut Frame, popup: &crate::app::NewTripPopup) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);

    let field_line = |active: bool, name: &'static str, content: &str| {
        let title_style = if active {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        };
        let value_style = if active {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::text())
        };
        Line::from(vec![
            Span::styled(if active { "> " } else { "  " }, title_style),
            Span::styled(format!("{name:<12}"), title_style),
            Span::styled(content.to_string(), value_style),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(
            "New trip",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field_line(popup.field == TripField::Pickup, "Pickup:", &popup.pickup),
        field_line(popup.field == TripField::Dropoff, "Dropoff:", &popup.dropoff),
        field_line(popup.field == TripField::Current, "Current:", &popup.current),
        field_line(
            popup.field == TripField::CycleUsed,
            "Cycle used:",
            if popup.cycle_used.is_empty() {
                "0"
            } else {
                popup.cycle_used.as_str()
            },
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Type to edit. Tab: switch field. Enter: save. Esc: cancel.",
            Style::default().fg(Theme::dim()),
        )),
    ];

    let popup_widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary()))
                .title(" New Trip "),
        );
    frame.render_widget(popup_widget, area);
}

fn render_new_log_popup(frame: &mut Frame, popup: &crate::app::NewLogPopup) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);

    let status_active = popup.field == LogField::Status;
    let remarks_active = popup.field == LogField::Remarks;
    let address_active = popup.field == LogField::Address;

    let arrow_style = Style::default()
        .fg(Theme::selection_marker())
        .add_modifier(Modifier::BOLD);
    let title_style = |active: bool| {
        if active {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        }
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "New log entry",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(if status_active { "> " } else { "  " }, arrow_style),
            Span::styled("Status", title_style(status_active)),
        ]),
    ];

    for (index, status) in DutyStatus::ALL.iter().enumerate() {
        let selected = index == popup.status_index;
        let marker_style = if selected {
            arrow_style
        } else {
            Style::default().fg(Theme::dim())
        };
        let mut name_style = Style::default().fg(Theme::status(*status));
        if selected {
            name_style = name_style.add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(vec![
            Span::styled(if selected { "> " } else { "  " }, marker_style),
            Span::styled(status.label(), name_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(if remarks_active { "> " } else { "  " }, arrow_style),
        Span::styled("Remarks: ", title_style(remarks_active)),
        Span::styled(
            popup.remarks.as_str(),
            Style::default().fg(Theme::text()),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled(if address_active { "> " } else { "  " }, arrow_style),
        Span::styled("Address: ", title_style(address_active)),
        Span::styled(
            popup.address.as_str(),
            Style::default().fg(Theme::text()),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Ends now; starts where the last entry ended.",
        Style::default().fg(Theme::dim()),
    )));
    lines.push(Line::from(Span::styled(
        "Tab: switch field. Up/Down: status. Enter: save. Esc: cancel.",
        Style::default().fg(Theme::dim()),
    )));

    let popup_widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary()))
                .title(" New Log Entry "),
        );
    frame.render_widget(popup_widget, area);
}

fn render_confirm_popup(frame: &mut Frame, popup: &crate::app::ConfirmPopup) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "Confirm Action",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            popup.message.as_str(),
            Style::default().fg(Theme::text()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Theme::dim())),
            Span::styled(
                "Y",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to confirm or ", Style::default().fg(Theme::dim())),
            Span::styled(
                "N",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("/", Style::default().fg(Theme::dim())),
            Span::styled(
                "ESC",
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to cancel", Style::default().fg(Theme::dim())),
        ]),
    ];

    let popup_widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary()))
                .title(" Confirm "),
        );
    frame.render_widget(popup_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn tabs_line(app: &App) -> Line<'_> {
    let mut spans = Vec::new();
    for (index, (name, view)) in TABS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let active = match app.view {
            AppView::TripDetail | AppView::DutyChart => *view == AppView::Trips,
            _ => *view == app.view,
        };
        let focused = app.focus_mode == FocusMode::TabBar && app.selected_tab_index == index;
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Theme::dim())
        };
        spans.push(Span::styled(format!(" {name} "), style));
    }

    Line::from(spans)
}

/// Footer line: cycle compliance for the trip under the cursor, mirroring
/// the stat card severities.
fn compliance_line(app: &App) -> Line<'_> {
    let Some(trip) = app.current_trip() else {
        return Line::from(Span::styled(
            "● No trip selected",
            Style::default().fg(Theme::dim()),
        ));
    };

    let stats = hos::aggregate(&trip.logs);
    let severity = hos::cycle_severity(trip.current_cycle_used);
    let severity_label = match severity {
        hos::Severity::Normal => "ok",
        hos::Severity::Warning => "warning",
        hos::Severity::Critical => "CRITICAL",
    };

    Line::from(vec![
        Span::styled(
            "● ",
            Style::default()
                .fg(Theme::severity(severity))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "{} -> {}  ",
                trip.pickup_location.address, trip.dropoff_location.address
            ),
            Style::default()
                .fg(Theme::text())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "cycle {:.1}h ({severity_label})  driving {:.1}h",
                trip.current_cycle_used, stats.driving_hours
            ),
            Style::default().fg(Theme::severity(severity)),
        ),
    ])
}

fn keybinds_lines(app: &App) -> Vec<Line<'static>> {
    let focus_hint = if app.focus_mode == FocusMode::TabBar {
        "Tab: Switch to content  Left/Right: Navigate tabs  Enter: Select"
    } else {
        "Tab: Switch to tab bar  h/t: Quick nav"
    };

    let (primary, secondary) = match app.view {
        AppView::Dashboard => (
            "h: Home  t: Trips  n: New trip",
            "r: Refresh  ?: Help  q: Quit",
        ),
        AppView::Trips => (
            "Up/Down: Select  Enter: Open  n: New trip  l: Chart  d: Delete",
            "r: Refresh  ?: Help  q: Quit",
        ),
        AppView::TripDetail => (
            "n: New log  l: Chart  x: Export  d: Delete",
            "esc: Back  r: Refresh  ?: Help  q: Quit",
        ),
        AppView::DutyChart => ("x: Export", "esc: Back  r: Refresh  ?: Help  q: Quit"),
        AppView::Help => ("Press ? or ESC to close this help screen", ""),
    };
    vec![
        Line::from(Span::styled(
            focus_hint,
            Style::default().fg(Theme::highlight()),
        )),
        Line::from(Span::styled(primary, Style::default().fg(Theme::dim()))),
        Line::from(Span::styled(secondary, Style::default().fg(Theme::dim()))),
    ]
}
