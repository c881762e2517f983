use ratatui::style::Color;

use crate::hos::Severity;
use crate::types::DutyStatus;

/// Unified color theme for the application
pub struct Theme;

impl Theme {
    /// Primary branding color
    pub fn primary() -> Color {
        Color::Blue
    }

    /// Secondary/border color
    pub fn secondary() -> Color {
        Color::Cyan
    }

    /// Compliant/ok status
    pub fn success() -> Color {
        Color::Green
    }

    /// Warning severity
    pub fn warn() -> Color {
        Color::Yellow
    }

    /// Critical severity
    pub fn critical() -> Color {
        Color::Red
    }

    /// Selection/highlight
    pub fn highlight() -> Color {
        Color::Cyan
    }

    /// Selection marker/arrow
    pub fn selection_marker() -> Color {
        Color::Green
    }

    /// Dimmed/inactive text
    pub fn dim() -> Color {
        Color::DarkGray
    }

    /// Normal text
    pub fn text() -> Color {
        Color::White
    }

    /// Accent for numbers/counts
    pub fn accent() -> Color {
        Color::LightBlue
    }

    /// Badge color per duty status, matching the web log sheet palette.
    pub fn status(status: DutyStatus) -> Color {
        match status {
            DutyStatus::Driving => Color::LightBlue,
            DutyStatus::OnDuty => Color::Yellow,
            DutyStatus::OffDuty => Color::Green,
            DutyStatus::Sleeper => Color::Magenta,
        }
    }

    pub fn severity(severity: Severity) -> Color {
        match severity {
            Severity::Normal => Theme::success(),
            Severity::Warning => Theme::warn(),
            Severity::Critical => Theme::critical(),
        }
    }
}
