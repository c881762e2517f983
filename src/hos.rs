/// Hours-of-service aggregation and compliance checks.
///
/// Everything here is a pure function of the duty-log list and the trip's
/// cycle baseline. Stats are recomputed on every refresh and never stored.
use crate::types::{DutyLog, DutyStatus};

pub const DRIVING_LIMIT_HOURS: f64 = 11.0;
pub const ON_DUTY_LIMIT_HOURS: f64 = 14.0;
pub const OFF_DUTY_MIN_HOURS: f64 = 10.0;
pub const CYCLE_WARN_HOURS: f64 = 8.0;
pub const CYCLE_LIMIT_HOURS: f64 = 11.0;

/// Per-status duration totals in hours, rounded to one decimal place.
/// `warnings` collects per-entry data-quality notes instead of failing the
/// whole aggregation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateStats {
    pub off_duty_hours: f64,
    pub sleeper_hours: f64,
    pub driving_hours: f64,
    pub on_duty_hours: f64,
    pub warnings: Vec<String>,
}

impl AggregateStats {
    pub fn hours_for(&self, status: DutyStatus) -> f64 {
        match status {
            DutyStatus::OffDuty => self.off_duty_hours,
            DutyStatus::Sleeper => self.sleeper_hours,
            DutyStatus::Driving => self.driving_hours,
            DutyStatus::OnDuty => self.on_duty_hours,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.off_duty_hours + self.sleeper_hours + self.driving_hours + self.on_duty_hours
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComplianceCheck {
    pub label: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Sums `(end - start)` per status. Intervals are summed in whole seconds and
/// only the final per-status total is rounded, so rounding error does not
/// compound across entries. A negative interval counts as zero and leaves a
/// note in `warnings`.
pub fn aggregate(logs: &[DutyLog]) -> AggregateStats {
    let mut seconds = [0i64; 4];
    let mut warnings = Vec::new();

    for (index, log) in logs.iter().enumerate() {
        let span = log
            .end_time
            .signed_duration_since(log.start_time)
            .num_seconds();
        if span < 0 {
            warnings.push(format!(
                "entry {}: end time before start time, counted as zero",
                index + 1
            ));
            continue;
        }
        seconds[log.status.grid_row()] += span;
    }

    AggregateStats {
        off_duty_hours: round_tenth(seconds[DutyStatus::OffDuty.grid_row()]),
        sleeper_hours: round_tenth(seconds[DutyStatus::Sleeper.grid_row()]),
        driving_hours: round_tenth(seconds[DutyStatus::Driving.grid_row()]),
        on_duty_hours: round_tenth(seconds[DutyStatus::OnDuty.grid_row()]),
        warnings,
    }
}

fn round_tenth(seconds: i64) -> f64 {
    (seconds as f64 / 3600.0 * 10.0).round() / 10.0
}

/// Severity of the multi-day cycle accumulation against the 11-hour ceiling.
/// Independent of the single-day driving ceiling below.
pub fn cycle_severity(cycle_used: f64) -> Severity {
    if cycle_used >= CYCLE_LIMIT_HOURS {
        Severity::Critical
    } else if cycle_used >= CYCLE_WARN_HOURS {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

/// Evaluates the day's totals and the trip's cycle baseline against the
/// fixed regulatory thresholds. Always returns one check per metric so the
/// UI can render a full card row.
pub fn evaluate(stats: &AggregateStats, cycle_used: f64) -> Vec<ComplianceCheck> {
    let mut checks = Vec::new();

    checks.push(ceiling_check(
        "Driving",
        stats.driving_hours,
        DRIVING_LIMIT_HOURS,
    ));
    checks.push(ceiling_check(
        "On Duty",
        stats.on_duty_hours,
        ON_DUTY_LIMIT_HOURS,
    ));

    // The under-minimum rule only applies once the day has logged time;
    // an empty log sheet is all-normal.
    let off_duty = if stats.total_hours() > 0.0 && stats.off_duty_hours < OFF_DUTY_MIN_HOURS {
        ComplianceCheck {
            label: "Off Duty",
            severity: Severity::Warning,
            message: format!(
                "under minimum by {:.1} hrs",
                OFF_DUTY_MIN_HOURS - stats.off_duty_hours
            ),
        }
    } else {
        ComplianceCheck {
            label: "Off Duty",
            severity: Severity::Normal,
            message: "meets minimum".to_string(),
        }
    };
    checks.push(off_duty);

    let cycle = match cycle_severity(cycle_used) {
        Severity::Critical => ComplianceCheck {
            label: "Cycle Used",
            severity: Severity::Critical,
            message: format!("exceeds limit by {:.1} hrs", cycle_used - CYCLE_LIMIT_HOURS),
        },
        Severity::Warning => ComplianceCheck {
            label: "Cycle Used",
            severity: Severity::Warning,
            message: format!("approaching {CYCLE_LIMIT_HOURS:.0} hr limit"),
        },
        Severity::Normal => ComplianceCheck {
            label: "Cycle Used",
            severity: Severity::Normal,
            message: "within limit".to_string(),
        },
    };
    checks.push(cycle);

    checks
}

fn ceiling_check(label: &'static str, hours: f64, limit: f64) -> ComplianceCheck {
    if hours > limit {
        ComplianceCheck {
            label,
            severity: Severity::Critical,
            message: format!("exceeds limit by {:.1} hrs", hours - limit),
        }
    } else {
        ComplianceCheck {
            label,
            severity: Severity::Normal,
            message: "within limit".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    fn log(status: DutyStatus, start: DateTime<Utc>, end: DateTime<Utc>) -> DutyLog {
        DutyLog {
            id: None,
            trip_id: 1,
            status,
            start_time: start,
            end_time: end,
            location: Location::at_address("I-80 rest area"),
            remarks: String::new(),
        }
    }

    #[test]
    fn empty_list_aggregates_to_zero_and_all_normal() {
        let stats = aggregate(&[]);
        assert_eq!(stats.off_duty_hours, 0.0);
        assert_eq!(stats.sleeper_hours, 0.0);
        assert_eq!(stats.driving_hours, 0.0);
        assert_eq!(stats.on_duty_hours, 0.0);
        assert!(stats.warnings.is_empty());

        for check in evaluate(&stats, 0.0) {
            assert_eq!(check.severity, Severity::Normal, "{}", check.label);
        }
    }

    #[test]
    fn sums_per_status_to_one_decimal() {
        let logs = vec![
            log(DutyStatus::Driving, at(1, 0, 0), at(1, 4, 30)),
            log(DutyStatus::OnDuty, at(1, 4, 30), at(1, 6, 0)),
        ];
        let stats = aggregate(&logs);
        assert_eq!(stats.driving_hours, 4.5);
        assert_eq!(stats.on_duty_hours, 1.5);
        assert_eq!(stats.off_duty_hours, 0.0);
        assert_eq!(stats.sleeper_hours, 0.0);
    }

    #[test]
    fn rounding_happens_once_not_per_entry() {
        // Three 20-minute stints: per-entry rounding would give 0.3 * 3 = 0.9.
        let logs = vec![
            log(DutyStatus::Driving, at(1, 8, 0), at(1, 8, 20)),
            log(DutyStatus::Driving, at(1, 9, 0), at(1, 9, 20)),
            log(DutyStatus::Driving, at(1, 10, 0), at(1, 10, 20)),
        ];
        assert_eq!(aggregate(&logs).driving_hours, 1.0);
    }

    #[test]
    fn minutes_are_conserved_across_statuses() {
        let logs = vec![
            log(DutyStatus::OffDuty, at(1, 0, 0), at(1, 6, 30)),
            log(DutyStatus::Driving, at(1, 6, 30), at(1, 11, 0)),
            log(DutyStatus::OnDuty, at(1, 11, 0), at(1, 12, 0)),
            // crosses midnight, no special casing expected
            log(DutyStatus::Sleeper, at(1, 22, 0), at(2, 6, 0)),
        ];
        let stats = aggregate(&logs);

        let total_minutes: i64 = logs
            .iter()
            .map(|l| l.end_time.signed_duration_since(l.start_time).num_minutes())
            .sum();
        let status_minutes = (stats.total_hours() * 60.0).round() as i64;
        assert_eq!(status_minutes, total_minutes);
    }

    #[test]
    fn zero_duration_contributes_nothing() {
        let logs = vec![log(DutyStatus::Driving, at(1, 5, 0), at(1, 5, 0))];
        let stats = aggregate(&logs);
        assert_eq!(stats.driving_hours, 0.0);
        assert!(stats.warnings.is_empty());
    }

    #[test]
    fn reversed_interval_counts_zero_and_warns() {
        let logs = vec![
            log(DutyStatus::Driving, at(1, 8, 0), at(1, 7, 0)),
            log(DutyStatus::OnDuty, at(1, 8, 0), at(1, 9, 0)),
        ];
        let stats = aggregate(&logs);
        assert_eq!(stats.driving_hours, 0.0);
        assert_eq!(stats.on_duty_hours, 1.0);
        assert_eq!(stats.warnings.len(), 1);
        assert!(stats.warnings[0].contains("entry 1"));
    }

    #[test]
    fn driving_over_ceiling_is_critical() {
        let logs = vec![log(DutyStatus::Driving, at(1, 0, 0), at(1, 11, 30))];
        let stats = aggregate(&logs);
        let checks = evaluate(&stats, 0.0);
        let driving = checks.iter().find(|c| c.label == "Driving").unwrap();
        assert_eq!(driving.severity, Severity::Critical);
        assert_eq!(driving.message, "exceeds limit by 0.5 hrs");
    }

    #[test]
    fn off_duty_under_minimum_flags_shortfall() {
        let logs = vec![
            log(DutyStatus::OffDuty, at(1, 0, 0), at(1, 8, 0)),
            log(DutyStatus::Driving, at(1, 8, 0), at(1, 12, 0)),
        ];
        let stats = aggregate(&logs);
        let checks = evaluate(&stats, 0.0);
        let off_duty = checks.iter().find(|c| c.label == "Off Duty").unwrap();
        assert_eq!(off_duty.severity, Severity::Warning);
        assert_eq!(off_duty.message, "under minimum by 2.0 hrs");
    }

    #[test]
    fn cycle_tiers_escalate() {
        assert_eq!(cycle_severity(2.0), Severity::Normal);
        assert_eq!(cycle_severity(8.0), Severity::Warning);
        assert_eq!(cycle_severity(9.5), Severity::Warning);
        assert_eq!(cycle_severity(11.0), Severity::Critical);

        let checks = evaluate(&AggregateStats::default(), 12.0);
        let cycle = checks.iter().find(|c| c.label == "Cycle Used").unwrap();
        assert_eq!(cycle.severity, Severity::Critical);
        assert_eq!(cycle.message, "exceeds limit by 1.0 hrs");
    }

    #[test]
    fn aggregation_is_deterministic() {
        let logs = vec![
            log(DutyStatus::Driving, at(1, 1, 0), at(1, 3, 45)),
            log(DutyStatus::OffDuty, at(1, 3, 45), at(1, 9, 0)),
        ];
        assert_eq!(aggregate(&logs), aggregate(&logs));
    }
}
