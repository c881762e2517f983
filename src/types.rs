use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TripId = u32;
pub type LogId = u32;

/// Driver duty status as recorded by the ELD. The wire form (`as_str`) is
/// what gets stored in SQLite and must round-trip through `parse`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DutyStatus {
    OffDuty,
    Sleeper,
    Driving,
    OnDuty,
}

impl DutyStatus {
    pub const ALL: [DutyStatus; 4] = [
        DutyStatus::OffDuty,
        DutyStatus::Sleeper,
        DutyStatus::Driving,
        DutyStatus::OnDuty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DutyStatus::OffDuty => "OFF_DUTY",
            DutyStatus::Sleeper => "SLEEPER",
            DutyStatus::Driving => "DRIVING",
            DutyStatus::OnDuty => "ON_DUTY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DutyStatus::OffDuty => "Off Duty",
            DutyStatus::Sleeper => "Sleeper Berth",
            DutyStatus::Driving => "Driving",
            DutyStatus::OnDuty => "On Duty (Not Driving)",
        }
    }

    pub fn parse(raw: &str) -> Option<DutyStatus> {
        match raw {
            "OFF_DUTY" => Some(DutyStatus::OffDuty),
            "SLEEPER" => Some(DutyStatus::Sleeper),
            "DRIVING" => Some(DutyStatus::Driving),
            "ON_DUTY" => Some(DutyStatus::OnDuty),
            _ => None,
        }
    }

    /// Row index on the FMCSA daily log grid, top to bottom. The ordering is
    /// a federal form convention and must not change.
    pub fn grid_row(&self) -> usize {
        match self {
            DutyStatus::OffDuty => 0,
            DutyStatus::Sleeper => 1,
            DutyStatus::Driving => 2,
            DutyStatus::OnDuty => 3,
        }
    }
}

/// A geocoded point with its display address. Stored as one JSON column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Location {
    pub fn at_address(address: impl Into<String>) -> Self {
        Location {
            lat: 0.0,
            lng: 0.0,
            address: address.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub id: Option<TripId>,
    pub current_location: Location,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    /// Hours of the multi-day cycle already used when the trip was created.
    pub current_cycle_used: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub logs: Vec<DutyLog>,
}

///A single DutyLog is one closed duty-status interval belonging to a trip
#[derive(Clone, Debug, PartialEq)]
pub struct DutyLog {
    pub id: Option<LogId>,
    pub trip_id: TripId,
    pub status: DutyStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Location,
    pub remarks: String,
}

pub(crate) enum TripQuery {
    All,
    ById(TripId),
}
