use chrono::Utc;
use crossterm::event::KeyCode;
use rusqlite::Connection;

use crate::types::{DutyStatus, Location, Trip, TripId, TripQuery};
use crate::{db, grid};

use super::{AppEvent, AppView, FocusMode, TABS};

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub db: Connection,
    pub view: AppView,
    view_history: Vec<AppView>,
    pub trips: Vec<Trip>,
    pub status: Option<String>,
    pub selected_trip_index: usize,
    pub selected_trip: Option<Trip>,
    pub focus_mode: FocusMode,
    pub selected_tab_index: usize,
    pub new_trip_popup: Option<NewTripPopup>,
    pub new_log_popup: Option<NewLogPopup>,
    pub confirm_popup: Option<ConfirmPopup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripField {
    Pickup,
    Dropoff,
    Current,
    CycleUsed,
}

#[derive(Clone, Debug)]
pub struct NewTripPopup {
    pub pickup: String,
    pub dropoff: String,
    pub current: String,
    pub cycle_used: String,
    pub field: TripField,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogField {
    Status,
    Remarks,
    Address,
}

#[derive(Clone, Debug)]
pub struct NewLogPopup {
    pub status_index: usize,
    pub remarks: String,
    pub address: String,
    pub field: LogField,
}

#[derive(Clone, Debug)]
pub struct ConfirmPopup {
    pub message: String,
    pub trip_id: TripId,
}

impl NewLogPopup {
    fn select_prev(&mut self) {
        if self.status_index == 0 {
            self.status_index = DutyStatus::ALL.len() - 1;
        } else {
            self.status_index -= 1;
        }
    }

    fn select_next(&mut self) {
        self.status_index = (self.status_index + 1) % DutyStatus::ALL.len();
    }
}

impl App {
    pub fn new(db: Connection) -> Self {
        let trips = match db::query_trip(TripQuery::All, &db) {
            Ok(trips) => trips,
            Err(_) => Vec::new(),
        };
        Self {
            running: true,
            db,
            view: AppView::Dashboard,
            view_history: Vec::new(),
            trips,
            status: None,
            selected_trip_index: 0,
            selected_trip: None,
            focus_mode: FocusMode::Content,
            selected_tab_index: 0,
            new_trip_popup: None,
            new_log_popup: None,
            confirm_popup: None,
        }
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {}
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.new_trip_popup.is_some() {
            self.handle_new_trip_key(key);
            return;
        }
        if self.new_log_popup.is_some() {
            self.handle_new_log_key(key);
            return;
        }
        if self.confirm_popup.is_some() {
            self.handle_confirm_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('h') => self.navigate_to(AppView::Dashboard),
            KeyCode::Char('t') => {
                self.navigate_to(AppView::Trips);
                self.selected_trip = None;
            }
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.go_back();
                } else {
                    self.navigate_to(AppView::Help);
                }
            }
            KeyCode::Tab => {
                if self.focus_mode == FocusMode::TabBar {
                    self.focus_mode = FocusMode::Content;
                } else {
                    self.focus_mode = FocusMode::TabBar;
                }
            }
            KeyCode::Char('r') => self.load_content_for_view(),
            KeyCode::Left => {
                if self.focus_mode == FocusMode::TabBar {
                    self.navigate_tab_left();
                }
            }
            KeyCode::Right => {
                if self.focus_mode == FocusMode::TabBar {
                    self.navigate_tab_right();
                }
            }
            KeyCode::Up => {
                if self.focus_mode == FocusMode::Content {
                    self.move_selection_up();
                }
            }
            KeyCode::Down => {
                if self.focus_mode == FocusMode::Content {
                    self.move_selection_down();
                }
            }
            KeyCode::Enter => {
                if self.focus_mode == FocusMode::TabBar {
                    self.activate_selected_tab();
                } else {
                    self.open_selected_trip();
                }
            }
            KeyCode::Char('l') => self.open_duty_chart(),
            KeyCode::Char('n') => match self.view {
                AppView::Trips | AppView::Dashboard => self.open_new_trip_popup(),
                AppView::TripDetail => self.open_new_log_popup(),
                _ => {}
            },
            KeyCode::Char('d') => self.open_confirm_delete(),
            KeyCode::Char('x') => self.export_selected_trip(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if self.view != view {
            self.view_history.push(self.view);
            self.view = view;
            self.load_content_for_view();
            if let Some(index) = TABS.iter().position(|(_, v)| {
                *v == self.view
                    || (matches!(self.view, AppView::TripDetail | AppView::DutyChart)
                        && *v == AppView::Trips)
            }) {
                self.selected_tab_index = index;
            }
        }
    }

    fn load_content_for_view(&mut self) {
        match self.view {
            AppView::Dashboard | AppView::Trips => self.load_trips(),
            AppView::TripDetail | AppView::DutyChart => self.refresh_trip_detail(),
            AppView::Help => {}
        }
    }

    fn navigate_tab_left(&mut self) {
        if self.selected_tab_index == 0 {
            self.selected_tab_index = TABS.len() - 1;
        } else {
            self.selected_tab_index -= 1;
        }
    }

    fn navigate_tab_right(&mut self) {
        self.selected_tab_index = (self.selected_tab_index + 1) % TABS.len();
    }

    fn activate_selected_tab(&mut self) {
        let (_, target_view) = TABS[self.selected_tab_index];
        self.navigate_to(target_view);
        self.focus_mode = FocusMode::Content;
    }

    fn go_back(&mut self) {
        if let Some(prev_view) = self.view_history.pop() {
            //Assign the new view manually (cyclic loop when using navigate_to)
            self.view = prev_view;
            self.load_content_for_view();
        }
        self.clear_status();
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn load_trips(&mut self) {
        match db::query_trip(TripQuery::All, &self.db) {
            Ok(trips) => {
                self.trips = trips;
                self.clear_status();
                if self.selected_trip_index >= self.trips.len() {
                    self.selected_trip_index = self.trips.len().saturating_sub(1);
                }
            }
            Err(err) => {
                self.status = Some(format!("Failed to load trips: {err}"));
            }
        }
    }

    fn refresh_trip_detail(&mut self) {
        let Some(trip) = &self.selected_trip else {
            return;
        };
        let Some(id) = trip.id else {
            return;
        };
        match db::query_trip_by_id(id, &self.db) {
            Ok(Some(updated)) => {
                self.selected_trip = Some(updated);
                self.status = None;
            }
            Ok(None) => {
                self.status = Some("Trip not found.".to_string());
            }
            Err(err) => {
                self.status = Some(format!("Failed to refresh trip: {err}"));
            }
        }
    }

    fn move_selection_up(&mut self) {
        if !matches!(self.view, AppView::Trips | AppView::Dashboard) || self.trips.is_empty() {
            return;
        }
        if self.selected_trip_index == 0 {
            self.selected_trip_index = self.trips.len() - 1;
        } else {
            self.selected_trip_index -= 1;
        }
    }

    fn move_selection_down(&mut self) {
        if !matches!(self.view, AppView::Trips | AppView::Dashboard) || self.trips.is_empty() {
            return;
        }
        self.selected_trip_index = (self.selected_trip_index + 1) % self.trips.len();
    }

    fn open_selected_trip(&mut self) {
        if self.view != AppView::Trips || self.trips.is_empty() {
            return;
        }
        let trip = self.trips[self.selected_trip_index].clone();
        self.selected_trip = Some(trip);
        self.navigate_to(AppView::TripDetail);
    }

    fn open_duty_chart(&mut self) {
        match self.view {
            AppView::TripDetail => {
                self.navigate_to(AppView::DutyChart);
            }
            AppView::Trips => {
                if self.trips.is_empty() {
                    return;
                }
                let trip = self.trips[self.selected_trip_index].clone();
                self.selected_trip = Some(trip);
                self.navigate_to(AppView::DutyChart);
            }
            _ => {}
        }
    }

    pub fn current_trip(&self) -> Option<&Trip> {
        match self.view {
            AppView::Trips | AppView::Dashboard => self.trips.get(self.selected_trip_index),
            AppView::TripDetail | AppView::DutyChart => self.selected_trip.as_ref(),
            _ => None,
        }
    }

    fn open_new_trip_popup(&mut self) {
        self.new_trip_popup = Some(NewTripPopup {
            pickup: String::new(),
            dropoff: String::new(),
            current: String::new(),
            cycle_used: String::new(),
            field: TripField::Pickup,
        });
    }

    fn open_new_log_popup(&mut self) {
        if self.selected_trip.is_none() {
            self.status = Some("No trip selected.".to_string());
            return;
        }
        self.new_log_popup = Some(NewLogPopup {
            status_index: 0,
            remarks: String::new(),
            address: String::new(),
            field: LogField::Status,
        });
    }

    fn open_confirm_delete(&mut self) {
        let trip = match self.view {
            AppView::Trips => self.trips.get(self.selected_trip_index),
            AppView::TripDetail => self.selected_trip.as_ref(),
            _ => None,
        };
        let Some(trip) = trip else {
            return;
        };
        let Some(id) = trip.id else {
            return;
        };
        self.confirm_popup = Some(ConfirmPopup {
            message: format!(
                "Delete trip {} ({} -> {}) and all its logs?",
                id, trip.pickup_location.address, trip.dropoff_location.address
            ),
            trip_id: id,
        });
    }

    fn handle_new_trip_key(&mut self, key: KeyCode) {
        let Some(popup) = self.new_trip_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.new_trip_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => self.apply_new_trip_popup(),
            KeyCode::Tab => {
                popup.field = match popup.field {
                    TripField::Pickup => TripField::Dropoff,
                    TripField::Dropoff => TripField::Current,
                    TripField::Current => TripField::CycleUsed,
                    TripField::CycleUsed => TripField::Pickup,
                };
            }
            KeyCode::Backspace | KeyCode::Delete => match popup.field {
                TripField::Pickup => {
                    popup.pickup.pop();
                }
                TripField::Dropoff => {
                    popup.dropoff.pop();
                }
                TripField::Current => {
                    popup.current.pop();
                }
                TripField::CycleUsed => {
                    popup.cycle_used.pop();
                }
            },
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                match popup.field {
                    TripField::Pickup => popup.pickup.push(ch),
                    TripField::Dropoff => popup.dropoff.push(ch),
                    TripField::Current => popup.current.push(ch),
                    TripField::CycleUsed => {
                        if ch.is_ascii_digit() || ch == '.' {
                            popup.cycle_used.push(ch);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn apply_new_trip_popup(&mut self) {
        let Some(popup) = self.new_trip_popup.take() else {
            return;
        };

        let pickup = popup.pickup.trim().to_string();
        let dropoff = popup.dropoff.trim().to_string();
        if pickup.is_empty() || dropoff.is_empty() {
            self.status = Some("Pickup and dropoff are required.".to_string());
            self.new_trip_popup = Some(popup);
            return;
        }

        let cycle_used = if popup.cycle_used.trim().is_empty() {
            0.0
        } else {
            match popup.cycle_used.trim().parse::<f64>() {
                Ok(value) if value >= 0.0 => value,
                _ => {
                    self.status = Some("Cycle used must be a non-negative number.".to_string());
                    self.new_trip_popup = Some(popup);
                    return;
                }
            }
        };

        let now = Utc::now();
        let trip = Trip {
            id: None,
            current_location: Location::at_address(popup.current.trim()),
            pickup_location: Location::at_address(pickup),
            dropoff_location: Location::at_address(dropoff),
            current_cycle_used: cycle_used,
            created_at: now,
            updated_at: now,
            logs: Vec::new(),
        };

        match db::create_trip(trip, &self.db) {
            Ok(id) => {
                self.status = Some("Trip created.".to_string());
                self.load_trips();
                if let Some(index) = self.trips.iter().position(|t| t.id == Some(id)) {
                    self.selected_trip_index = index;
                }
            }
            Err(err) => {
                self.status = Some(format!("Failed to create trip: {err}"));
            }
        }
    }

    fn handle_new_log_key(&mut self, key: KeyCode) {
        let Some(popup) = self.new_log_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.new_log_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => self.apply_new_log_popup(),
            KeyCode::Tab => {
                popup.field = match popup.field {
                    LogField::Status => LogField::Remarks,
                    LogField::Remarks => LogField::Address,
                    LogField::Address => LogField::Status,
                };
            }
            KeyCode::Up => {
                if popup.field == LogField::Status {
                    popup.select_prev();
                }
            }
            KeyCode::Down => {
                if popup.field == LogField::Status {
                    popup.select_next();
                }
            }
            KeyCode::Backspace | KeyCode::Delete => match popup.field {
                LogField::Remarks => {
                    popup.remarks.pop();
                }
                LogField::Address => {
                    popup.address.pop();
                }
                LogField::Status => {}
            },
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                match popup.field {
                    LogField::Remarks => popup.remarks.push(ch),
                    LogField::Address => popup.address.push(ch),
                    LogField::Status => {}
                }
            }
            _ => {}
        }
    }

    fn apply_new_log_popup(&mut self) {
        let Some(popup) = self.new_log_popup.take() else {
            return;
        };
        let Some(trip) = self.selected_trip.clone() else {
            self.status = Some("No trip selected.".to_string());
            return;
        };

        let remarks = popup.remarks.trim().to_string();
        if remarks.is_empty() {
            self.status = Some("Remarks are required.".to_string());
            self.new_log_popup = Some(popup);
            return;
        }

        let status = DutyStatus::ALL[popup.status_index % DutyStatus::ALL.len()];
        let location = Location::at_address(popup.address.trim());
        match db::append_log(&trip, status, Utc::now(), location, remarks, &self.db) {
            Ok(_) => {
                self.status = Some("Log entry added.".to_string());
                self.refresh_trip_detail();
            }
            Err(err) => {
                self.status = Some(format!("Failed to add log entry: {err}"));
                self.new_log_popup = Some(popup);
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyCode) {
        let Some(popup) = self.confirm_popup.take() else {
            return;
        };
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(err) = db::delete_trip(popup.trip_id, &self.db) {
                    self.status = Some(format!("Failed to delete trip: {err}"));
                    return;
                }
                self.status = Some("Trip deleted.".to_string());
                if self.view != AppView::Trips {
                    self.selected_trip = None;
                    self.view_history.clear();
                    self.view = AppView::Trips;
                }
                self.load_trips();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.clear_status();
            }
            _ => {
                self.confirm_popup = Some(popup);
            }
        }
    }

    fn export_selected_trip(&mut self) {
        if !matches!(self.view, AppView::TripDetail | AppView::DutyChart) {
            return;
        }
        let Some(trip) = &self.selected_trip else {
            self.status = Some("No trip selected.".to_string());
            return;
        };
        let Some(id) = trip.id else {
            return;
        };

        let drawing = grid::render(&trip.logs, grid::DEFAULT_WIDTH, grid::DEFAULT_HEIGHT);
        let path = format!("trip_{id}_log.svg");
        match std::fs::write(&path, drawing.to_svg()) {
            Ok(()) => {
                self.status = Some(format!("Exported {path}"));
            }
            Err(err) => {
                self.status = Some(format!("Failed to export grid: {err}"));
            }
        }
    }
}
