mod state;

use crossterm::event::KeyCode;

pub use state::{App, ConfirmPopup, LogField, NewLogPopup, NewTripPopup, TripField};

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Dashboard,
    Trips,
    TripDetail,
    DutyChart,
    Help,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusMode {
    TabBar,
    Content,
}

/// Views reachable from the tab bar; detail views are entered from content.
pub const TABS: [(&str, AppView); 2] = [
    ("Home", AppView::Dashboard),
    ("Trips", AppView::Trips),
];
