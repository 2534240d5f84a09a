//! Application state for the web layer.

use crate::timetable::Timetable;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The swappable timetable index
    pub timetable: Timetable,
}

impl AppState {
    pub fn new(timetable: Timetable) -> Self {
        Self { timetable }
    }
}
