//! Domain types for the timetable engine.
//!
//! This module contains the canonical timetable model that both spreadsheet
//! layouts are normalized into. Normalizing types (`StationName`,
//! `TimeOfDay`) apply their rules at construction time, so code that
//! receives them can compare and sort them directly.

mod leg;
mod schedule;
mod station;
mod time;

pub use leg::{Leg, TimePair};
pub use schedule::{DayGroup, Direction, InvalidScheduleKey, ScheduleKey, Transport};
pub use station::StationName;
pub use time::{MINUTES_PER_DAY, TimeOfDay, parse_clock};
