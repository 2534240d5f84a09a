//! Legs: the atomic timetable fact.

use serde::{Deserialize, Serialize};

use super::{DayGroup, Direction, ScheduleKey, StationName, TimeOfDay, Transport};

/// One directional, timed hop between two stations of a schedule variant.
///
/// A leg always carries both a departure and an arrival time; sources that
/// only provide one of them produce no leg at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    pub transport: Transport,
    pub day_group: DayGroup,
    pub direction: Direction,
    pub origin: StationName,
    pub departure_time: TimeOfDay,
    pub destination: StationName,
    pub arrival_time: TimeOfDay,
}

impl Leg {
    /// Create a leg belonging to the given schedule variant.
    pub fn new(
        key: ScheduleKey,
        origin: StationName,
        departure_time: TimeOfDay,
        destination: StationName,
        arrival_time: TimeOfDay,
    ) -> Self {
        Self {
            transport: key.transport,
            day_group: key.day_group,
            direction: key.direction,
            origin,
            departure_time,
            destination,
            arrival_time,
        }
    }

    /// The schedule variant this leg belongs to.
    pub fn key(&self) -> ScheduleKey {
        ScheduleKey::new(self.transport, self.day_group, self.direction)
    }

    /// The departure/arrival pair of this leg.
    pub fn times(&self) -> TimePair {
        TimePair {
            departure_time: self.departure_time.clone(),
            arrival_time: self.arrival_time.clone(),
        }
    }

    /// Returns true if `station` is either endpoint of this leg.
    pub fn touches(&self, station: &StationName) -> bool {
        &self.origin == station || &self.destination == station
    }
}

/// A departure time paired with the matching arrival time.
///
/// Orders by departure first, then arrival.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimePair {
    pub departure_time: TimeOfDay,
    pub arrival_time: TimeOfDay,
}

impl TimePair {
    pub fn new(departure_time: TimeOfDay, arrival_time: TimeOfDay) -> Self {
        Self {
            departure_time,
            arrival_time,
        }
    }
}
