//! Query resolution against a built index.
//!
//! Three shapes of answer, chosen by which station fields are set:
//!
//! - both `origin` and `destination`: the sorted departure/arrival pairs of
//!   every leg between them, per matching schedule;
//! - only `station`, `origin` or `destination`: the times at which that
//!   station is a leg endpoint, per matching schedule;
//! - no station fields: the full leg list of every matching schedule.
//!
//! Filter values that match nothing give an empty result, never an error.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::index::TimetableIndex;
use crate::domain::{
    DayGroup, Direction, Leg, ScheduleKey, StationName, TimeOfDay, TimePair, Transport,
};

/// Optional constraints for a query; absent or blank fields do not constrain.
///
/// `transport`, `day_group` and `direction` must equal a canonical name
/// (`metro`, `saturday_sunday`, `return`, ...) or its Spanish token (`tren`,
/// `lunes_a_viernes`, `vuelta`, ...) exactly. Spanish parameter names
/// (`tipo`, `dias`, `origen`, ...) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleFilter {
    #[serde(default, alias = "tipo")]
    pub transport: Option<String>,
    #[serde(default, alias = "dias")]
    pub day_group: Option<String>,
    #[serde(default, alias = "direccion")]
    pub direction: Option<String>,
    #[serde(default, alias = "estacion")]
    pub station: Option<String>,
    #[serde(default, alias = "origen")]
    pub origin: Option<String>,
    #[serde(default, alias = "destino")]
    pub destination: Option<String>,
}

impl ScheduleFilter {
    /// Returns true if the key satisfies every key constraint.
    pub fn matches_key(&self, key: &ScheduleKey) -> bool {
        matches_field(&self.transport, Transport::from_name, key.transport)
            && matches_field(&self.day_group, DayGroup::from_name, key.day_group)
            && matches_field(&self.direction, Direction::from_name, key.direction)
    }

    fn station(&self) -> Option<StationName> {
        station_field(&self.station)
    }

    fn origin(&self) -> Option<StationName> {
        station_field(&self.origin)
    }

    fn destination(&self) -> Option<StationName> {
        station_field(&self.destination)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn matches_field<T: PartialEq>(
    field: &Option<String>,
    lookup: fn(&str) -> Option<T>,
    value: T,
) -> bool {
    present(field).is_none_or(|wanted| lookup(wanted) == Some(value))
}

fn station_field(field: &Option<String>) -> Option<StationName> {
    present(field).map(StationName::new)
}

/// Legs of one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleLegs {
    pub schedule: ScheduleKey,
    pub legs: Vec<Leg>,
}

/// Times at which a station is a leg endpoint in one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationTimes {
    pub schedule: ScheduleKey,
    pub station: StationName,
    pub times: Vec<TimeOfDay>,
}

/// Departure/arrival pairs between two stations in one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairTimes {
    pub schedule: ScheduleKey,
    pub origin: StationName,
    pub destination: StationName,
    pub times: Vec<TimePair>,
}

/// Result of [`TimetableIndex::query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "results", rename_all = "snake_case")]
pub enum QueryResult {
    Schedules(Vec<ScheduleLegs>),
    Station(Vec<StationTimes>),
    Pair(Vec<PairTimes>),
}

impl QueryResult {
    /// Number of schedule groups in the result.
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Schedules(v) => v.len(),
            QueryResult::Station(v) => v.len(),
            QueryResult::Pair(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TimetableIndex {
    /// The distinct schedule keys present.
    pub fn list_schedules(&self) -> Vec<ScheduleKey> {
        self.schedule_keys().copied().collect()
    }

    /// Answer a filtered query.
    pub fn query(&self, filter: &ScheduleFilter) -> QueryResult {
        let keys: Vec<&ScheduleKey> = self
            .schedule_keys()
            .filter(|key| filter.matches_key(key))
            .collect();

        match (filter.origin(), filter.destination()) {
            (Some(origin), Some(destination)) => {
                QueryResult::Pair(self.pair_query(&keys, origin, destination))
            }
            (origin, destination) => {
                let station = filter.station();
                if station.is_none() && origin.is_none() && destination.is_none() {
                    QueryResult::Schedules(self.schedule_query(&keys))
                } else {
                    QueryResult::Station(self.station_query(&keys, station, origin, destination))
                }
            }
        }
    }

    fn schedule_query(&self, keys: &[&ScheduleKey]) -> Vec<ScheduleLegs> {
        keys.iter()
            .filter_map(|key| {
                let schedule = self.schedule(key)?;
                Some(ScheduleLegs {
                    schedule: **key,
                    legs: schedule.legs().to_vec(),
                })
            })
            .collect()
    }

    fn pair_query(
        &self,
        keys: &[&ScheduleKey],
        origin: StationName,
        destination: StationName,
    ) -> Vec<PairTimes> {
        keys.iter()
            .filter_map(|key| {
                let times = self.pair_times(key, &origin, &destination);
                if times.is_empty() {
                    return None;
                }
                Some(PairTimes {
                    schedule: **key,
                    origin: origin.clone(),
                    destination: destination.clone(),
                    times: times.to_vec(),
                })
            })
            .collect()
    }

    /// `station` matches either endpoint, `origin` only leg origins and
    /// `destination` only leg destinations. A station contributes its
    /// departure time as an origin and its arrival time as a destination.
    fn station_query(
        &self,
        keys: &[&ScheduleKey],
        station: Option<StationName>,
        origin: Option<StationName>,
        destination: Option<StationName>,
    ) -> Vec<StationTimes> {
        // Label the result with the most specific name given.
        let Some(label) = station
            .clone()
            .or_else(|| origin.clone())
            .or_else(|| destination.clone())
        else {
            return Vec::new();
        };

        let departs_from = |leg: &Leg| {
            station.as_ref() == Some(&leg.origin) || origin.as_ref() == Some(&leg.origin)
        };
        let arrives_at = |leg: &Leg| {
            station.as_ref() == Some(&leg.destination)
                || destination.as_ref() == Some(&leg.destination)
        };

        keys.iter()
            .filter_map(|key| {
                let schedule = self.schedule(key)?;
                let mut times = BTreeSet::new();
                for leg in schedule.legs() {
                    if departs_from(leg) {
                        times.insert(leg.departure_time.clone());
                    }
                    if arrives_at(leg) {
                        times.insert(leg.arrival_time.clone());
                    }
                }
                if times.is_empty() {
                    return None;
                }
                Some(StationTimes {
                    schedule: **key,
                    station: label.clone(),
                    times: times.into_iter().collect(),
                })
            })
            .collect()
    }
}
