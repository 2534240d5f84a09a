//! Disk persistence for the timetable index.
//!
//! The persisted file is a cache: it lets a restarted server answer queries
//! before the first build from sources finishes, and is always rebuilt from
//! the sources.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CacheError;
use super::index::TimetableIndex;
use crate::domain::{Leg, ScheduleKey, StationName, TimeOfDay};

/// Persisted index with metadata.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    /// Unix timestamp when the cache was written.
    cached_at_secs: u64,
    /// When the index was built, RFC 3339.
    built_at: String,
    schedules: BTreeMap<ScheduleKey, PersistedSchedule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSchedule {
    stations: Vec<StationName>,
    legs: Vec<PersistedLeg>,
}

/// A leg without its key, which is the enclosing map key.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedLeg {
    origin: StationName,
    departure_time: TimeOfDay,
    destination: StationName,
    arrival_time: TimeOfDay,
}

/// Disk cache for a built index.
#[derive(Debug, Clone)]
pub struct IndexCache {
    path: PathBuf,
}

impl IndexCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Try to load an index from the cache.
    ///
    /// Returns `None` if the cache doesn't exist or can't be parsed.
    pub fn load(&self) -> Option<TimetableIndex> {
        match self.try_load() {
            Ok(index) => Some(index),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no usable index cache");
                None
            }
        }
    }

    fn try_load(&self) -> Result<TimetableIndex, CacheError> {
        let contents = std::fs::read_to_string(&self.path)?;
        let persisted: PersistedIndex = serde_json::from_str(&contents)?;

        let built_at = DateTime::parse_from_rfc3339(&persisted.built_at)
            .map_err(|e| CacheError::Invalid {
                message: format!("bad built_at: {e}"),
            })?
            .with_timezone(&Utc);

        let legs = persisted
            .schedules
            .into_iter()
            .flat_map(|(key, schedule)| {
                schedule.legs.into_iter().map(move |leg| {
                    Leg::new(
                        key,
                        leg.origin,
                        leg.departure_time,
                        leg.destination,
                        leg.arrival_time,
                    )
                })
            });

        Ok(TimetableIndex::from_legs(legs, built_at))
    }

    /// Save an index to the cache.
    ///
    /// Creates parent directories if they don't exist. The file is written
    /// under a temporary name and renamed into place.
    pub fn save(&self, index: &TimetableIndex) -> Result<(), CacheError> {
        let cached_at_secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| CacheError::Invalid {
                message: "system time before unix epoch".to_string(),
            })?
            .as_secs();

        let schedules = index
            .schedules()
            .map(|(key, schedule)| {
                let legs = schedule
                    .legs()
                    .iter()
                    .map(|leg| PersistedLeg {
                        origin: leg.origin.clone(),
                        departure_time: leg.departure_time.clone(),
                        destination: leg.destination.clone(),
                        arrival_time: leg.arrival_time.clone(),
                    })
                    .collect();
                let persisted = PersistedSchedule {
                    stations: schedule.stations().to_vec(),
                    legs,
                };
                (*key, persisted)
            })
            .collect();

        let persisted = PersistedIndex {
            cached_at_secs,
            built_at: index.built_at().to_rfc3339(),
            schedules,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&persisted)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
