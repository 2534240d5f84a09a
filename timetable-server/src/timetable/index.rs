//! The timetable index.
//!
//! An index is built once from a set of sources and never mutated after
//! that. It keeps two views of the same legs:
//!
//! - legs grouped per [`ScheduleKey`], in source row order;
//! - for each `(key, origin, destination)`, the time pairs of every leg
//!   between those stations, sorted by departure.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::error::IndexError;
use crate::domain::{Leg, ScheduleKey, StationName, TimePair};
use crate::ingest::{SourceError, SourceFile, discover_sources, ingest_source};
use crate::tabular::TabularReader;

/// Lookup key for the pair view.
type PairKey = (ScheduleKey, StationName, StationName);

/// All legs of one schedule variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Stations in order of first appearance.
    stations: Vec<StationName>,
    /// Legs in source row order.
    legs: Vec<Leg>,
}

impl Schedule {
    pub fn stations(&self) -> &[StationName] {
        &self.stations
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    fn push(&mut self, leg: Leg) {
        for station in [&leg.origin, &leg.destination] {
            if !self.stations.contains(station) {
                self.stations.push(station.clone());
            }
        }
        self.legs.push(leg);
    }
}

/// A source that contributed no legs, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: String,
    pub error: SourceError,
}

/// The built, queryable collection of all normalized legs.
#[derive(Debug, Clone)]
pub struct TimetableIndex {
    schedules: BTreeMap<ScheduleKey, Schedule>,
    pairs: HashMap<PairKey, Vec<TimePair>>,
    built_at: DateTime<Utc>,
    processed: Vec<String>,
    failures: Vec<SourceFailure>,
}

impl TimetableIndex {
    /// Build an index from legs that are already normalized.
    ///
    /// Leg order within each schedule is preserved.
    pub fn from_legs(legs: impl IntoIterator<Item = Leg>, built_at: DateTime<Utc>) -> Self {
        let mut schedules: BTreeMap<ScheduleKey, Schedule> = BTreeMap::new();
        let mut pairs: HashMap<PairKey, Vec<TimePair>> = HashMap::new();

        for leg in legs {
            pairs
                .entry((leg.key(), leg.origin.clone(), leg.destination.clone()))
                .or_default()
                .push(leg.times());
            schedules.entry(leg.key()).or_default().push(leg);
        }

        for times in pairs.values_mut() {
            times.sort();
        }

        Self {
            schedules,
            pairs,
            built_at,
            processed: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Build an index from source files.
    ///
    /// Sources are processed in identifier order. A source that cannot be
    /// read or classified is recorded as a failure and skipped; it never
    /// stops the others from being indexed.
    pub fn build(sources: &[SourceFile], reader: &dyn TabularReader) -> Self {
        let mut ordered: Vec<&SourceFile> = sources.iter().collect();
        ordered.sort();

        let mut legs = Vec::new();
        let mut processed = Vec::new();
        let mut failures = Vec::new();

        for source in ordered {
            match ingest_source(source, reader) {
                Ok(source_legs) => {
                    debug!(source = %source.id, legs = source_legs.len(), "ingested source");
                    processed.push(source.id.clone());
                    legs.extend(source_legs);
                }
                Err(error) => {
                    warn!(source = %source.id, %error, "skipping source");
                    failures.push(SourceFailure {
                        source: source.id.clone(),
                        error,
                    });
                }
            }
        }

        let mut index = Self::from_legs(legs, Utc::now());
        index.processed = processed;
        index.failures = failures;

        info!(
            schedules = index.schedule_count(),
            legs = index.leg_count(),
            failures = index.failures.len(),
            "timetable index built"
        );
        index
    }

    /// Discover the sources in `dir` and build from them.
    pub fn build_from_dir(dir: &Path, reader: &dyn TabularReader) -> Result<Self, IndexError> {
        let sources = discover_sources(dir).map_err(|e| IndexError::Discovery {
            dir: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::build(&sources, reader))
    }

    /// The distinct schedule keys, in key order.
    pub fn schedule_keys(&self) -> impl Iterator<Item = &ScheduleKey> {
        self.schedules.keys()
    }

    /// All schedules, in key order.
    pub fn schedules(&self) -> impl Iterator<Item = (&ScheduleKey, &Schedule)> {
        self.schedules.iter()
    }

    pub fn schedule(&self, key: &ScheduleKey) -> Option<&Schedule> {
        self.schedules.get(key)
    }

    /// Sorted time pairs for legs from `origin` to `destination`.
    ///
    /// Empty when no such leg exists.
    pub fn pair_times(
        &self,
        key: &ScheduleKey,
        origin: &StationName,
        destination: &StationName,
    ) -> &[TimePair] {
        // The tuple key owns its names; build one for the lookup.
        self.pairs
            .get(&(*key, origin.clone(), destination.clone()))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct stations of the schedules accepted by `include`, sorted.
    pub fn stations(&self, include: impl Fn(&ScheduleKey) -> bool) -> Vec<StationName> {
        self.schedules
            .iter()
            .filter(|(key, _)| include(key))
            .flat_map(|(_, schedule)| schedule.stations.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn schedule_count(&self) -> usize {
        self.schedules.len()
    }

    pub fn leg_count(&self) -> usize {
        self.schedules.values().map(|s| s.legs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Identifiers of the sources that were indexed.
    pub fn processed(&self) -> &[String] {
        &self.processed
    }

    /// Sources that were skipped.
    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayGroup, Direction, TimeOfDay, Transport};
    use crate::tabular::{DelimitedReader, ReadError, SourceReader};
    use std::fs;
    use tempfile::tempdir;

    fn metro_weekday_out() -> ScheduleKey {
        ScheduleKey::new(Transport::Metro, DayGroup::Weekday, Direction::Outbound)
    }

    fn leg(key: ScheduleKey, origin: &str, dep: &str, dest: &str, arr: &str) -> Leg {
        Leg::new(
            key,
            StationName::new(origin),
            TimeOfDay::parse(dep),
            StationName::new(dest),
            TimeOfDay::parse(arr),
        )
    }

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn groups_by_key_preserving_order() {
        let key = metro_weekday_out();
        let other = ScheduleKey::new(Transport::Train, DayGroup::Weekday, Direction::Return);
        let index = TimetableIndex::from_legs(
            vec![
                leg(key, "Central", "08:30", "Plaza", "08:40"),
                leg(other, "X", "07:00", "Y", "07:10"),
                leg(key, "Central", "08:00", "Plaza", "08:10"),
            ],
            at(),
        );

        assert_eq!(index.schedule_count(), 2);
        assert_eq!(index.leg_count(), 3);

        let schedule = index.schedule(&key).unwrap();
        let deps: Vec<_> = schedule
            .legs()
            .iter()
            .map(|l| l.departure_time.to_string())
            .collect();
        assert_eq!(deps, vec!["08:30", "08:00"]);
        assert_eq!(
            schedule.stations(),
            &[StationName::new("Central"), StationName::new("Plaza")]
        );
    }

    #[test]
    fn pair_times_are_sorted() {
        let key = metro_weekday_out();
        let index = TimetableIndex::from_legs(
            vec![
                leg(key, "Central", "08:30", "Plaza", "08:40"),
                leg(key, "Central", "08:00", "Plaza", "08:10"),
            ],
            at(),
        );

        let times = index.pair_times(&key, &StationName::new("Central"), &StationName::new("Plaza"));
        assert_eq!(
            times,
            &[
                TimePair::new(TimeOfDay::parse("08:00"), TimeOfDay::parse("08:10")),
                TimePair::new(TimeOfDay::parse("08:30"), TimeOfDay::parse("08:40")),
            ]
        );

        // Direction matters
        assert!(
            index
                .pair_times(&key, &StationName::new("Plaza"), &StationName::new("Central"))
                .is_empty()
        );
    }

    #[test]
    fn stations_are_distinct_and_sorted() {
        let key = metro_weekday_out();
        let other = ScheduleKey::new(Transport::Train, DayGroup::Weekday, Direction::Return);
        let index = TimetableIndex::from_legs(
            vec![
                leg(key, "Plaza", "08:00", "Central", "08:10"),
                leg(other, "Central", "07:00", "Anden", "07:10"),
            ],
            at(),
        );

        let all: Vec<_> = index.stations(|_| true).into_iter().map(String::from).collect();
        assert_eq!(all, vec!["Anden", "Central", "Plaza"]);

        let metro: Vec<_> = index
            .stations(|k| k.transport == Transport::Metro)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(metro, vec!["Central", "Plaza"]);
    }

    fn write_sources(dir: &Path) {
        fs::write(
            dir.join("TREN LUNES A VIERNES IDA.csv"),
            "Tren,Central,Plaza,Calle Sol\n101,08:00,08:05,08:12\n103,08:30,,08:42\n",
        )
        .unwrap();
        fs::write(
            dir.join("METRO SABADO VUELTA.csv"),
            "Estacion salida;Hora salida;Estacion llegada;Hora llegada\nPlaza;0,375;Central;0,3819444\n",
        )
        .unwrap();
    }

    #[test]
    fn builds_from_directory() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());

        let index = TimetableIndex::build_from_dir(dir.path(), &DelimitedReader::new()).unwrap();
        assert!(index.failures().is_empty());
        assert_eq!(
            index.processed(),
            &["METRO SABADO VUELTA.csv".to_string(), "TREN LUNES A VIERNES IDA.csv".to_string()]
        );

        let keys: Vec<_> = index.schedule_keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["train_weekday_outbound", "metro_saturday_return"]);

        let train = "train_weekday_outbound".parse().unwrap();
        assert_eq!(index.schedule(&train).unwrap().legs().len(), 2);

        let metro = "metro_saturday_return".parse().unwrap();
        let times = index.pair_times(&metro, &StationName::new("Plaza"), &StationName::new("Central"));
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].departure_time.to_string(), "09:00");
        assert_eq!(times[0].arrival_time.to_string(), "09:10");
    }

    #[test]
    fn bad_sources_do_not_abort_the_build() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        fs::write(dir.path().join("TREN SABADO DOMINGO IDA.xls"), [0xD0, 0xCF]).unwrap();
        fs::write(dir.path().join("avisos.csv"), "Servicio sujeto a cambios\n").unwrap();

        let index = TimetableIndex::build_from_dir(dir.path(), &DelimitedReader::new()).unwrap();
        assert_eq!(index.leg_count(), 3);
        assert_eq!(index.processed().len(), 2);

        let failed: Vec<_> = index.failures().iter().map(|f| f.source.as_str()).collect();
        assert_eq!(failed, vec!["TREN SABADO DOMINGO IDA.xls", "avisos.csv"]);
        assert_eq!(
            index.failures()[0].error,
            SourceError::Unreadable(ReadError::UnsupportedFormat {
                extension: "xls".into()
            })
        );
        assert!(matches!(
            index.failures()[1].error,
            SourceError::LayoutUnrecognized { .. }
        ));
    }

    #[test]
    fn workbooks_and_text_exports_build_together() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/METRO SABADO IDA.xlsx");
        fs::copy(&fixture, dir.path().join("METRO SABADO IDA.xlsx")).unwrap();

        let index = TimetableIndex::build_from_dir(dir.path(), &SourceReader::new()).unwrap();
        assert!(index.failures().is_empty());
        assert_eq!(index.processed().len(), 3);

        let metro = "metro_saturday_outbound".parse().unwrap();
        let times = index.pair_times(&metro, &StationName::new("Central"), &StationName::new("Plaza"));
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].departure_time.to_string(), "07:30");
        assert_eq!(times[0].arrival_time.to_string(), "08:15");

        let times = index.pair_times(&metro, &StationName::new("Plaza"), &StationName::new("Central"));
        assert_eq!(times[0].departure_time.to_string(), "12:00");
        assert_eq!(times[0].arrival_time.to_string(), "12:45");
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let reader = DelimitedReader::new();

        let a = TimetableIndex::build_from_dir(dir.path(), &reader).unwrap();
        let b = TimetableIndex::build_from_dir(dir.path(), &reader).unwrap();

        let a_schedules: Vec<_> = a.schedules().collect();
        let b_schedules: Vec<_> = b.schedules().collect();
        assert_eq!(a_schedules, b_schedules);
    }

    #[test]
    fn source_order_does_not_depend_on_input_order() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let reader = DelimitedReader::new();

        let mut sources = discover_sources(dir.path()).unwrap();
        let forward = TimetableIndex::build(&sources, &reader);
        sources.reverse();
        let backward = TimetableIndex::build(&sources, &reader);

        assert_eq!(forward.processed(), backward.processed());
        assert_eq!(
            forward.schedules().collect::<Vec<_>>(),
            backward.schedules().collect::<Vec<_>>()
        );
    }

    #[test]
    fn missing_directory_is_discovery_error() {
        let err = TimetableIndex::build_from_dir(Path::new("/nonexistent/data"), &DelimitedReader::new())
            .unwrap_err();
        assert!(matches!(err, IndexError::Discovery { .. }));
    }
}
