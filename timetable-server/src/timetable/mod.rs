//! The timetable index and its query side.
//!
//! [`TimetableIndex`] is immutable once built. [`Timetable`] owns the
//! currently active index and swaps in rebuilt ones atomically, so a query
//! always sees one complete index.

mod cache;
mod error;
mod handle;
mod index;
mod query;

pub use cache::IndexCache;
pub use error::{CacheError, IndexError};
pub use handle::{BuildSummary, Timetable};
pub use index::{Schedule, SourceFailure, TimetableIndex};
pub use query::{PairTimes, QueryResult, ScheduleFilter, ScheduleLegs, StationTimes};
