//! Data transfer objects for web responses.

use serde::Serialize;

use crate::domain::{ScheduleKey, StationName};
use crate::timetable::{BuildSummary, QueryResult, ScheduleFilter, TimetableIndex};

/// Service description returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub service: &'static str,
    pub status: StatusResponse,
    pub routes: Vec<RouteInfo>,
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub path: &'static str,
    pub description: &'static str,
}

/// Index readiness and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    /// Whether an index has been published
    pub ready: bool,

    pub schedules: usize,

    pub legs: usize,

    /// When the active index was built, RFC 3339
    pub built_at: Option<String>,

    /// Sources that failed in the last build
    pub failures: usize,

    /// Whether a rebuild is running right now
    pub rebuilding: bool,
}

impl StatusResponse {
    /// Status of a handle with no active index.
    pub fn not_ready(rebuilding: bool) -> Self {
        Self {
            ready: false,
            schedules: 0,
            legs: 0,
            built_at: None,
            failures: 0,
            rebuilding,
        }
    }

    pub fn from_index(index: &TimetableIndex, rebuilding: bool) -> Self {
        Self {
            ready: true,
            schedules: index.schedule_count(),
            legs: index.leg_count(),
            built_at: Some(index.built_at().to_rfc3339()),
            failures: index.failures().len(),
            rebuilding,
        }
    }
}

/// Response for `GET /horarios`.
#[derive(Debug, Serialize)]
pub struct SchedulesResponse {
    pub count: usize,
    pub schedules: Vec<ScheduleKey>,
}

/// Response for `GET /consulta`.
///
/// The result's `mode` and `results` fields are inlined next to the echoed
/// filter.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub filter: ScheduleFilter,
    pub count: usize,
    #[serde(flatten)]
    pub result: QueryResult,
}

impl QueryResponse {
    pub fn new(filter: ScheduleFilter, result: QueryResult) -> Self {
        Self {
            filter,
            count: result.len(),
            result,
        }
    }
}

/// Response for `GET /estaciones`.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub count: usize,
    pub stations: Vec<StationName>,
}

/// A source that failed during a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureResult {
    pub source: String,
    pub reason: String,
}

/// Response for `GET /regenerar`.
#[derive(Debug, Serialize)]
pub struct RegenerateResponse {
    pub schedules: usize,
    pub legs: usize,
    pub processed: Vec<String>,
    pub failures: Vec<FailureResult>,
    pub built_at: String,
}

impl From<BuildSummary> for RegenerateResponse {
    fn from(summary: BuildSummary) -> Self {
        let failures = summary
            .failures
            .into_iter()
            .map(|f| FailureResult {
                source: f.source,
                reason: f.error.to_string(),
            })
            .collect();

        Self {
            schedules: summary.schedules,
            legs: summary.legs,
            processed: summary.processed,
            failures,
            built_at: summary.built_at.to_rfc3339(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
