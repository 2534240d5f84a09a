//! Layout classification.
//!
//! Two spreadsheet shapes are understood:
//!
//! - **line matrix**: the first row lists the stations along a line and
//!   every further row is one run, holding that run's time at each station;
//! - **point rows**: origin station, departure time, destination station
//!   and arrival time in the first four columns. Further columns may carry
//!   notes but never times.

use serde::Serialize;

use super::SourceError;
use super::metadata::extract_schedule_key;
use crate::domain::ScheduleKey;
use crate::tabular::{Cell, Grid, row_cell};

/// Which normalizer a grid needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    LineMatrix,
    PointRows,
}

/// Result of classifying one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub layout: LayoutKind,
    pub key: ScheduleKey,
}

/// Classify a source from its identifier and grid.
///
/// The schedule key comes from the identifier, the layout from the grid
/// shape.
pub fn classify(source_id: &str, grid: &Grid) -> Result<Classification, SourceError> {
    let layout = classify_layout(grid)?;
    Ok(Classification {
        layout,
        key: extract_schedule_key(source_id),
    })
}

/// Decide the layout from the grid shape alone.
pub fn classify_layout(grid: &Grid) -> Result<LayoutKind, SourceError> {
    if grid.is_blank() {
        return Err(SourceError::LayoutUnrecognized { reason: "no rows" });
    }

    let rows = grid.rows();
    let has_point_rows = rows.iter().any(|row| is_point_row(row));
    if has_point_rows && !rows.iter().any(|row| has_time_after_points(row)) {
        return Ok(LayoutKind::PointRows);
    }

    if is_line_matrix(grid) {
        return Ok(LayoutKind::LineMatrix);
    }

    Err(SourceError::LayoutUnrecognized {
        reason: "expected a station header row with time rows, or origin/time/destination/time rows",
    })
}

/// A row of the form `station, time, station, time`.
pub(crate) fn is_point_row(row: &[Cell]) -> bool {
    is_station_cell(row_cell(row, 0))
        && row_cell(row, 1).is_time_like()
        && is_station_cell(row_cell(row, 2))
        && row_cell(row, 3).is_time_like()
}

fn has_time_after_points(row: &[Cell]) -> bool {
    row.iter().skip(4).any(Cell::is_time_like)
}

fn is_station_cell(cell: &Cell) -> bool {
    !cell.is_empty() && !cell.is_time_like()
}

fn is_line_matrix(grid: &Grid) -> bool {
    let Some((header, runs)) = grid.rows().split_first() else {
        return false;
    };

    let named_stations = header.iter().filter(|c| is_station_cell(c)).count();
    named_stations >= 2
        && runs
            .iter()
            .any(|row| row.iter().filter(|c| c.is_time_like()).count() >= 2)
}
