//! Reader for spreadsheet binaries (XLS / XLSX / ODS).

use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::NaiveTime;

use super::{Cell, Grid, ReadError, TabularReader, extension_of};

/// Reads the first worksheet of a workbook.
///
/// Only the used range of the sheet is returned, so leading blank rows and
/// columns are dropped. Cell types follow the workbook's own typing: numbers
/// stay numbers, cells formatted as dates or times become date-time or time
/// cells.
#[derive(Debug, Clone, Default)]
pub struct WorkbookReader;

impl WorkbookReader {
    pub fn new() -> Self {
        Self
    }
}

impl TabularReader for WorkbookReader {
    fn read(&self, path: &Path) -> Result<Grid, ReadError> {
        let extension = extension_of(path);
        if !matches!(extension.as_str(), "xls" | "xlsx" | "ods") {
            return Err(ReadError::UnsupportedFormat { extension });
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| ReadError::Workbook {
            message: e.to_string(),
        })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ReadError::Workbook {
                message: "no worksheet".to_string(),
            })?
            .map_err(|e| ReadError::Workbook {
                message: e.to_string(),
            })?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(to_cell).collect())
            .collect();
        Ok(Grid::new(rows))
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::parse(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() => dt
            .as_duration()
            .and_then(|d| clock_time(d.num_seconds()))
            .map_or(Cell::Number(dt.as_f64()), Cell::Time),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(Cell::Number(dt.as_f64()), Cell::DateTime),
        Data::DateTimeIso(s) => data
            .as_datetime()
            .map(Cell::DateTime)
            .or_else(|| data.as_time().map(Cell::Time))
            .unwrap_or_else(|| Cell::parse(s)),
        Data::DurationIso(s) => data
            .as_time()
            .map_or_else(|| Cell::parse(s), Cell::Time),
    }
}

/// A duration as a time of day, wrapping at 24h.
fn clock_time(seconds: i64) -> Option<NaiveTime> {
    let seconds = u32::try_from(seconds.rem_euclid(86_400)).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}
