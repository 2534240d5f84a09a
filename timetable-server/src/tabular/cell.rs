//! Cells and grids produced by tabular readers.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::domain::{TimeOfDay, parse_clock};

/// Date-time text layouts recognised in delimited exports.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl Cell {
    /// Interpret raw delimited text.
    ///
    /// Numbers (with `.` or a single `,` as decimal separator) become
    /// [`Cell::Number`], recognised date-time layouts become
    /// [`Cell::DateTime`], everything else stays text. Clock text such as
    /// `"08:30"` stays text; it is normalized when read as a time.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }

        if let Some(number) = parse_number(trimmed) {
            return Cell::Number(number);
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Cell::DateTime(dt);
            }
        }

        Cell::Text(raw.to_string())
    }

    /// Returns true for empty cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The cell rendered as trimmed text.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Time(t) => t.format("%H:%M:%S").to_string(),
        }
    }

    /// Returns true if this cell reads as a time of day.
    ///
    /// Whole numbers of one or more are run labels or counters, not day
    /// fractions, so they do not count.
    pub fn is_time_like(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => parse_clock(s.trim()).is_some(),
            Cell::Number(n) => n.is_finite() && *n >= 0.0 && (*n < 1.0 || n.fract() != 0.0),
            Cell::DateTime(_) | Cell::Time(_) => true,
        }
    }

    /// Normalize the cell to a time of day.
    ///
    /// Empty cells yield `None`. Day fractions and date-time values become
    /// clock times; any other value, including whole numbers such as run or
    /// platform numbers, is kept as trimmed text.
    pub fn to_time_of_day(&self) -> Option<TimeOfDay> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(TimeOfDay::parse(s)),
            Cell::Number(n) => Some(match TimeOfDay::from_day_fraction(*n) {
                Some(time) if self.is_time_like() => time,
                _ => TimeOfDay::Text(self.as_text()),
            }),
            Cell::DateTime(dt) => TimeOfDay::from_hm(dt.hour(), dt.minute()),
            Cell::Time(t) => TimeOfDay::from_hm(t.hour(), t.minute()),
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    if !s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b',' | b'-' | b'+' | b'e' | b'E'))
        || !s.bytes().any(|b| b.is_ascii_digit())
    {
        return None;
    }
    if let Ok(n) = s.parse::<f64>() {
        return Some(n);
    }
    // Decimal comma, as written by Spanish-locale exports
    if !s.contains('.') && s.matches(',').count() == 1 {
        return s.replace(',', ".").parse().ok();
    }
    None
}

static EMPTY: Cell = Cell::Empty;

/// A rectangular-ish grid of cells; rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a grid from raw text cells, parsing each with [`Cell::parse`].
    pub fn from_text<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| Cell::parse(s.as_ref())).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The cell at `(row, column)`, or [`Cell::Empty`] when out of range.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY)
    }

    /// Number of columns up to the last non-empty cell of any row.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
            .map(|last| last + 1)
            .max()
            .unwrap_or(0)
    }

    /// Returns true if no row has a non-empty cell.
    pub fn is_blank(&self) -> bool {
        self.width() == 0
    }
}

/// The cell at `column` of a row, or [`Cell::Empty`] when out of range.
pub fn row_cell(row: &[Cell], column: usize) -> &Cell {
    row.get(column).unwrap_or(&EMPTY)
}
