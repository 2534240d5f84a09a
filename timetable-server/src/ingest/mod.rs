//! Ingestion: from source grids to normalized legs.
//!
//! A source is read into a grid, classified into one of the two known
//! layouts, and handed to the matching [`Normalizer`]. Both normalizers
//! emit the same [`Leg`] shape and share the cell time rules in
//! [`crate::tabular::Cell::to_time_of_day`].

mod classify;
mod error;
mod line_matrix;
mod metadata;
mod point_rows;
mod source;

pub use classify::{Classification, LayoutKind, classify, classify_layout};
pub use error::SourceError;
pub use line_matrix::LineMatrixNormalizer;
pub use metadata::{extract_day_group, extract_direction, extract_schedule_key, extract_transport};
pub use point_rows::PointRowsNormalizer;
pub use source::{SOURCE_EXTENSIONS, SourceFile, discover_sources};

use crate::domain::{Leg, ScheduleKey};
use crate::tabular::{Grid, TabularReader};

/// Converts a classified grid into legs.
pub trait Normalizer {
    /// Emit the legs of `grid`, all tagged with `key`, in source row order.
    fn normalize(&self, key: ScheduleKey, grid: &Grid) -> Vec<Leg>;
}

impl LayoutKind {
    /// The normalizer for this layout.
    pub fn normalizer(self) -> &'static dyn Normalizer {
        match self {
            LayoutKind::LineMatrix => &LineMatrixNormalizer,
            LayoutKind::PointRows => &PointRowsNormalizer,
        }
    }
}

/// Classify and normalize an already-read grid.
pub fn ingest_grid(source_id: &str, grid: &Grid) -> Result<Vec<Leg>, SourceError> {
    let Classification { layout, key } = classify(source_id, grid)?;
    Ok(layout.normalizer().normalize(key, grid))
}

/// Read, classify and normalize one source file.
pub fn ingest_source(
    source: &SourceFile,
    reader: &dyn TabularReader,
) -> Result<Vec<Leg>, SourceError> {
    let grid = reader.read(&source.path)?;
    ingest_grid(&source.id, &grid)
}
