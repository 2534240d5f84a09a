//! Tabular source reading.
//!
//! A tabular reader turns a source file into a [`Grid`] of [`Cell`]s. The
//! timetable engine only ever sees grids, so further file formats plug in
//! by implementing [`TabularReader`].

mod cell;
mod delimited;
mod error;
mod source;
mod workbook;

use std::path::Path;

pub use cell::{Cell, Grid, row_cell};
pub use delimited::DelimitedReader;
pub use error::ReadError;
pub use source::SourceReader;
pub use workbook::WorkbookReader;

/// Reads a source file into a grid of cells.
pub trait TabularReader: Send + Sync {
    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> Result<Grid, ReadError>;
}

/// The lowercased extension of `path`, empty when there is none.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}
