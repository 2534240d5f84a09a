//! Extension-based reader selection.

use std::path::Path;

use super::{DelimitedReader, Grid, ReadError, TabularReader, WorkbookReader, extension_of};

/// Reads any supported source file, picking the reader by extension.
#[derive(Debug, Clone, Default)]
pub struct SourceReader {
    delimited: DelimitedReader,
    workbook: WorkbookReader,
}

impl SourceReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabularReader for SourceReader {
    fn read(&self, path: &Path) -> Result<Grid, ReadError> {
        match extension_of(path).as_str() {
            "csv" | "tsv" => self.delimited.read(path),
            "xls" | "xlsx" | "ods" => self.workbook.read(path),
            other => Err(ReadError::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::Cell;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn dispatches_on_extension() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("METRO SABADO IDA.CSV");
        fs::write(&csv, "Central,08:00,Plaza,08:10\n").unwrap();

        let reader = SourceReader::new();
        let grid = reader.read(&csv).unwrap();
        assert_eq!(grid.cell(0, 2), &Cell::Text("Plaza".into()));

        let xlsx = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/METRO SABADO IDA.xlsx");
        let grid = reader.read(&xlsx).unwrap();
        assert_eq!(grid.cell(1, 2), &Cell::Text("Plaza".into()));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = SourceReader::new()
            .read(Path::new("data/horario.pdf"))
            .unwrap_err();
        assert_eq!(
            err,
            ReadError::UnsupportedFormat {
                extension: "pdf".into()
            }
        );

        let err = SourceReader::new().read(Path::new("data/README")).unwrap_err();
        assert_eq!(
            err,
            ReadError::UnsupportedFormat {
                extension: String::new()
            }
        );
    }
}
