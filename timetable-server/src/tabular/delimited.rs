//! Reader for delimited text exports (CSV / TSV).

use std::path::Path;

use super::{Cell, Grid, ReadError, TabularReader, extension_of};

/// Reads comma, semicolon or tab separated exports.
///
/// `.tsv` files are always tab separated. For `.csv` files the separator is
/// sniffed from the first line, since spreadsheet programs in locales with
/// a decimal comma write semicolons. Files that are not valid UTF-8 are
/// decoded as Latin-1.
#[derive(Debug, Clone, Default)]
pub struct DelimitedReader;

impl DelimitedReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse already-loaded text with the given separator.
    pub fn parse_str(content: &str, delimiter: u8) -> Result<Grid, ReadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ReadError::Malformed {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                message: e.to_string(),
            })?;
            rows.push(record.iter().map(Cell::parse).collect());
        }

        Ok(Grid::new(rows))
    }
}

impl TabularReader for DelimitedReader {
    fn read(&self, path: &Path) -> Result<Grid, ReadError> {
        let extension = extension_of(path);

        if !matches!(extension.as_str(), "csv" | "tsv") {
            return Err(ReadError::UnsupportedFormat { extension });
        }

        let bytes = std::fs::read(path).map_err(|e| ReadError::Io {
            message: e.to_string(),
        })?;
        let content = decode(&bytes);

        let delimiter = if extension == "tsv" {
            b'\t'
        } else {
            sniff_delimiter(&content)
        };

        Self::parse_str(&content, delimiter)
    }
}

/// Decode as UTF-8 (dropping a BOM), falling back to Latin-1.
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Pick the most frequent candidate separator on the first line.
fn sniff_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .map(|d| (first_line.bytes().filter(|&b| b == d).count(), d))
        .filter(|(count, _)| *count > 0)
        .max_by_key(|(count, _)| *count)
        .map(|(_, d)| d)
        .unwrap_or(b',')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_quoted_multiline_cells() {
        let grid = DelimitedReader::parse_str("\"  Central \n\",Plaza\n0.5,08:30\n", b',').unwrap();
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(grid.cell(0, 0), &Cell::Text("  Central \n".into()));
        assert_eq!(grid.cell(1, 0), &Cell::Number(0.5));
        assert_eq!(grid.cell(1, 1), &Cell::Text("08:30".into()));
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let grid = DelimitedReader::parse_str("A,B,C\n08:00\n", b',').unwrap();
        assert_eq!(grid.rows()[1].len(), 1);
        assert_eq!(grid.width(), 3);
    }

    #[test]
    fn sniffs_semicolons() {
        assert_eq!(sniff_delimiter("A;B;C\n1;2;3"), b';');
        assert_eq!(sniff_delimiter("A,B\n"), b',');
        assert_eq!(sniff_delimiter("A\tB\tC"), b'\t');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn decodes_latin1() {
        let bytes = b"Estaci\xf3n";
        assert_eq!(decode(bytes), "Estación");
        assert_eq!(decode(b"\xEF\xBB\xBFA,B"), "A,B");
    }

    #[test]
    fn reads_csv_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("METRO SABADO IDA.csv");
        fs::write(&path, "Central;08:00;Plaza;08:10\n").unwrap();

        let grid = DelimitedReader::new().read(&path).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.cell(0, 2), &Cell::Text("Plaza".into()));
    }

    #[test]
    fn reads_tsv_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.TSV");
        fs::write(&path, "A\tB\n08:00\t08:05\n").unwrap();

        let grid = DelimitedReader::new().read(&path).unwrap();
        assert_eq!(grid.width(), 2);
    }

    #[test]
    fn rejects_spreadsheet_binaries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("TREN LUNES A VIERNES IDA.xls");
        fs::write(&path, [0xD0, 0xCF, 0x11, 0xE0]).unwrap();

        let err = DelimitedReader::new().read(&path).unwrap_err();
        assert_eq!(
            err,
            ReadError::UnsupportedFormat {
                extension: "xls".into()
            }
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DelimitedReader::new()
            .read(Path::new("/nonexistent/dir/file.csv"))
            .unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
    }
}
