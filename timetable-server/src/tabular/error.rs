//! Tabular reader error types.

/// Errors that can occur when reading a source file into a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// The file could not be opened or read
    #[error("failed to read file: {message}")]
    Io { message: String },

    /// No reader handles this file type
    #[error("unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    /// The file was read but its records could not be parsed
    #[error("malformed record at line {line}: {message}")]
    Malformed { line: u64, message: String },

    /// A spreadsheet binary could not be opened or has no worksheet
    #[error("unreadable workbook: {message}")]
    Workbook { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ReadError::UnsupportedFormat {
            extension: "xls".into(),
        };
        assert_eq!(err.to_string(), "unsupported file format: .xls");

        let err = ReadError::Malformed {
            line: 3,
            message: "bad quote".into(),
        };
        assert_eq!(err.to_string(), "malformed record at line 3: bad quote");

        let err = ReadError::Workbook {
            message: "no worksheet".into(),
        };
        assert_eq!(err.to_string(), "unreadable workbook: no worksheet");
    }
}
