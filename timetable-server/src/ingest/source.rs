//! Source file discovery.

use std::path::{Path, PathBuf};

/// File extensions treated as timetable sources.
///
/// Spreadsheet binaries are listed so they show up as failed sources in the
/// build summary rather than being silently ignored.
pub const SOURCE_EXTENSIONS: &[&str] = &["csv", "tsv", "xls", "xlsx", "ods"];

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    /// Identifier used for metadata extraction and reporting (the file name).
    pub id: String,
    pub path: PathBuf,
}

impl SourceFile {
    /// Describe the file at `path`, using its file name as identifier.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { id, path }
    }
}

/// List source files directly inside `dir`, sorted by identifier.
pub fn discover_sources(dir: &Path) -> std::io::Result<Vec<SourceFile>> {
    let mut sources = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_source = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_source {
            sources.push(SourceFile::new(path));
        }
    }

    sources.sort();
    Ok(sources)
}
