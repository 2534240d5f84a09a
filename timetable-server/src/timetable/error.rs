//! Timetable index error types.

/// Errors surfaced by the shared timetable.
///
/// "No results" is never an error; queries against a ready index always
/// succeed, possibly with an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// No build has completed yet
    #[error("timetable index not ready: no build has completed yet")]
    NotReady,

    /// The source directory could not be listed
    #[error("cannot list sources in {dir}: {message}")]
    Discovery { dir: String, message: String },

    /// The background build task failed to run to completion
    #[error("build task failed: {message}")]
    BuildTask { message: String },
}

/// Errors from the persisted index cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache file could not be read or written
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache contents could not be (de)serialized
    #[error("cache format error: {0}")]
    Json(#[from] serde_json::Error),

    /// The cache was written by something else
    #[error("invalid cache contents: {message}")]
    Invalid { message: String },
}
