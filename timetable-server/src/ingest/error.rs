//! Per-source ingestion errors.

use crate::tabular::ReadError;

/// Why a single source contributed no legs to a build.
///
/// These never abort a build; they are collected into the build summary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The tabular reader could not open or parse the file
    #[error("source unreadable: {0}")]
    Unreadable(#[from] ReadError),

    /// The grid matches neither known layout
    #[error("layout unrecognized: {reason}")]
    LayoutUnrecognized { reason: &'static str },
}
