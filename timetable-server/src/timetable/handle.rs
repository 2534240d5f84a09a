//! Shared, swappable timetable.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::cache::IndexCache;
use super::error::IndexError;
use super::index::{SourceFailure, TimetableIndex};
use crate::tabular::TabularReader;

/// Outcome of a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub schedules: usize,
    pub legs: usize,
    pub processed: Vec<String>,
    pub failures: Vec<SourceFailure>,
    pub built_at: DateTime<Utc>,
}

impl BuildSummary {
    fn of(index: &TimetableIndex) -> Self {
        Self {
            schedules: index.schedule_count(),
            legs: index.leg_count(),
            processed: index.processed().to_vec(),
            failures: index.failures().to_vec(),
            built_at: index.built_at(),
        }
    }
}

/// Thread-safe handle to the active timetable index.
///
/// Readers take a snapshot (`Arc<TimetableIndex>`) and keep using it for
/// the whole request. A rebuild constructs a new index off to the side and
/// then swaps the reference, holding the write lock only for the swap.
/// Rebuilds are serialized: a second caller waits for the first. The
/// rebuild lock is owned by the blocking build task, so it stays held until
/// the build ends even if the caller stops waiting for it.
#[derive(Clone)]
pub struct Timetable {
    inner: Arc<Inner>,
}

struct Inner {
    active: RwLock<Option<Arc<TimetableIndex>>>,
    rebuild: Arc<Mutex<()>>,
    data_dir: PathBuf,
    reader: Arc<dyn TabularReader>,
    cache: Option<IndexCache>,
}

impl Timetable {
    /// Create a handle with no active index yet.
    pub fn new(
        data_dir: impl Into<PathBuf>,
        reader: Arc<dyn TabularReader>,
        cache: Option<IndexCache>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                active: RwLock::new(None),
                rebuild: Arc::new(Mutex::new(())),
                data_dir: data_dir.into(),
                reader,
                cache,
            }),
        }
    }

    /// The active index.
    ///
    /// Fails with [`IndexError::NotReady`] until an index has been published.
    pub async fn current(&self) -> Result<Arc<TimetableIndex>, IndexError> {
        let guard = self.inner.active.read().await;
        guard.clone().ok_or(IndexError::NotReady)
    }

    /// Make `index` the active index.
    pub async fn publish(&self, index: TimetableIndex) {
        let index = Arc::new(index);
        let mut guard = self.inner.active.write().await;
        *guard = Some(index);
    }

    /// Publish the persisted index, if there is one and nothing is active.
    ///
    /// Returns the number of schedules loaded.
    pub async fn warm_start(&self) -> Option<usize> {
        let cache = self.inner.cache.clone()?;
        let index = tokio::task::spawn_blocking(move || cache.load())
            .await
            .ok()
            .flatten()?;
        let schedules = index.schedule_count();

        let mut guard = self.inner.active.write().await;
        if guard.is_some() {
            return None;
        }
        *guard = Some(Arc::new(index));
        Some(schedules)
    }

    /// Rebuild from the data directory and swap the result in.
    ///
    /// Per-source failures are part of the summary, not errors. The
    /// previous index stays active if the directory cannot be listed.
    ///
    /// The build, the cache write and the swap all happen under the rebuild
    /// lock on a blocking thread. Dropping the returned future does not
    /// cancel them.
    pub async fn regenerate(&self) -> Result<BuildSummary, IndexError> {
        let rebuilding = Arc::clone(&self.inner.rebuild).lock_owned().await;
        let inner = Arc::clone(&self.inner);

        tokio::task::spawn_blocking(move || {
            let _rebuilding = rebuilding;

            let index = TimetableIndex::build_from_dir(&inner.data_dir, inner.reader.as_ref())?;
            if let Some(cache) = &inner.cache
                && let Err(error) = cache.save(&index)
            {
                warn!(path = %cache.path().display(), %error, "failed to persist index");
            }

            let summary = BuildSummary::of(&index);
            *inner.active.blocking_write() = Some(Arc::new(index));

            info!(
                schedules = summary.schedules,
                legs = summary.legs,
                failures = summary.failures.len(),
                "timetable index published"
            );
            Ok::<_, IndexError>(summary)
        })
        .await
        .map_err(|e| IndexError::BuildTask {
            message: e.to_string(),
        })?
    }

    /// Returns true while a rebuild holds the rebuild lock.
    pub fn is_rebuilding(&self) -> bool {
        self.inner.rebuild.try_lock().is_err()
    }

    /// Directory the sources are read from.
    pub fn data_dir(&self) -> &std::path::Path {
        &self.inner.data_dir
    }
}
