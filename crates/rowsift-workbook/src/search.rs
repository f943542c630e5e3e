use crate::dataset::Dataset;
use crate::error::SessionError;
use rowsift_match::{MatchHit, MatchKind, Query, RowMatcher};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Progress sink for a row scan. `scanned` counts rows visited so far
/// (deleted ones included) out of `total`.
pub trait SearchProgress {
    fn on_progress(&mut self, scanned: usize, total: usize);
}

impl<F: FnMut(usize, usize)> SearchProgress for F {
    fn on_progress(&mut self, scanned: usize, total: usize) {
        self(scanned, total)
    }
}

/// Progress sink that drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl SearchProgress for NoProgress {
    fn on_progress(&mut self, _scanned: usize, _total: usize) {}
}

/// One matched row: its position in the dataset and the cell that matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedRow {
    pub original_index: usize,
    pub hit: MatchHit,
}

/// Row scanner with the search-in-progress guard.
///
/// Only one scan runs at a time per `Searcher`; a second `run` while one is
/// active (from another thread, or re-entered from the progress callback)
/// fails with [`SessionError::SearchInProgress`].
#[derive(Debug)]
pub struct Searcher {
    running: AtomicBool,
    progress_interval: usize,
}

struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Searcher {
    pub fn new(progress_interval: usize) -> Self {
        Self {
            running: AtomicBool::new(false),
            progress_interval: progress_interval.max(1),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Scan `dataset` in row order, skipping `deleted`, and collect every
    /// matching row.
    ///
    /// Progress is reported before visiting every `progress_interval`-th
    /// row and the last row, then once more with `scanned == total`.
    pub fn run(
        &self,
        dataset: &Dataset,
        deleted: &BTreeSet<usize>,
        query: &Query,
        progress: &mut dyn SearchProgress,
    ) -> Result<Vec<MatchedRow>, SessionError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::SearchInProgress);
        }
        let _guard = RunGuard(&self.running);

        let matcher = RowMatcher::new(query);
        let total = dataset.len();
        let mut matched = Vec::new();
        for (i, row) in dataset.rows().iter().enumerate() {
            if i % self.progress_interval == 0 || i + 1 == total {
                progress.on_progress(i, total);
            }
            if deleted.contains(&i) {
                continue;
            }
            if let Some(hit) = matcher.explain(row) {
                matched.push(MatchedRow {
                    original_index: i,
                    hit,
                });
            }
        }
        progress.on_progress(total, total);
        Ok(matched)
    }
}

/// One line of the debug trace for a hit.
pub fn describe_hit(row: &[String], hit: &MatchHit, query: &Query) -> String {
    let cell = row.get(hit.column).map(String::as_str).unwrap_or_default();
    match hit.kind {
        MatchKind::Numeric { difference } => format!(
            "Найдено числовое совпадение: {cell} ≈ {} (разница: {difference:.6})",
            query.normalized()
        ),
        MatchKind::Phone => format!("Найдено совпадение телефона: {cell}"),
        MatchKind::Substring => format!(
            "Найдено текстовое совпадение: \"{cell}\" содержит \"{}\"",
            query.raw()
        ),
    }
}
