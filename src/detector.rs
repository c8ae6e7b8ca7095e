// src/detector.rs

use crate::classify::{classify, inspect_parallel, BatchReport};
use crate::error::Result;
use crate::fingerprint::fingerprint;
use crate::grid::Grid;
use crate::store::{MemoryBackend, RecordBackend, StatsStore};
use crate::types::{Sample, StatsSnapshot};

/// Validates grids, deduplicates them by fingerprint and keeps the stats.
///
/// The detector owns its `StatsStore`; share one detector (e.g. behind an
/// `Arc`) between every caller that should contribute to the same stats.
pub struct MutantDetector<B: RecordBackend = MemoryBackend> {
    store: StatsStore<B>,
}

impl MutantDetector<MemoryBackend> {
    /// A detector backed by an in-memory store.
    pub fn new() -> Self {
        Self::with_store(StatsStore::in_memory())
    }
}

impl Default for MutantDetector<MemoryBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RecordBackend> MutantDetector<B> {
    pub fn with_store(store: StatsStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StatsStore<B> {
        &self.store
    }

    /// Classify one grid given as rows.
    ///
    /// Invalid input is rejected before anything is scanned or recorded. A
    /// grid seen before returns its recorded verdict without rescanning.
    pub fn is_mutant<S: AsRef<str>>(&self, rows: &[S]) -> Result<bool> {
        let grid = Grid::from_rows(rows)?;
        self.is_mutant_grid(&grid)
    }

    /// Classify an already validated grid.
    pub fn is_mutant_grid(&self, grid: &Grid) -> Result<bool> {
        let fp = fingerprint(grid);
        self.store.record_or_get(fp, || classify(grid))
    }

    /// Classify many samples on the rayon pool, one verdict per sample in
    /// input order. Duplicates inside the batch are recorded once, like
    /// duplicates across calls.
    pub fn inspect_batch<'a>(&self, samples: &'a [Sample]) -> BatchReport<'a> {
        let report = inspect_parallel(samples, |rows| self.is_mutant(rows));
        let (mutant, human, rejected) = report.counts();
        log::info!(
            "inspected {} sample(s): {} mutant, {} human, {} rejected",
            report.len(),
            mutant,
            human,
            rejected
        );
        report
    }

    /// Current aggregate counts and ratio.
    pub fn stats(&self) -> Result<StatsSnapshot> {
        self.store.snapshot()
    }
}
