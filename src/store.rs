// src/store.rs

use ahash::AHashMap;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::Arc;

use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::types::StatsSnapshot;

/// Distinct mutant and human records, read together.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub mutant: u64,
    pub human: u64,
}

/// Persistence collaborator behind a `StatsStore`.
///
/// Implementations must make `commit` all-or-nothing (the record and its
/// counter become visible together or not at all) and `tally` a consistent
/// read. Any failure to reach the underlying storage is reported as
/// `MutantError::StorageUnavailable`.
pub trait RecordBackend: Send + Sync {
    /// The stored verdict for `fp`, if any.
    fn load(&self, fp: &Fingerprint) -> Result<Option<bool>>;

    /// Store the verdict for a fingerprint that has no record yet.
    fn commit(&self, fp: Fingerprint, is_mutant: bool) -> Result<()>;

    fn tally(&self) -> Result<Tally>;

    /// Number of distinct fingerprints recorded.
    fn len(&self) -> Result<usize>;

    /// Drop every record.
    fn clear(&self) -> Result<()>;
}

#[derive(Default)]
struct MemoryTable {
    records: AHashMap<Fingerprint, bool>,
    tally: Tally,
}

/// In-process backend. Records and counters share one lock so a commit and
/// a tally can never interleave.
#[derive(Default)]
pub struct MemoryBackend {
    table: RwLock<MemoryTable>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordBackend for MemoryBackend {
    fn load(&self, fp: &Fingerprint) -> Result<Option<bool>> {
        Ok(self.table.read().records.get(fp).copied())
    }

    fn commit(&self, fp: Fingerprint, is_mutant: bool) -> Result<()> {
        let mut table = self.table.write();
        // write-once: a record that already exists keeps its first verdict
        if table.records.contains_key(&fp) {
            return Ok(());
        }
        table.records.insert(fp, is_mutant);
        if is_mutant {
            table.tally.mutant += 1;
        } else {
            table.tally.human += 1;
        }
        Ok(())
    }

    fn tally(&self) -> Result<Tally> {
        Ok(self.table.read().tally)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.table.read().records.len())
    }

    fn clear(&self) -> Result<()> {
        let mut table = self.table.write();
        table.records.clear();
        table.tally = Tally::default();
        Ok(())
    }
}

type GateMap = Mutex<AHashMap<Fingerprint, Arc<Mutex<()>>>>;

/// A caller's handle on the gate of one fingerprint. Dropping it (also while
/// unwinding from a panicking classification) removes the gate from the map
/// once no other caller holds it.
struct GateHandle<'s> {
    gates: &'s GateMap,
    fp: Fingerprint,
    gate: Arc<Mutex<()>>,
}

impl<'s> GateHandle<'s> {
    fn acquire(gates: &'s GateMap, fp: Fingerprint) -> Self {
        let gate = gates.lock().entry(fp).or_default().clone();
        Self { gates, fp, gate }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock()
    }
}

impl Drop for GateHandle<'_> {
    fn drop(&mut self) {
        // Handles are only cloned under the map lock, so the count cannot
        // grow while we check it: one reference in the map, one here.
        let mut gates = self.gates.lock();
        if Arc::strong_count(&self.gate) == 2 {
            gates.remove(&self.fp);
        }
    }
}

/// Write-once verdict store keyed by fingerprint.
///
/// Each fingerprint goes `Absent -> Recorded(is_mutant)` exactly once.
/// Callers racing on the same fingerprint are serialized on a per-key gate:
/// the first one computes and commits, the rest wait and read its record.
/// Different fingerprints only contend on the gate map itself, which is
/// locked just long enough to fetch or drop a gate.
pub struct StatsStore<B: RecordBackend = MemoryBackend> {
    backend: B,
    gates: GateMap,
}

impl StatsStore<MemoryBackend> {
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryBackend::new())
    }
}

impl Default for StatsStore<MemoryBackend> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<B: RecordBackend> StatsStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            gates: Mutex::new(AHashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Return the verdict recorded for `fp`, computing and recording it first
    /// if there is none.
    ///
    /// `compute` runs at most once per fingerprint for the lifetime of the
    /// record, even under concurrent calls. On a backend failure nothing is
    /// recorded and no verdict is returned.
    pub fn record_or_get<F>(&self, fp: Fingerprint, compute: F) -> Result<bool>
    where
        F: FnOnce() -> bool,
    {
        if let Some(is_mutant) = self.backend.load(&fp)? {
            return Ok(is_mutant);
        }

        let gate = GateHandle::acquire(&self.gates, fp);
        let _held = gate.lock();
        self.decide(fp, compute)
    }

    /// Runs under the per-fingerprint gate.
    fn decide<F>(&self, fp: Fingerprint, compute: F) -> Result<bool>
    where
        F: FnOnce() -> bool,
    {
        // another caller may have committed while we waited for the gate
        if let Some(is_mutant) = self.backend.load(&fp)? {
            return Ok(is_mutant);
        }
        let is_mutant = compute();
        if let Err(e) = self.backend.commit(fp, is_mutant) {
            log::warn!("failed to record {fp}: {e}");
            return Err(e);
        }
        log::debug!("recorded {fp} as {}", if is_mutant { "mutant" } else { "human" });
        Ok(is_mutant)
    }

    /// Read-only lookup of an existing record.
    pub fn lookup(&self, fp: &Fingerprint) -> Result<Option<bool>> {
        self.backend.load(fp)
    }

    /// Consistent counts and ratio over all records.
    pub fn snapshot(&self) -> Result<StatsSnapshot> {
        let tally = self.backend.tally()?;
        Ok(StatsSnapshot::from_counts(tally.mutant, tally.human))
    }

    pub fn len(&self) -> Result<usize> {
        self.backend.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Forget every record.
    pub fn clear(&self) -> Result<()> {
        log::info!("clearing all classification records");
        self.backend.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MutantError;
    use crate::fingerprint::fingerprint;
    use crate::grid::Grid;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    fn fp(rows: &[&str]) -> Fingerprint {
        fingerprint(&Grid::from_rows(rows).unwrap())
    }

    #[test]
    fn test_first_verdict_is_permanent() {
        let store = StatsStore::in_memory();
        let key = fp(&["ATGC", "CAGT", "TTAT", "AGAC"]);

        assert!(!store.record_or_get(key, || false).unwrap());
        // a later, different verdict is ignored and the closure never runs
        assert!(!store.record_or_get(key, || panic!("recomputed")).unwrap());
        assert_eq!(store.lookup(&key).unwrap(), Some(false));
        assert_eq!(store.snapshot().unwrap(), StatsSnapshot::from_counts(0, 1));
    }

    #[test]
    fn test_snapshot_counts_distinct_records() {
        let store = StatsStore::in_memory();
        let mutant = fp(&["AAAA", "CGTC", "TTTT", "GCAG"]);
        let human = fp(&["ATGC", "CAGT", "TTAT", "AGAC"]);

        assert_eq!(store.snapshot().unwrap().ratio, 0.0);
        store.record_or_get(mutant, || true).unwrap();
        store.record_or_get(mutant, || true).unwrap();
        store.record_or_get(human, || false).unwrap();

        let snap = store.snapshot().unwrap();
        assert_eq!(snap.count_mutant_dna, 1);
        assert_eq!(snap.count_human_dna, 1);
        assert_eq!(snap.ratio, 0.5);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let store = StatsStore::in_memory();
        let key = fp(&["AAAA", "CGTC", "TTTT", "GCAG"]);
        store.record_or_get(key, || true).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.lookup(&key).unwrap(), None);
        assert_eq!(store.snapshot().unwrap(), StatsSnapshot::from_counts(0, 0));
    }

    #[test]
    fn test_concurrent_same_key_computes_once() {
        let store = StatsStore::in_memory();
        let key = fp(&["AAAA", "CGTC", "TTTT", "GCAG"]);
        let calls = AtomicUsize::new(0);
        let threads = 16;
        let barrier = Barrier::new(threads);

        let results: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        store
                            .record_or_get(key, || {
                                calls.fetch_add(1, Ordering::SeqCst);
                                std::thread::sleep(std::time::Duration::from_millis(20));
                                true
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|&v| v));
        assert_eq!(store.snapshot().unwrap().count_mutant_dna, 1);
        assert!(store.gates.lock().is_empty());
    }

    #[test]
    fn test_gates_are_released() {
        let store = StatsStore::in_memory();
        store.record_or_get(fp(&["A"]), || false).unwrap();
        store.record_or_get(fp(&["C"]), || false).unwrap();
        assert!(store.gates.lock().is_empty());
    }

    #[test]
    fn test_panicking_classification_releases_gate() {
        let store = StatsStore::in_memory();
        let key = fp(&["AAAA", "CGTC", "TTTT", "GCAG"]);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.record_or_get(key, || panic!("scan fault"))
        }));
        assert!(outcome.is_err());
        assert!(store.gates.lock().is_empty());
        assert_eq!(store.lookup(&key).unwrap(), None);

        // the fingerprint is still undecided and can be recorded normally
        assert!(store.record_or_get(key, || true).unwrap());
        assert!(store.gates.lock().is_empty());
        assert_eq!(store.snapshot().unwrap().count_mutant_dna, 1);
    }

    struct DownBackend;

    impl RecordBackend for DownBackend {
        fn load(&self, _: &Fingerprint) -> Result<Option<bool>> {
            Err(MutantError::StorageUnavailable("connection refused".into()))
        }
        fn commit(&self, _: Fingerprint, _: bool) -> Result<()> {
            Err(MutantError::StorageUnavailable("connection refused".into()))
        }
        fn tally(&self) -> Result<Tally> {
            Err(MutantError::StorageUnavailable("connection refused".into()))
        }
        fn len(&self) -> Result<usize> {
            Err(MutantError::StorageUnavailable("connection refused".into()))
        }
        fn clear(&self) -> Result<()> {
            Err(MutantError::StorageUnavailable("connection refused".into()))
        }
    }

    #[test]
    fn test_unavailable_backend_never_computes() {
        let store = StatsStore::with_backend(DownBackend);
        let res = store.record_or_get(fp(&["A"]), || panic!("should not classify"));
        assert!(matches!(res, Err(MutantError::StorageUnavailable(_))));
        assert!(matches!(store.snapshot(), Err(MutantError::StorageUnavailable(_))));
    }
}
