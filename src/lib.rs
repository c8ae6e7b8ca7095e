// src/lib.rs
pub mod classify;
pub mod detector;
pub mod error;
pub mod fingerprint;
pub mod grid;
pub mod samples;
pub mod store;
pub mod types;

use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

pub use crate::classify::{classify, count_qualifying_runs, BatchReport, MIN_RUN_LEN, MUTANT_THRESHOLD};
pub use crate::detector::MutantDetector;
pub use crate::error::{MutantError, Result};
pub use crate::fingerprint::{fingerprint, Fingerprint};
pub use crate::grid::Grid;
pub use crate::store::{MemoryBackend, RecordBackend, StatsStore, Tally};
pub use crate::types::{Base, Sample, StatsSnapshot};

use crate::samples::read_samples;

/// Owned outcome of inspecting one or more sample files.
pub struct InspectionResults {
    /// Sample id and its verdict (or the reason it was rejected), in the
    /// order the samples appear across the input files
    pub outcomes: Vec<(String, Result<bool>)>,
    /// Stats of the detector after the run
    pub stats: StatsSnapshot,
}

impl InspectionResults {
    pub fn mutant_ids(&self) -> Vec<&str> {
        self.ids_where(|v| matches!(v, Ok(true)))
    }

    pub fn human_ids(&self) -> Vec<&str> {
        self.ids_where(|v| matches!(v, Ok(false)))
    }

    pub fn rejected(&self) -> Vec<(&str, &MutantError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, v)| v.as_ref().err().map(|e| (id.as_str(), e)))
            .collect()
    }

    fn ids_where(&self, keep: impl Fn(&Result<bool>) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, v)| keep(v))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// One line per sample in input order: `M\t<id>`, `H\t<id>` or
    /// `E\t<id>\t<reason>`. With `only_mutants`, only the `M` lines.
    pub fn get_output(&self, only_mutants: bool) -> String {
        let mut output = String::new();
        for (id, verdict) in &self.outcomes {
            match verdict {
                Ok(true) => {
                    let _ = writeln!(output, "M\t{}", id);
                }
                _ if only_mutants => {}
                Ok(false) => {
                    let _ = writeln!(output, "H\t{}", id);
                }
                Err(err) => {
                    let _ = writeln!(output, "E\t{}\t{}", id, err);
                }
            }
        }
        output
    }

    /// Human-readable stats summary.
    pub fn get_summary(&self) -> String {
        format!(
            "mutant: {}\thuman: {}\tratio: {:.4}",
            self.stats.count_mutant_dna, self.stats.count_human_dna, self.stats.ratio
        )
    }
}

/// Read every sample file and classify all samples through `detector`.
///
/// An unreadable file aborts the run; invalid samples are reported in
/// `outcomes` and do not.
pub fn inspect_files<B: RecordBackend>(
    detector: &MutantDetector<B>,
    paths: Vec<PathBuf>,
) -> Result<InspectionResults> {
    let mut all_samples = Vec::new();
    for path in paths {
        let samples = read_samples(&path)?;
        log::info!("read {} sample(s) from {}", samples.len(), path.display());
        all_samples.extend(samples);
    }

    let report = detector.inspect_batch(&all_samples);
    let outcomes = report
        .outcomes
        .into_iter()
        .map(|(s, verdict)| (s.id.clone(), verdict))
        .collect();

    Ok(InspectionResults {
        outcomes,
        stats: detector.stats()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_inspect_files_api() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        fs::write(
            &path,
            "h1\tATGC,CAGT,TTAT,AGAC\n\
             m1\tATGCGA,CAGTGC,TTATGT,AGAAGG,CCCCTA,TCACTG\n\
             m2\tatgcga,cagtgc,ttatgt,agaagg,ccccta,tcactg\n\
             bad\tATXC,CAGT,TTAT,AGAC\n",
        )
        .unwrap();

        let detector = MutantDetector::new();
        let results = inspect_files(&detector, vec![path]).unwrap();

        assert_eq!(results.mutant_ids(), vec!["m1", "m2"]);
        assert_eq!(results.human_ids(), vec!["h1"]);
        assert_eq!(results.rejected().len(), 1);
        assert_eq!(results.rejected()[0].0, "bad");
        // m1 and m2 are the same grid after normalization
        assert_eq!(results.stats, StatsSnapshot::from_counts(1, 1));

        // lines follow the file, not the verdict
        assert_eq!(
            results.get_output(false),
            "H\th1\nM\tm1\nM\tm2\nE\tbad\tinvalid nucleotide 'X' at row 0, column 2\n"
        );
        assert_eq!(results.get_output(true), "M\tm1\nM\tm2\n");
        assert_eq!(results.get_summary(), "mutant: 1\thuman: 1\tratio: 0.5000");
    }
}
