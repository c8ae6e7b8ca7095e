use rayon::prelude::*;

use crate::error::{MutantError, Result};
use crate::types::Sample;

/// Outcome of inspecting many samples at once: one verdict per sample, in
/// the order the samples had in the input slice.
#[derive(Debug, Default)]
pub struct BatchReport<'a> {
    pub outcomes: Vec<(&'a Sample, Result<bool>)>,
}

impl<'a> BatchReport<'a> {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Samples classified as mutant, in input order.
    pub fn mutant(&self) -> impl Iterator<Item = &'a Sample> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, v)| matches!(v, Ok(true)))
            .map(|(s, _)| *s)
    }

    /// Samples classified as human, in input order.
    pub fn human(&self) -> impl Iterator<Item = &'a Sample> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, v)| matches!(v, Ok(false)))
            .map(|(s, _)| *s)
    }

    /// Samples that could not be classified, with the reason.
    pub fn rejected(&self) -> impl Iterator<Item = (&'a Sample, &MutantError)> + '_ {
        self.outcomes.iter().filter_map(|(s, v)| match v {
            Err(e) => Some((*s, e)),
            Ok(_) => None,
        })
    }

    /// `(mutant, human, rejected)` counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.outcomes
            .iter()
            .fold((0, 0, 0), |(m, h, r), (_, v)| match v {
                Ok(true) => (m + 1, h, r),
                Ok(false) => (m, h + 1, r),
                Err(_) => (m, h, r + 1),
            })
    }
}

/// Parallel inspection of multiple samples at once.
///
/// `inspect` is called once per sample from the rayon pool, so it must be
/// safe to share across threads. `collect` on the indexed iterator keeps
/// the outcomes in input order.
pub fn inspect_parallel<'a, F>(samples: &'a [Sample], inspect: F) -> BatchReport<'a>
where
    F: Fn(&[String]) -> Result<bool> + Sync,
{
    let outcomes = samples
        .par_iter()
        .map(|sample| {
            let verdict = inspect(&sample.rows);
            if let Err(e) = &verdict {
                log::debug!("sample {} rejected: {}", sample.id, e);
            }
            (sample, verdict)
        })
        .collect();
    BatchReport { outcomes }
}
