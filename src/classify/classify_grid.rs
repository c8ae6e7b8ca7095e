// src/classify/classify_grid.rs

use super::scan::count_qualifying_runs;
use crate::grid::Grid;

/// Number of qualifying runs that make a grid mutant.
pub const MUTANT_THRESHOLD: usize = 2;

/// Mutant iff the grid holds at least `MUTANT_THRESHOLD` qualifying runs,
/// in any mix of directions.
///
/// The scan stops at the threshold, so an obviously mutant grid costs no
/// more than finding its first two runs. Stateless: safe to call from any
/// number of threads at once.
pub fn classify(grid: &Grid) -> bool {
    let runs = count_qualifying_runs(grid, MUTANT_THRESHOLD);
    log::debug!("{}x{} grid: {} qualifying run(s) before exit", grid.size(), grid.size(), runs);
    runs >= MUTANT_THRESHOLD
}
