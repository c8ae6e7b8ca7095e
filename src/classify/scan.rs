// src/classify/scan.rs

use crate::grid::Grid;

/// Minimum number of identical consecutive letters that make a qualifying run.
pub const MIN_RUN_LEN: usize = 4;

/// The four line families a run can follow. Scanning visits them in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// left -> right along a row
    Horizontal,
    /// top -> bottom along a column
    Vertical,
    /// top-left -> bottom-right
    DiagonalDownRight,
    /// top-right -> bottom-left
    DiagonalDownLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDownRight,
        Direction::DiagonalDownLeft,
    ];

    /// Start cells of every line of this family, ordered top-to-bottom then
    /// left-to-right, skipping lines too short to ever hold a run.
    fn line_starts(self, n: usize) -> Vec<(usize, usize)> {
        if n < MIN_RUN_LEN {
            return Vec::new();
        }
        match self {
            Direction::Horizontal => (0..n).map(|r| (r, 0)).collect(),
            Direction::Vertical => (0..n).map(|c| (0, c)).collect(),
            Direction::DiagonalDownRight => {
                // top edge, then left edge below the corner
                let top = (0..n).map(|c| (0, c));
                let left = (1..n).map(|r| (r, 0));
                top.chain(left)
                    .filter(|&(r, c)| self.line_len(n, r, c) >= MIN_RUN_LEN)
                    .collect()
            }
            Direction::DiagonalDownLeft => {
                // top edge, then right edge below the corner
                let top = (0..n).map(|c| (0, c));
                let right = (1..n).map(|r| (r, n - 1));
                top.chain(right)
                    .filter(|&(r, c)| self.line_len(n, r, c) >= MIN_RUN_LEN)
                    .collect()
            }
        }
    }

    /// Number of cells on the line that starts at `(row, col)`.
    #[inline]
    fn line_len(self, n: usize, row: usize, col: usize) -> usize {
        match self {
            Direction::Horizontal => n - col,
            Direction::Vertical => n - row,
            Direction::DiagonalDownRight => n - row.max(col),
            Direction::DiagonalDownLeft => (n - row).min(col + 1),
        }
    }

    /// The `k`-th cell along the line that starts at `(row, col)`.
    #[inline]
    fn step(self, row: usize, col: usize, k: usize) -> (usize, usize) {
        match self {
            Direction::Horizontal => (row, col + k),
            Direction::Vertical => (row + k, col),
            Direction::DiagonalDownRight => (row + k, col + k),
            Direction::DiagonalDownLeft => (row + k, col - k),
        }
    }
}

/// Count qualifying runs in `grid`, stopping as soon as the count reaches
/// `early_exit_at`.
///
/// A run is counted once per maximal stretch of identical letters along one
/// line: when the stretch reaches `MIN_RUN_LEN` it is counted, and the cells
/// that extend it are skipped until the letter changes. Runs in different
/// directions through the same cells are counted independently.
///
/// The return value is `min(total_runs, early_exit_at)`. Pass `usize::MAX`
/// for an exact count.
pub fn count_qualifying_runs(grid: &Grid, early_exit_at: usize) -> usize {
    let mut found = 0usize;
    if found >= early_exit_at {
        return found;
    }

    let n = grid.size();
    for dir in Direction::ALL {
        for (row, col) in dir.line_starts(n) {
            if scan_line(grid, dir, row, col, &mut found, early_exit_at) {
                log::trace!("early exit after {found} runs ({dir:?} line at {row},{col})");
                return found;
            }
        }
    }
    found
}

/// Walk one line, bumping `found` for every run that reaches `MIN_RUN_LEN`.
/// Returns true once `found` has reached `early_exit_at`.
fn scan_line(
    grid: &Grid,
    dir: Direction,
    row: usize,
    col: usize,
    found: &mut usize,
    early_exit_at: usize,
) -> bool {
    let len = dir.line_len(grid.size(), row, col);
    let mut current = grid.at(row, col);
    let mut run_len = 1usize;

    for k in 1..len {
        // Not enough cells left to start a fresh run and no run in progress.
        if run_len == 1 && len - k < MIN_RUN_LEN - 1 {
            break;
        }
        let (r, c) = dir.step(row, col, k);
        let base = grid.at(r, c);
        if base == current {
            run_len += 1;
            if run_len == MIN_RUN_LEN {
                *found += 1;
                if *found >= early_exit_at {
                    return true;
                }
            }
        } else {
            current = base;
            run_len = 1;
        }
    }
    false
}
