//src/grid.rs

use std::fmt;
use std::str::FromStr;

use crate::error::{MutantError, Result};
use crate::types::Base;

/// A validated, normalized N×N matrix of nucleotides.
///
/// Cells are stored row-major in one flat buffer. Construction is the only
/// place where shape and alphabet are checked, so every `Grid` in existence
/// is square, non-empty and made of uppercase A/C/G/T.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    n: usize,
    cells: Vec<Base>,
}

impl Grid {
    /// Build a grid from an ordered sequence of rows.
    ///
    /// Shape is checked before the alphabet: a ragged grid is always
    /// `InvalidShape`, even when it also contains foreign letters.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Grid> {
        let n = rows.len();
        if n == 0 {
            return Err(MutantError::InvalidShape("DNA sequence cannot be empty".into()));
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let len = row.as_ref().chars().count();
            if len != n {
                return Err(MutantError::InvalidShape(format!(
                    "DNA must be NxN matrix: row {row_idx} has {len} letters, expected {n}"
                )));
            }
        }

        let mut cells = Vec::with_capacity(n * n);
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, c) in row.as_ref().chars().enumerate() {
                match Base::from_char(c) {
                    Some(base) => cells.push(base),
                    None => {
                        return Err(MutantError::InvalidAlphabet {
                            row: row_idx,
                            col: col_idx,
                            found: c,
                        })
                    }
                }
            }
        }

        Ok(Grid { n, cells })
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// The base at `(row, col)`. Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> Base {
        self.cells[row * self.n + col]
    }

    /// One row as a slice of bases.
    pub fn row(&self, row: usize) -> &[Base] {
        &self.cells[row * self.n..(row + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Base]> {
        self.cells.chunks(self.n)
    }

    /// The normalized rows as strings.
    pub fn to_rows(&self) -> Vec<String> {
        self.rows()
            .map(|r| r.iter().map(|b| b.as_char()).collect())
            .collect()
    }
}

/// Parses a grid received as one joined string, rows separated by commas
/// and/or whitespace, e.g. `"ATGC,CAGT,TTAT,AGAC"`.
impl FromStr for Grid {
    type Err = MutantError;

    fn from_str(s: &str) -> Result<Grid> {
        let rows: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|r| !r.is_empty())
            .collect();
        Grid::from_rows(&rows)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            for b in row {
                write!(f, "{}", b.as_char())?;
            }
        }
        Ok(())
    }
}
