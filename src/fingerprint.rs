//src/fingerprint.rs

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::grid::Grid;

/// Length of a fingerprint in bytes.
pub const FINGERPRINT_LEN: usize = 32;

/// Terminates every row before hashing so that row boundaries are part of the digest.
const ROW_TERMINATOR: u8 = b'\n';

/// SHA-256 content address of a normalized grid. This is the dedup key of the stats store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Fingerprint(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Hash the normalized rows of `grid`, in order, each followed by a newline.
///
/// Because a `Grid` is already uppercase and validated, the digest depends
/// only on letter content and row order, never on how the grid was received.
pub fn fingerprint(grid: &Grid) -> Fingerprint {
    let mut hasher = Sha256::new();
    let mut line = Vec::with_capacity(grid.size() + 1);
    for row in grid.rows() {
        line.clear();
        line.extend(row.iter().map(|b| b.as_byte()));
        line.push(ROW_TERMINATOR);
        hasher.update(&line);
    }
    Fingerprint(hasher.finalize().into())
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Fingerprint(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_same_content_same_fingerprint() {
        let a = grid(&["ATGC", "CAGT", "TTAT", "AGAC"]);
        let b = grid(&["atgc", "cagt", "ttat", "agac"]);
        let c: Grid = "ATGC,CAGT,TTAT,AGAC".parse().unwrap();
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a), fingerprint(&c));
    }

    #[test]
    fn test_row_order_matters() {
        let a = grid(&["ATGC", "CAGT", "TTAT", "AGAC"]);
        let b = grid(&["CAGT", "ATGC", "TTAT", "AGAC"]);
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_single_letter_change_matters() {
        let a = grid(&["ATGC", "CAGT", "TTAT", "AGAC"]);
        let b = grid(&["ATGC", "CAGT", "TTAT", "AGAG"]);
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_known_digest() {
        // sha256("ATGC\nCAGT\nTTAT\nAGAC\n")
        let fp = fingerprint(&grid(&["ATGC", "CAGT", "TTAT", "AGAC"]));
        assert_eq!(
            fp.to_hex(),
            "5f411838bf7d2a59b4fdfa32d4ec83cd04b161f20a892cfdfb8804b7ce52d5f7"
        );
    }

    #[test]
    fn test_hex_roundtrip() {
        let fp = fingerprint(&grid(&["ATGC", "CAGT", "TTAT", "AGAC"]));
        let parsed: Fingerprint = fp.to_hex().parse().unwrap();
        assert_eq!(parsed, fp);
        assert!("zz".parse::<Fingerprint>().is_err());
    }
}
