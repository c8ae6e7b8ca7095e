//src/types.rs

use serde::Serialize;

/// A single nucleotide letter. Only the four canonical bases are accepted;
/// lowercase input is folded to uppercase before it gets here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Base {
    A = b'A',
    C = b'C',
    G = b'G',
    T = b'T',
}

impl Base {
    /// Parse one letter, case-insensitively.
    #[inline]
    pub fn from_char(c: char) -> Option<Base> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' => Some(Base::T),
            _ => None,
        }
    }

    #[inline]
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn as_char(self) -> char {
        self.as_byte() as char
    }
}

/// Point-in-time aggregate over all recorded classifications.
///
/// Field names follow the wire names used by the stats endpoint:
///  count_mutant_dna  count_human_dna  ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub count_mutant_dna: u64,
    pub count_human_dna: u64,
    /// `count_mutant_dna / (count_mutant_dna + count_human_dna)`, or 0 when empty.
    pub ratio: f64,
}

impl StatsSnapshot {
    pub fn from_counts(count_mutant_dna: u64, count_human_dna: u64) -> Self {
        let total = count_mutant_dna + count_human_dna;
        let ratio = if total == 0 {
            0.0
        } else {
            count_mutant_dna as f64 / total as f64
        };
        Self {
            count_mutant_dna,
            count_human_dna,
            ratio,
        }
    }

    /// Number of distinct samples seen.
    pub fn total(&self) -> u64 {
        self.count_mutant_dna + self.count_human_dna
    }
}

/// A minimal representation of one submitted sample, as read from a sample file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub id: String,
    pub rows: Vec<String>,
}
