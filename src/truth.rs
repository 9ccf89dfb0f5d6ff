//! Truth tables and the canonical enumeration of input assignments.
//!
//! Rows are 1-based. Row `j` corresponds to the binary number `j - 1`, and input
//! `x_e` of that row is bit `e - 1` of it. For three inputs:
//!
//! ```text
//! x1 | 0 1 0 1 0 1 0 1
//! x2 | 0 0 1 1 0 0 1 1
//! x3 | 0 0 0 0 1 1 1 1
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Error, Result};

/// The `2^n x n` matrix of input assignments.
///
/// Generated as the lexicographic Cartesian product `{0,1}^n` with the columns
/// reversed afterwards, so that `x1` is the fastest-varying input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InputMatrix {
    num_inputs: usize,
    rows: Vec<Box<[bool]>>,
}

impl InputMatrix {
    pub fn new(num_inputs: usize) -> Self {
        assert!(num_inputs >= 1, "Number of inputs must be >= 1");
        assert!(num_inputs < usize::BITS as usize, "Too many inputs");

        let rows = (0..1usize << num_inputs)
            .map(|index| {
                // Lexicographic row, most significant input first...
                let mut row: Vec<bool> = (0..num_inputs).rev().map(|bit| (index >> bit) & 1 == 1).collect();
                // ...then column-reversed.
                row.reverse();
                row.into_boxed_slice()
            })
            .collect();

        Self { num_inputs, rows }
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Row `j` (1-based).
    pub fn row(&self, j: usize) -> &[bool] {
        &self.rows[j - 1]
    }

    /// Value of input `e` in row `j` (both 1-based).
    pub fn get(&self, j: usize, e: usize) -> bool {
        self.rows[j - 1][e - 1]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.rows.iter().map(|row| &row[..])
    }
}

/// Target function given as the sequence of its outputs over all rows.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruthTable {
    bits: Vec<bool>,
    num_inputs: usize,
}

impl TruthTable {
    /// Creates a truth table, validating that its length is a power of two.
    pub fn new(bits: Vec<bool>) -> Result<Self> {
        let len = bits.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(Error::TruthTableLength(len));
        }
        let num_inputs = len.trailing_zeros() as usize;
        Ok(Self { bits, num_inputs })
    }

    /// Table of a simulated circuit; `bits` has one entry per row of an [`InputMatrix`].
    pub(crate) fn from_simulation(bits: Vec<bool>) -> Self {
        debug_assert!(bits.len() >= 2 && bits.len().is_power_of_two());
        let num_inputs = bits.len().trailing_zeros() as usize;
        Self { bits, num_inputs }
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_rows(&self) -> usize {
        self.bits.len()
    }

    /// Required output for row `j` (1-based).
    pub fn output(&self, j: usize) -> bool {
        self.bits[j - 1]
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn inputs(&self) -> InputMatrix {
        InputMatrix::new(self.num_inputs)
    }
}

impl FromStr for TruthTable {
    type Err = Error;

    /// Parses a string of `0`/`1` characters, ignoring whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let mut bits = Vec::with_capacity(s.len());
        for (pos, ch) in s.chars().enumerate() {
            match ch {
                '0' => bits.push(false),
                '1' => bits.push(true),
                c if c.is_whitespace() => {}
                c => return Err(Error::TruthTableChar { ch: c, pos }),
            }
        }
        TruthTable::new(bits)
    }
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for &bit in self.bits.iter() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_matrix_three_inputs() {
        let matrix = InputMatrix::new(3);
        assert_eq!(matrix.num_rows(), 8);
        let x1: Vec<bool> = (1..=8).map(|j| matrix.get(j, 1)).collect();
        let x2: Vec<bool> = (1..=8).map(|j| matrix.get(j, 2)).collect();
        let x3: Vec<bool> = (1..=8).map(|j| matrix.get(j, 3)).collect();
        let bits = |s: &str| s.chars().map(|c| c == '1').collect::<Vec<_>>();
        assert_eq!(x1, bits("01010101"));
        assert_eq!(x2, bits("00110011"));
        assert_eq!(x3, bits("00001111"));
    }

    #[test]
    fn test_matrix_rows_are_distinct() {
        let matrix = InputMatrix::new(4);
        let mut rows: Vec<&[bool]> = matrix.rows().collect();
        rows.sort();
        rows.dedup();
        assert_eq!(rows.len(), 16);
    }

    #[test]
    fn test_parse_truth() {
        let table: TruthTable = "0101 0011".parse().unwrap();
        assert_eq!(table.num_inputs(), 3);
        assert_eq!(table.num_rows(), 8);
        assert!(!table.output(1));
        assert!(table.output(2));
        assert!(table.output(8));
        assert_eq!(table.to_string(), "01010011");
    }

    #[test]
    fn test_length_not_power_of_two() {
        assert!(matches!("010".parse::<TruthTable>(), Err(Error::TruthTableLength(3))));
        assert!(matches!("010100".parse::<TruthTable>(), Err(Error::TruthTableLength(6))));
        assert!(matches!("1".parse::<TruthTable>(), Err(Error::TruthTableLength(1))));
        assert!(matches!("".parse::<TruthTable>(), Err(Error::TruthTableLength(0))));
    }

    #[test]
    fn test_invalid_character() {
        match "01x1".parse::<TruthTable>() {
            Err(Error::TruthTableChar { ch, pos }) => {
                assert_eq!(ch, 'x');
                assert_eq!(pos, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
