// SPDX-License-Identifier: Apache-2.0

//! Truth tables of logical functions.
//!
//! A truth table lists the output of a function for every input row in
//! ascending order, where the first input is the most significant bit of the
//! row number. Functions with a single output use [`TruthTable::Scalar`];
//! functions with an output vector use [`TruthTable::Vector`] with one entry
//! per row.
//!
//! Truth tables index into dense per-function tables by concatenating every
//! output bit (rows in order, outputs within a row in order) and reading the
//! result as a binary number whose first bit is the most significant.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TruthTable {
    Scalar(Vec<bool>),
    Vector(Vec<Vec<bool>>),
}

impl TruthTable {
    /// Builds a single-output truth table from `0`/`1` values; any non-zero
    /// value is read as `1`.
    pub fn from_bits(bits: &[u8]) -> Self {
        TruthTable::Scalar(bits.iter().map(|&b| b != 0).collect())
    }

    /// Builds a vector-output truth table from rows of `0`/`1` values.
    pub fn from_bit_rows(rows: &[&[u8]]) -> Self {
        TruthTable::Vector(
            rows.iter()
                .map(|row| row.iter().map(|&b| b != 0).collect())
                .collect(),
        )
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            TruthTable::Scalar(bits) => bits.len(),
            TruthTable::Vector(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of inputs, or `None` if the row count is not a power of two.
    pub fn arity(&self) -> Option<usize> {
        let len = self.len();
        if len.is_power_of_two() {
            Some(len.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Number of outputs, as given by the first row.
    pub fn coarity(&self) -> usize {
        match self {
            TruthTable::Scalar(_) => 1,
            TruthTable::Vector(rows) => rows.first().map_or(0, |r| r.len()),
        }
    }

    /// Collapses a vector table whose rows all hold one value into a scalar
    /// table.
    pub fn normalized(self) -> Self {
        match self {
            TruthTable::Vector(rows) if !rows.is_empty() && rows.iter().all(|r| r.len() == 1) => {
                TruthTable::Scalar(rows.into_iter().map(|r| r[0]).collect())
            }
            other => other,
        }
    }

    /// Iterates over all output bits, rows in order.
    pub fn bits(&self) -> Box<dyn Iterator<Item = bool> + '_> {
        match self {
            TruthTable::Scalar(bits) => Box::new(bits.iter().copied()),
            TruthTable::Vector(rows) => Box::new(rows.iter().flatten().copied()),
        }
    }

    /// Packs every output bit into an index, first bit most significant.
    ///
    /// Returns `None` if the table holds more bits than an index can.
    pub fn index(&self) -> Option<usize> {
        let mut count = 0u32;
        let mut index = 0usize;
        for bit in self.bits() {
            count += 1;
            if count >= usize::BITS {
                return None;
            }
            index = (index << 1) | (bit as usize);
        }
        Some(index)
    }

    /// Inverse of [`TruthTable::index`] for a table of the given shape.
    pub fn from_index(index: usize, arity: usize, coarity: usize) -> Self {
        let rows = 1usize << arity;
        let total = rows * coarity;
        let bit = |i: usize| (index >> (total - 1 - i)) & 1 != 0;
        if coarity == 1 {
            TruthTable::Scalar((0..rows).map(bit).collect())
        } else {
            TruthTable::Vector(
                (0..rows)
                    .map(|r| (0..coarity).map(|c| bit(r * coarity + c)).collect())
                    .collect(),
            )
        }
    }
}

fn fmt_tuple<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    if items.len() == 1 {
        write!(f, ",")?;
    }
    write!(f, ")")
}

struct Bit(bool);

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as u8)
    }
}

struct Row<'a>(&'a [bool]);

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: Vec<Bit> = self.0.iter().map(|&b| Bit(b)).collect();
        fmt_tuple(f, &bits)
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruthTable::Scalar(bits) => Row(bits).fmt(f),
            TruthTable::Vector(rows) => {
                let rows: Vec<Row> = rows.iter().map(|r| Row(r)).collect();
                fmt_tuple(f, &rows)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_msb_first() {
        assert_eq!(TruthTable::from_bits(&[0, 0, 0, 1]).index(), Some(1));
        assert_eq!(TruthTable::from_bits(&[1, 0, 0, 0]).index(), Some(8));
        assert_eq!(
            TruthTable::from_bits(&[0, 0, 1, 0, 0, 0, 0, 1]).index(),
            Some(0b0010_0001)
        );
        assert_eq!(
            TruthTable::from_bit_rows(&[&[1, 0], &[1, 0], &[1, 0], &[0, 1]]).index(),
            Some(0b1010_1001)
        );
    }

    #[test]
    fn test_index_too_wide() {
        let tt = TruthTable::Scalar(vec![false; 64]);
        assert_eq!(tt.index(), None);
    }

    #[test]
    fn test_from_index_inverts_index() {
        for index in 0..256 {
            let tt = TruthTable::from_index(index, 3, 1);
            assert_eq!(tt.index(), Some(index));
            let tt = TruthTable::from_index(index, 2, 2);
            assert_eq!(tt.index(), Some(index));
            assert_eq!(tt.coarity(), 2);
        }
    }

    #[test]
    fn test_arity_and_coarity() {
        assert_eq!(TruthTable::from_bits(&[0, 1]).arity(), Some(1));
        assert_eq!(TruthTable::from_bits(&[1]).arity(), Some(0));
        assert_eq!(TruthTable::from_bits(&[0, 1, 1]).arity(), None);
        assert_eq!(TruthTable::from_bits(&[]).arity(), None);
        assert_eq!(
            TruthTable::from_bit_rows(&[&[0, 0, 1], &[1, 1, 0]]).coarity(),
            3
        );
    }

    #[test]
    fn test_normalized_collapses_singleton_rows() {
        let tt = TruthTable::from_bit_rows(&[&[0], &[1]]).normalized();
        assert_eq!(tt, TruthTable::from_bits(&[0, 1]));
        let tt = TruthTable::from_bit_rows(&[&[0, 1], &[1, 1]]);
        assert_eq!(tt.clone().normalized(), tt);
    }

    #[test]
    fn test_display() {
        assert_eq!(TruthTable::from_bits(&[0, 1]).to_string(), "(0, 1)");
        assert_eq!(TruthTable::from_bits(&[1]).to_string(), "(1,)");
        assert_eq!(
            TruthTable::from_bit_rows(&[&[0, 1], &[1, 0]]).to_string(),
            "((0, 1), (1, 0))"
        );
    }
}
