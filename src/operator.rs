// SPDX-License-Identifier: Apache-2.0

//! Nullary, unary and binary Boolean operators.
//!
//! An operator is identified by its output column: the tuple of outputs it
//! produces over its input rows in ascending order. For a binary operator the
//! output for inputs `(x, y)` is at position `2*x + y`; for a unary operator
//! the output for `x` is at position `x`; a nullary operator has a single
//! output.
//!
//! The canonical order of operators is the lexicographic order of their
//! output columns (a column that is a prefix of another sorts first). The
//! position of an operator in this order is the byte used to encode it in a
//! [`crate::record::Record`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Operator {
    /// Nullary false, `(0,)`.
    Nf = 0,
    /// Unary false, `(0, 0)`.
    Uf,
    /// Binary false, `(0, 0, 0, 0)`.
    Bf,
    And,
    /// `x and not y`.
    Nimp,
    /// First argument.
    Fst,
    Id,
    /// `not x and y`.
    Nif,
    /// Second argument.
    Snd,
    Xor,
    Or,
    /// Nullary true, `(1,)`.
    Nt,
    Not,
    Nor,
    Xnor,
    /// Negated second argument.
    Nsnd,
    /// `x or not y`.
    If,
    /// Unary true, `(1, 1)`.
    Ut,
    /// Negated first argument.
    Nfst,
    /// `not x or y`.
    Imp,
    Nand,
    /// Binary true, `(1, 1, 1, 1)`.
    Bt,
}

pub const OPERATOR_COUNT: usize = 22;

impl Operator {
    /// All operators in canonical order.
    pub const ALL: [Operator; OPERATOR_COUNT] = [
        Operator::Nf,
        Operator::Uf,
        Operator::Bf,
        Operator::And,
        Operator::Nimp,
        Operator::Fst,
        Operator::Id,
        Operator::Nif,
        Operator::Snd,
        Operator::Xor,
        Operator::Or,
        Operator::Nt,
        Operator::Not,
        Operator::Nor,
        Operator::Xnor,
        Operator::Nsnd,
        Operator::If,
        Operator::Ut,
        Operator::Nfst,
        Operator::Imp,
        Operator::Nand,
        Operator::Bt,
    ];

    /// Position of this operator in the canonical order.
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Operator> {
        Self::ALL.get(index as usize).copied()
    }

    pub const fn arity(self) -> usize {
        match self {
            Operator::Nf | Operator::Nt => 0,
            Operator::Uf | Operator::Id | Operator::Not | Operator::Ut => 1,
            _ => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operator::Nf => "nf",
            Operator::Uf => "uf",
            Operator::Bf => "bf",
            Operator::And => "and",
            Operator::Nimp => "nimp",
            Operator::Fst => "fst",
            Operator::Id => "id",
            Operator::Nif => "nif",
            Operator::Snd => "snd",
            Operator::Xor => "xor",
            Operator::Or => "or",
            Operator::Nt => "nt",
            Operator::Not => "not",
            Operator::Nor => "nor",
            Operator::Xnor => "xnor",
            Operator::Nsnd => "nsnd",
            Operator::If => "if",
            Operator::Ut => "ut",
            Operator::Nfst => "nfst",
            Operator::Imp => "imp",
            Operator::Nand => "nand",
            Operator::Bt => "bt",
        }
    }

    pub fn from_name(name: &str) -> Option<Operator> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Returns the output column of this operator.
    pub fn column(self) -> &'static [bool] {
        const F: bool = false;
        const T: bool = true;
        match self {
            Operator::Nf => &[F],
            Operator::Uf => &[F, F],
            Operator::Bf => &[F, F, F, F],
            Operator::And => &[F, F, F, T],
            Operator::Nimp => &[F, F, T, F],
            Operator::Fst => &[F, F, T, T],
            Operator::Id => &[F, T],
            Operator::Nif => &[F, T, F, F],
            Operator::Snd => &[F, T, F, T],
            Operator::Xor => &[F, T, T, F],
            Operator::Or => &[F, T, T, T],
            Operator::Nt => &[T],
            Operator::Not => &[T, F],
            Operator::Nor => &[T, F, F, F],
            Operator::Xnor => &[T, F, F, T],
            Operator::Nsnd => &[T, F, T, F],
            Operator::If => &[T, F, T, T],
            Operator::Ut => &[T, T],
            Operator::Nfst => &[T, T, F, F],
            Operator::Imp => &[T, T, F, T],
            Operator::Nand => &[T, T, T, F],
            Operator::Bt => &[T, T, T, T],
        }
    }

    /// Finds the operator with the given output column, if any.
    pub fn from_column(column: &[bool]) -> Option<Operator> {
        Self::ALL.iter().copied().find(|op| op.column() == column)
    }

    /// Applies this operator to `args`, which must hold exactly `arity()`
    /// values.
    pub fn apply(self, args: &[bool]) -> bool {
        debug_assert_eq!(args.len(), self.arity());
        let row = args
            .iter()
            .fold(0usize, |acc, &bit| (acc << 1) | (bit as usize));
        self.column()[row]
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A set of operators, usable as a map key.
///
/// Iteration yields members in canonical order. Sets are ordered by
/// comparing their canonical member sequences lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OperatorSet {
    mask: u32,
}

impl OperatorSet {
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    /// The universal set of all operators.
    pub const fn every() -> Self {
        Self {
            mask: (1u32 << OPERATOR_COUNT) - 1,
        }
    }

    /// Builds a set from a list of operators.
    pub const fn of(ops: &[Operator]) -> Self {
        let mut mask = 0u32;
        let mut i = 0;
        while i < ops.len() {
            mask |= 1 << ops[i].index();
            i += 1;
        }
        Self { mask }
    }

    /// `{id, not, and, or}`
    pub const fn id_not_and_or() -> Self {
        Self::of(&[Operator::Id, Operator::Not, Operator::And, Operator::Or])
    }

    /// `{id, not, and, xor}`
    pub const fn id_not_and_xor() -> Self {
        Self::of(&[Operator::Id, Operator::Not, Operator::And, Operator::Xor])
    }

    pub fn insert(&mut self, op: Operator) {
        self.mask |= 1 << op.index();
    }

    pub fn contains(&self, op: Operator) -> bool {
        (self.mask >> op.index()) & 1 != 0
    }

    pub fn is_subset(&self, other: &OperatorSet) -> bool {
        self.mask & !other.mask == 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Operator> + '_ {
        Operator::ALL
            .iter()
            .copied()
            .filter(move |op| self.contains(*op))
    }

    /// Short name used in payload file names, e.g. `every` or
    /// `id-not-and-or`.
    pub fn tag(&self) -> String {
        if *self == Self::every() {
            return "every".to_string();
        }
        // Listed in the order the payload files were originally named with.
        const TAG_ORDER: [Operator; 4] = [Operator::Id, Operator::Not, Operator::And, Operator::Or];
        let mut names: Vec<&str> = TAG_ORDER
            .iter()
            .filter(|op| self.contains(**op))
            .map(|op| op.name())
            .collect();
        names.extend(
            self.iter()
                .filter(|op| !TAG_ORDER.contains(op))
                .map(|op| op.name()),
        );
        names.join("-")
    }
}

impl FromIterator<Operator> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = Operator>>(iter: I) -> Self {
        let mut set = OperatorSet::empty();
        for op in iter {
            set.insert(op);
        }
        set
    }
}

impl Ord for OperatorSet {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl PartialOrd for OperatorSet {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OperatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::every() {
            return write!(f, "every");
        }
        let names: Vec<&str> = self.iter().map(|op| op.name()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
