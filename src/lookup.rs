// SPDX-License-Identifier: Apache-2.0

//! Checked retrieval of circuits.
//!
//! [`CircuitDb::lookup`] validates a caller-supplied truth table and optional
//! operator and minimization sets, resolves defaults, and returns a freshly
//! decoded circuit. Every malformed query fails with the first constraint it
//! violates, in this order:
//!
//! 1. the truth table is a tuple;
//! 2. its entries are all bits, or all tuples of bits;
//! 3. its length is a power of two;
//! 4. tuple entries are non-empty and all of one length;
//! 5. the arity and then the coarity are present in the table;
//! 6. the operator set is a set of valid operators present for the arity;
//! 7. the minimization set is a set of valid operators present for the
//!    operator set.
//!
//! When no operator set is given, all operators are allowed. When no
//! minimization set is given, the smallest one stored for the operator set
//! is used.

use std::fmt;

use crate::circuit::Circuit;
use crate::db::CircuitDb;
use crate::operator::OperatorSet;
use crate::record::RecordError;
use crate::truth_table::TruthTable;
use crate::value::Value;

/// Broad classification of a [`LookupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An argument has the wrong shape of value altogether.
    Type,
    /// An argument is well-formed but describes something not supported.
    Value,
    /// The stored data is corrupt.
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    NotATuple,
    InvalidEntries,
    LengthNotPowerOfTwo,
    EmptyEntries,
    RaggedEntries,
    UnsupportedArity { arity: usize },
    UnsupportedCoarity { arity: usize, coarity: usize },
    OperatorsNotASet,
    InvalidOperators,
    UnsupportedOperators { arity: usize },
    MinimizeNotASet,
    InvalidMinimize,
    UnsupportedMinimize { arity: usize },
    Record(RecordError),
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::NotATuple
            | LookupError::InvalidEntries
            | LookupError::OperatorsNotASet
            | LookupError::MinimizeNotASet => ErrorKind::Type,
            LookupError::Record(_) => ErrorKind::Data,
            _ => ErrorKind::Value,
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotATuple => write!(f, "truth table must be a tuple"),
            LookupError::InvalidEntries => write!(
                f,
                "truth table must contain boolean values, integers in the range [0, 1], or tuples of such"
            ),
            LookupError::LengthNotPowerOfTwo => {
                write!(f, "truth table must have a length that is a power of two")
            }
            LookupError::EmptyEntries => write!(
                f,
                "truth table entries must each represent at least one value"
            ),
            LookupError::RaggedEntries => {
                write!(f, "truth table entries must all have the same length")
            }
            LookupError::UnsupportedArity { arity } => {
                write!(f, "no entries for functions of arity {}", arity)
            }
            LookupError::UnsupportedCoarity { arity, coarity } => write!(
                f,
                "no entries for functions of arity {} having output vectors of length {}",
                arity, coarity
            ),
            LookupError::OperatorsNotASet => {
                write!(f, "collection of operators must be a set or frozenset")
            }
            LookupError::InvalidOperators => write!(
                f,
                "collection of operators must only contain valid operators"
            ),
            LookupError::UnsupportedOperators { arity } => write!(
                f,
                "no entries for functions of arity {} that have only the specified operators",
                arity
            ),
            LookupError::MinimizeNotASet => write!(
                f,
                "collection of operators the number of which to minimize must be a set or frozenset"
            ),
            LookupError::InvalidMinimize => write!(
                f,
                "collection of operators the number of which to minimize must contain only valid operators"
            ),
            LookupError::UnsupportedMinimize { arity } => write!(
                f,
                "no entries for functions of arity {} for specified operators and minimization criteria",
                arity
            ),
            LookupError::Record(e) => write!(f, "corrupt circuit data: {}", e),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<RecordError> for LookupError {
    fn from(e: RecordError) -> Self {
        LookupError::Record(e)
    }
}

/// An operator-set argument that is either already typed or still raw.
#[derive(Clone, Copy)]
enum SetArg<'a> {
    Typed(&'a OperatorSet),
    Raw(&'a Value),
}

#[derive(Clone, Copy)]
enum SetRole {
    Operators,
    Minimize,
}

impl SetArg<'_> {
    fn resolve(self, role: SetRole) -> Result<OperatorSet, LookupError> {
        let (not_a_set, invalid) = match role {
            SetRole::Operators => (LookupError::OperatorsNotASet, LookupError::InvalidOperators),
            SetRole::Minimize => (LookupError::MinimizeNotASet, LookupError::InvalidMinimize),
        };
        let value = match self {
            SetArg::Typed(set) => {
                return if set.is_subset(&OperatorSet::every()) {
                    Ok(*set)
                } else {
                    Err(invalid)
                };
            }
            SetArg::Raw(value) => value,
        };
        let Value::Set(items) = value else {
            return Err(not_a_set);
        };
        items
            .iter()
            .map(|item| item.as_operator().ok_or_else(|| invalid.clone()))
            .collect()
    }
}

fn bits_of(values: &[Value]) -> Option<Vec<bool>> {
    values.iter().map(Value::as_bit).collect()
}

/// Checks the outer shape and entry types of a raw truth table.
fn truth_table_from_value(value: &Value) -> Result<TruthTable, LookupError> {
    let Value::Tuple(entries) = value else {
        return Err(LookupError::NotATuple);
    };
    let all_tuples = entries.iter().all(|e| matches!(e, Value::Tuple(_)));
    if all_tuples {
        let rows = entries
            .iter()
            .map(|e| match e {
                Value::Tuple(bits) => bits_of(bits),
                _ => None,
            })
            .collect::<Option<Vec<Vec<bool>>>>()
            .ok_or(LookupError::InvalidEntries)?;
        Ok(TruthTable::Vector(rows))
    } else {
        let bits = bits_of(entries).ok_or(LookupError::InvalidEntries)?;
        Ok(TruthTable::Scalar(bits))
    }
}

/// Derives `(arity, coarity)` and the normalized form of a truth table.
fn shape(truthtable: &TruthTable) -> Result<(usize, usize, TruthTable), LookupError> {
    let arity = match truthtable.arity() {
        Some(arity) if !truthtable.is_empty() => arity,
        _ => return Err(LookupError::LengthNotPowerOfTwo),
    };
    let coarity = match truthtable {
        TruthTable::Scalar(_) => 1,
        TruthTable::Vector(rows) => {
            let coarity = rows[0].len();
            if rows.iter().any(|r| r.len() != coarity) {
                return Err(LookupError::RaggedEntries);
            }
            if coarity == 0 {
                return Err(LookupError::EmptyEntries);
            }
            coarity
        }
    };
    Ok((arity, coarity, truthtable.clone().normalized()))
}

impl CircuitDb {
    /// Returns a smallest stored circuit implementing `truthtable`.
    ///
    /// `operators` restricts the gates circuits may use (all operators by
    /// default) and `minimize` selects which gates were counted when the
    /// circuit was chosen (by default the first stored criterion for the
    /// operator set). Both must be [`Value::Set`]s of operators.
    pub fn lookup(
        &self,
        truthtable: &Value,
        operators: Option<&Value>,
        minimize: Option<&Value>,
    ) -> Result<Circuit, LookupError> {
        let truthtable = truth_table_from_value(truthtable)?;
        self.resolve(
            &truthtable,
            operators.map(SetArg::Raw),
            minimize.map(SetArg::Raw),
        )
    }

    /// Typed form of [`CircuitDb::lookup`] for callers that already hold a
    /// [`TruthTable`] and [`OperatorSet`]s.
    pub fn lookup_truth_table(
        &self,
        truthtable: &TruthTable,
        operators: Option<&OperatorSet>,
        minimize: Option<&OperatorSet>,
    ) -> Result<Circuit, LookupError> {
        self.resolve(
            truthtable,
            operators.map(SetArg::Typed),
            minimize.map(SetArg::Typed),
        )
    }

    fn resolve(
        &self,
        truthtable: &TruthTable,
        operators: Option<SetArg<'_>>,
        minimize: Option<SetArg<'_>>,
    ) -> Result<Circuit, LookupError> {
        let (arity, coarity, truthtable) = shape(truthtable)?;

        let coarities = self
            .get(arity)
            .ok_or(LookupError::UnsupportedArity { arity })?;
        let operator_sets = coarities
            .get(&coarity)
            .ok_or(LookupError::UnsupportedCoarity { arity, coarity })?;

        let operators = match operators {
            None => OperatorSet::every(),
            Some(arg) => arg.resolve(SetRole::Operators)?,
        };
        let minimize_sets = operator_sets
            .get(&operators)
            .ok_or(LookupError::UnsupportedOperators { arity })?;

        let minimize = match minimize {
            None => *minimize_sets
                .first_key()
                .ok_or(LookupError::UnsupportedMinimize { arity })?,
            Some(arg) => arg.resolve(SetRole::Minimize)?,
        };
        let records = minimize_sets
            .get(&minimize)
            .ok_or(LookupError::UnsupportedMinimize { arity })?;

        log::trace!(
            "lookup {} -> arity={} coarity={} operators={} minimize={}",
            truthtable,
            arity,
            coarity,
            operators,
            minimize
        );
        Ok(records.get(&truthtable)?)
    }
}
