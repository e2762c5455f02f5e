// SPDX-License-Identifier: Apache-2.0

//! A lookup table of minimal Boolean circuits.
//!
//! For every function of small arity and coarity the table stores a circuit
//! of the fewest gates, for a few choices of the operators circuits may use
//! and of which gates are counted when minimizing.
//!
//! ```
//! use circuitdb::{lookup, Value};
//!
//! let truthtable: Value = "(0, 0, 1, 0, 0, 0, 0, 1)".parse().unwrap();
//! let circuit = lookup(&truthtable, None, None).unwrap();
//! assert_eq!(
//!     circuit.to_string(),
//!     "(('id',), ('id',), ('id',), ('xor', 0, 2), ('nimp', 1, 3), ('id', 4))"
//! );
//!
//! let operators: Value = "{id, not, and, xor}".parse().unwrap();
//! let minimize: Value = "{and}".parse().unwrap();
//! let circuit = lookup(&truthtable, Some(&operators), Some(&minimize)).unwrap();
//! assert_eq!(
//!     circuit.to_string(),
//!     "(('id',), ('id',), ('id',), ('not', 0), ('xor', 2, 3), ('and', 1, 4), ('id', 5))"
//! );
//! ```

pub mod circuit;
pub mod db;
pub mod lookup;
pub mod operator;
mod payload;
pub mod record;
pub mod records;
pub mod truth_table;
pub mod value;

pub use circuit::{Circuit, CircuitBuilder, CircuitError, Gate, GateRef, LegibleGate};
pub use db::{CircuitDb, CircuitDbBuilder, Combination};
pub use lookup::{ErrorKind, LookupError};
pub use operator::{Operator, OperatorSet};
pub use record::{GateSpec, Record, RecordError};
pub use records::{LoadError, Records};
pub use truth_table::TruthTable;
pub use value::{ParseError, Value};

/// Looks up a circuit in the embedded table.
///
/// See [`CircuitDb::lookup`].
pub fn lookup(
    truthtable: &Value,
    operators: Option<&Value>,
    minimize: Option<&Value>,
) -> Result<Circuit, LookupError> {
    CircuitDb::load_default().lookup(truthtable, operators, minimize)
}
