// SPDX-License-Identifier: Apache-2.0

//! Compact byte encoding of a circuit's non-input gates.
//!
//! Each non-input gate contributes one byte holding the canonical index of
//! its operator (see [`crate::operator`]) followed by one byte per operand
//! holding the position of the referenced gate in the full gate list. Inputs
//! occupy positions `0..arity`. Nothing delimits gates: the arity of each
//! operator determines how many operand bytes follow it.
//!
//! Since references are single bytes, an encoded circuit may hold at most
//! 256 gates in total.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::circuit::{Circuit, CircuitBuilder, CircuitError, GateRef};
use crate::operator::Operator;
use crate::truth_table::TruthTable;

pub const MAX_GATES: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    TooManyGates {
        count: usize,
    },
    Base64(base64::DecodeError),
    UnknownOperator {
        offset: usize,
        byte: u8,
    },
    TruncatedOperands {
        offset: usize,
        operator: Operator,
    },
    MissingOutputs {
        gate_specs: usize,
        coarity: usize,
    },
    Circuit(CircuitError),
    /// A truth table whose row count is not a power of two.
    BadShape {
        rows: usize,
    },
    /// No record is stored at `index`.
    MissingEntry {
        index: Option<usize>,
        len: usize,
    },
    /// Bulk framing cannot store a record byte of 255.
    Unframeable {
        record: usize,
        offset: usize,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::TooManyGates { count } => write!(
                f,
                "circuit has {} gates; at most {} can be encoded",
                count, MAX_GATES
            ),
            RecordError::Base64(e) => write!(f, "invalid base64 record: {}", e),
            RecordError::UnknownOperator { offset, byte } => {
                write!(f, "unknown operator byte {} at offset {}", byte, offset)
            }
            RecordError::TruncatedOperands { offset, operator } => write!(
                f,
                "record ends inside the operands of {} at offset {}",
                operator, offset
            ),
            RecordError::MissingOutputs {
                gate_specs,
                coarity,
            } => write!(
                f,
                "record holds {} gates but the function has {} outputs",
                gate_specs, coarity
            ),
            RecordError::Circuit(e) => write!(f, "malformed record: {}", e),
            RecordError::BadShape { rows } => write!(
                f,
                "a truth table with {} rows does not describe a function",
                rows
            ),
            RecordError::MissingEntry {
                index: Some(index),
                len,
            } => write!(f, "no record at index {} of {}", index, len),
            RecordError::MissingEntry { index: None, len } => {
                write!(f, "truth table is too wide to index {} records", len)
            }
            RecordError::Unframeable { record, offset } => write!(
                f,
                "record {} holds byte 255 at offset {}, which bulk files cannot store",
                record, offset
            ),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<CircuitError> for RecordError {
    fn from(e: CircuitError) -> Self {
        RecordError::Circuit(e)
    }
}

impl From<base64::DecodeError> for RecordError {
    fn from(e: base64::DecodeError) -> Self {
        RecordError::Base64(e)
    }
}

/// One decoded gate: operator and operand positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSpec {
    pub operator: Operator,
    pub inputs: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record(Vec<u8>);

impl Record {
    /// Encodes `circuit`, which may hold at most [`MAX_GATES`] gates.
    pub fn from_circuit(circuit: &Circuit) -> Result<Record, RecordError> {
        if circuit.len() > MAX_GATES {
            return Err(RecordError::TooManyGates {
                count: circuit.len(),
            });
        }
        let mut bytes = Vec::new();
        for gate in circuit.gates().iter().filter(|g| !g.is_input) {
            bytes.push(gate.operator.index());
            // Positions are below MAX_GATES, checked above.
            bytes.extend(gate.inputs.iter().map(|r| r.id as u8));
        }
        Ok(Record(bytes))
    }

    pub fn from_base64(s: &str) -> Result<Record, RecordError> {
        Ok(Record(STANDARD.decode(s)?))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits the byte stream into gate specs using each operator's arity.
    pub fn gate_specs(&self) -> Result<Vec<GateSpec>, RecordError> {
        let mut specs = Vec::new();
        let mut offset = 0;
        while offset < self.0.len() {
            let byte = self.0[offset];
            let operator =
                Operator::from_index(byte).ok_or(RecordError::UnknownOperator { offset, byte })?;
            let start = offset + 1;
            let end = start + operator.arity();
            let operands = self
                .0
                .get(start..end)
                .ok_or(RecordError::TruncatedOperands { offset, operator })?;
            specs.push(GateSpec {
                operator,
                inputs: operands.iter().map(|&b| b as usize).collect(),
            });
            offset = end;
        }
        Ok(specs)
    }

    /// Decodes this record into a circuit with `arity` inputs whose last
    /// `coarity` gates are outputs.
    pub fn decode(&self, arity: usize, coarity: usize) -> Result<Circuit, RecordError> {
        let specs = self.gate_specs()?;
        if specs.len() < coarity {
            return Err(RecordError::MissingOutputs {
                gate_specs: specs.len(),
                coarity,
            });
        }
        let internal_count = specs.len() - coarity;

        let mut builder = CircuitBuilder::new();
        // Gates that later gates may refer to: inputs and internal gates.
        let mut referable: Vec<GateRef> = Vec::with_capacity(arity + internal_count);
        for _ in 0..arity {
            referable.push(builder.add_input()?);
        }
        for (i, spec) in specs.iter().enumerate() {
            let inputs = spec
                .inputs
                .iter()
                .map(|&position| {
                    referable
                        .get(position)
                        .copied()
                        .ok_or(CircuitError::DanglingReference {
                            gate: arity + i,
                            reference: position,
                        })
                })
                .collect::<Result<Vec<GateRef>, CircuitError>>()?;
            if i < internal_count {
                referable.push(builder.add_gate(spec.operator, &inputs)?);
            } else {
                builder.add_output(spec.operator, &inputs)?;
            }
        }
        Ok(builder.build())
    }

    /// Decodes this record into a circuit implementing `truthtable`, which
    /// supplies the arity and coarity.
    pub fn to_circuit(&self, truthtable: &TruthTable) -> Result<Circuit, RecordError> {
        let arity = truthtable.arity().ok_or(RecordError::BadShape {
            rows: truthtable.len(),
        })?;
        self.decode(arity, truthtable.coarity())
    }
}

impl From<Vec<u8>> for Record {
    fn from(bytes: Vec<u8>) -> Self {
        Record(bytes)
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn xor_nimp_circuit() -> Circuit {
        let mut b = CircuitBuilder::new();
        let g0 = b.add_input().unwrap();
        let g1 = b.add_input().unwrap();
        let g2 = b.add_input().unwrap();
        let g3 = b.add_gate(Operator::Xor, &[g0, g2]).unwrap();
        let g4 = b.add_gate(Operator::Nimp, &[g1, g3]).unwrap();
        b.add_output(Operator::Id, &[g4]).unwrap();
        b.build()
    }

    #[test]
    fn test_encode_matches_known_record() {
        let record = Record::from_circuit(&xor_nimp_circuit()).unwrap();
        assert_eq!(record.as_bytes(), &[9, 0, 2, 4, 1, 3, 6, 4]);
        assert_eq!(record.to_base64(), "CQACBAEDBgQ=");
    }

    #[test]
    fn test_encode_not_circuit() {
        let mut b = CircuitBuilder::new();
        let g0 = b.add_input().unwrap();
        let g1 = b.add_gate(Operator::Not, &[g0]).unwrap();
        b.add_output(Operator::Id, &[g1]).unwrap();
        let record = Record::from_circuit(&b.build()).unwrap();
        assert_eq!(record.to_base64(), "DAAGAQ==");
    }

    #[test]
    fn test_decode_known_record() {
        let record = Record::from_base64("CQACBAEDBgQ=").unwrap();
        let circuit = record
            .to_circuit(&TruthTable::from_bits(&[0, 0, 1, 0, 0, 0, 0, 1]))
            .unwrap();
        assert_eq!(circuit, xor_nimp_circuit());
        assert_eq!(
            circuit.truth_table(),
            TruthTable::from_bits(&[0, 0, 1, 0, 0, 0, 0, 1])
        );
    }

    #[test]
    fn test_decode_two_outputs() {
        // Swap: outputs are (y, x).
        let record = Record::from(vec![6, 1, 6, 0]);
        let circuit = record.decode(2, 2).unwrap();
        assert_eq!(circuit.to_string(), "(('id',), ('id',), ('id', 1), ('id', 0))");
        assert_eq!(circuit.coarity(), 2);
    }

    #[test]
    fn test_decode_nullary() {
        let circuit = Record::from_base64("CwYA").unwrap().decode(0, 1).unwrap();
        assert_eq!(circuit.to_string(), "(('nt',), ('id', 0))");
        assert_eq!(circuit.evaluate(&[]).unwrap(), vec![true]);
    }

    #[test]
    fn test_decode_malformed() {
        assert_eq!(
            Record::from(vec![22]).gate_specs(),
            Err(RecordError::UnknownOperator {
                offset: 0,
                byte: 22
            })
        );
        assert_eq!(
            Record::from(vec![3, 0]).gate_specs(),
            Err(RecordError::TruncatedOperands {
                offset: 0,
                operator: Operator::And
            })
        );
        assert_eq!(
            Record::from(vec![6, 5]).decode(1, 1),
            Err(RecordError::Circuit(CircuitError::DanglingReference {
                gate: 1,
                reference: 5
            }))
        );
        assert_eq!(
            Record::from(vec![]).decode(1, 1),
            Err(RecordError::MissingOutputs {
                gate_specs: 0,
                coarity: 1
            })
        );
    }

    #[test]
    fn test_encode_rejects_oversized_circuit() {
        let mut b = CircuitBuilder::new();
        let x = b.add_input().unwrap();
        let mut last = x;
        for _ in 0..MAX_GATES - 1 {
            last = b.add_gate(Operator::Not, &[last]).unwrap();
        }
        b.add_output(Operator::Id, &[last]).unwrap();
        assert_eq!(
            Record::from_circuit(&b.build()),
            Err(RecordError::TooManyGates {
                count: MAX_GATES + 1
            })
        );
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            Record::from_base64("not base64!"),
            Err(RecordError::Base64(_))
        ));
    }
}
