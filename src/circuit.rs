// SPDX-License-Identifier: Apache-2.0

//! Circuits as topologically ordered gate lists.
//!
//! A circuit's gates are stored in evaluation order: a gate may only refer to
//! gates that precede it. All input gates come first and all output gates
//! come last, so `arity + internal gates + coarity == len()`.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::operator::Operator;
use crate::truth_table::TruthTable;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct GateRef {
    pub id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub operator: Operator,
    pub inputs: Vec<GateRef>,
    pub is_input: bool,
    pub is_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    DanglingReference {
        gate: usize,
        reference: usize,
    },
    OperandCountMismatch {
        gate: usize,
        operator: Operator,
        got: usize,
    },
    InputAfterGate {
        gate: usize,
    },
    GateAfterOutput {
        gate: usize,
    },
    InputCountMismatch {
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for CircuitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitError::DanglingReference { gate, reference } => write!(
                f,
                "gate {} refers to gate {} which does not precede it",
                gate, reference
            ),
            CircuitError::OperandCountMismatch {
                gate,
                operator,
                got,
            } => write!(
                f,
                "gate {} applies {} (arity {}) to {} operands",
                gate,
                operator,
                operator.arity(),
                got
            ),
            CircuitError::InputAfterGate { gate } => {
                write!(f, "input gate {} follows a non-input gate", gate)
            }
            CircuitError::GateAfterOutput { gate } => {
                write!(f, "non-output gate {} follows an output gate", gate)
            }
            CircuitError::InputCountMismatch { expected, got } => write!(
                f,
                "circuit has {} inputs but {} values were supplied",
                expected, got
            ),
        }
    }
}

impl std::error::Error for CircuitError {}

/// Incrementally constructs a [`Circuit`].
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    gates: Vec<Gate>,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self { gates: Vec::new() }
    }

    pub fn add_input(&mut self) -> Result<GateRef, CircuitError> {
        let id = self.gates.len();
        if self.gates.iter().any(|g| !g.is_input) {
            return Err(CircuitError::InputAfterGate { gate: id });
        }
        self.gates.push(Gate {
            operator: Operator::Id,
            inputs: Vec::new(),
            is_input: true,
            is_output: false,
        });
        Ok(GateRef { id })
    }

    pub fn add_gate(
        &mut self,
        operator: Operator,
        inputs: &[GateRef],
    ) -> Result<GateRef, CircuitError> {
        let id = self.gates.len();
        if self.gates.last().map_or(false, |g| g.is_output) {
            return Err(CircuitError::GateAfterOutput { gate: id });
        }
        self.push_operation(operator, inputs, false)
    }

    pub fn add_output(
        &mut self,
        operator: Operator,
        inputs: &[GateRef],
    ) -> Result<GateRef, CircuitError> {
        self.push_operation(operator, inputs, true)
    }

    fn push_operation(
        &mut self,
        operator: Operator,
        inputs: &[GateRef],
        is_output: bool,
    ) -> Result<GateRef, CircuitError> {
        let id = self.gates.len();
        if inputs.len() != operator.arity() {
            return Err(CircuitError::OperandCountMismatch {
                gate: id,
                operator,
                got: inputs.len(),
            });
        }
        if let Some(bad) = inputs.iter().find(|r| r.id >= id) {
            return Err(CircuitError::DanglingReference {
                gate: id,
                reference: bad.id,
            });
        }
        self.gates.push(Gate {
            operator,
            inputs: inputs.to_vec(),
            is_input: false,
            is_output,
        });
        Ok(GateRef { id })
    }

    pub fn build(self) -> Circuit {
        Circuit { gates: self.gates }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    gates: Vec<Gate>,
}

impl Circuit {
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of input gates.
    pub fn arity(&self) -> usize {
        self.gates.iter().filter(|g| g.is_input).count()
    }

    /// Number of output gates.
    pub fn coarity(&self) -> usize {
        self.gates.iter().filter(|g| g.is_output).count()
    }

    /// Evaluates the circuit, returning the output gate values in order.
    pub fn evaluate(&self, inputs: &[bool]) -> Result<Vec<bool>, CircuitError> {
        let arity = self.arity();
        if inputs.len() != arity {
            return Err(CircuitError::InputCountMismatch {
                expected: arity,
                got: inputs.len(),
            });
        }
        let mut values: Vec<bool> = Vec::with_capacity(self.gates.len());
        let mut outputs = Vec::new();
        for gate in &self.gates {
            let value = if gate.is_input {
                inputs[values.len()]
            } else {
                let args: Vec<bool> = gate.inputs.iter().map(|r| values[r.id]).collect();
                gate.operator.apply(&args)
            };
            values.push(value);
            if gate.is_output {
                outputs.push(value);
            }
        }
        Ok(outputs)
    }

    /// Evaluates the circuit on every input row in ascending order (the first
    /// input is the most significant bit of the row number).
    pub fn truth_table(&self) -> TruthTable {
        let arity = self.arity();
        let coarity = self.coarity();
        let rows: Vec<Vec<bool>> = (0..1usize << arity)
            .map(|row| {
                let inputs: Vec<bool> = (0..arity)
                    .map(|i| (row >> (arity - 1 - i)) & 1 != 0)
                    .collect();
                // Inputs always match the arity computed above.
                self.evaluate(&inputs).unwrap_or_default()
            })
            .collect();
        if coarity == 1 {
            TruthTable::Scalar(rows.into_iter().map(|r| r[0]).collect())
        } else {
            TruthTable::Vector(rows)
        }
    }

    pub fn to_legible(&self) -> Vec<LegibleGate> {
        self.gates
            .iter()
            .map(|g| LegibleGate {
                operator: g.operator.name().to_string(),
                inputs: g.inputs.iter().map(|r| r.id).collect(),
            })
            .collect()
    }
}

/// A gate rendered as its operator name and input positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegibleGate {
    pub operator: String,
    pub inputs: Vec<usize>,
}

impl fmt::Display for LegibleGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "('{}'", self.operator)?;
        if self.inputs.is_empty() {
            return write!(f, ",)");
        }
        for input in &self.inputs {
            write!(f, ", {}", input)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gates: Vec<String> = self.to_legible().iter().map(|g| g.to_string()).collect();
        write!(f, "({})", gates.join(", "))
    }
}

impl Serialize for Circuit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct CircuitJson {
            arity: usize,
            coarity: usize,
            gates: Vec<LegibleGate>,
        }
        CircuitJson {
            arity: self.arity(),
            coarity: self.coarity(),
            gates: self.to_legible(),
        }
        .serialize(serializer)
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
    fn test_display_legible() {
        let c = xor_nimp_circuit();
        assert_eq!(
            c.to_string(),
            "(('id',), ('id',), ('id',), ('xor', 0, 2), ('nimp', 1, 3), ('id', 4))"
        );
        assert_eq!(c.arity(), 3);
        assert_eq!(c.coarity(), 1);
        assert_eq!(c.len(), 6);
    }

    #[test]
    fn test_truth_table() {
        let c = xor_nimp_circuit();
        assert_eq!(
            c.truth_table(),
            TruthTable::from_bits(&[0, 0, 1, 0, 0, 0, 0, 1])
        );
    }

    #[test]
    fn test_evaluate_two_outputs() {
        let mut b = CircuitBuilder::new();
        let x = b.add_input().unwrap();
        let y = b.add_input().unwrap();
        b.add_output(Operator::Id, &[y]).unwrap();
        b.add_output(Operator::Id, &[x]).unwrap();
        let c = b.build();
        assert_eq!(c.evaluate(&[true, false]).unwrap(), vec![false, true]);
        assert_eq!(c.coarity(), 2);
        assert_eq!(
            c.evaluate(&[true]),
            Err(CircuitError::InputCountMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_builder_rejects_malformed_gates() {
        let mut b = CircuitBuilder::new();
        let x = b.add_input().unwrap();
        assert_eq!(
            b.add_gate(Operator::And, &[x]),
            Err(CircuitError::OperandCountMismatch {
                gate: 1,
                operator: Operator::And,
                got: 1
            })
        );
        assert_eq!(
            b.add_gate(Operator::Not, &[GateRef { id: 1 }]),
            Err(CircuitError::DanglingReference {
                gate: 1,
                reference: 1
            })
        );
        b.add_gate(Operator::Not, &[x]).unwrap();
        assert_eq!(b.add_input(), Err(CircuitError::InputAfterGate { gate: 2 }));
        b.add_output(Operator::Id, &[x]).unwrap();
        assert_eq!(
            b.add_gate(Operator::Not, &[x]),
            Err(CircuitError::GateAfterOutput { gate: 3 })
        );
    }

    #[test]
    fn test_serialize_json() {
        let c = xor_nimp_circuit();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["arity"], 3);
        assert_eq!(json["gates"][3]["operator"], "xor");
        assert_eq!(json["gates"][3]["inputs"], serde_json::json!([0, 2]));
    }
}
