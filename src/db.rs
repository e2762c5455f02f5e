// SPDX-License-Identifier: Apache-2.0

//! The nested circuit table.
//!
//! Circuits are organized by function arity, then coarity, then the set of
//! operators circuits may use, then the set of operators whose count was
//! minimized, and finally by truth table:
//!
//! ```text
//! db[arity][coarity][&operators][&minimize].get(&truthtable)
//! ```
//!
//! Indexing with `[]` panics on a missing key and [`Records::get`] performs
//! no validation beyond key normalization. [`CircuitDb::lookup`] is the
//! checked interface.

use std::collections::BTreeMap;
use std::ops::Index;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::operator::OperatorSet;
use crate::payload;
use crate::records::{LoadError, Records};

/// One level of the nested table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<K, V> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V> Table<K, V> {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// The smallest key, if any.
    pub fn first_key(&self) -> Option<&K> {
        self.entries.keys().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Index<usize> for Table<usize, V> {
    type Output = V;

    fn index(&self, key: usize) -> &V {
        self.entries
            .get(&key)
            .unwrap_or_else(|| panic!("no entry for key {}", key))
    }
}

impl<V> Index<&OperatorSet> for Table<OperatorSet, V> {
    type Output = V;

    fn index(&self, key: &OperatorSet) -> &V {
        self.entries
            .get(key)
            .unwrap_or_else(|| panic!("no entry for operator set {}", key))
    }
}

/// Minimize set -> records.
pub type MinimizeSets = Table<OperatorSet, Records>;
/// Operator set -> minimize sets.
pub type OperatorSets = Table<OperatorSet, MinimizeSets>;
/// Coarity -> operator sets.
pub type Coarities = Table<usize, OperatorSets>;

/// One stored table together with its position in the nesting.
#[derive(Debug, Clone, Copy)]
pub struct Combination<'a> {
    pub arity: usize,
    pub coarity: usize,
    pub operators: &'a OperatorSet,
    pub minimize: &'a OperatorSet,
    pub records: &'a Records,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitDb {
    arities: Table<usize, Coarities>,
}

impl CircuitDb {
    /// Returns the table built from the embedded payload, shared by the whole
    /// process.
    pub fn load_default() -> Arc<Self> {
        static DEFAULT_DB: OnceLock<Arc<CircuitDb>> = OnceLock::new();
        DEFAULT_DB
            .get_or_init(|| {
                let db = payload::load_embedded().expect("failed to load embedded circuit payload");
                Arc::new(db)
            })
            .clone()
    }

    /// Builds the table from the embedded base64 literals plus the bulk files
    /// found in `dir` (named `<arity>_<coarity>_<operators>_<minimize>`).
    pub fn from_data_dir(dir: &Path) -> Result<Self, LoadError> {
        payload::load_from_dir(dir)
    }

    pub fn get(&self, arity: usize) -> Option<&Coarities> {
        self.arities.get(&arity)
    }

    /// Supported arities in ascending order.
    pub fn arities(&self) -> impl Iterator<Item = &usize> {
        self.arities.keys()
    }

    /// Returns the records for a fully specified path, if present.
    pub fn records(
        &self,
        arity: usize,
        coarity: usize,
        operators: &OperatorSet,
        minimize: &OperatorSet,
    ) -> Option<&Records> {
        self.get(arity)?
            .get(&coarity)?
            .get(operators)?
            .get(minimize)
    }

    /// Iterates over every stored table in key order.
    pub fn combinations(&self) -> impl Iterator<Item = Combination<'_>> {
        let mut combos = Vec::new();
        for (&arity, coarities) in self.arities.iter() {
            for (&coarity, operator_sets) in coarities.iter() {
                for (operators, minimize_sets) in operator_sets.iter() {
                    for (minimize, records) in minimize_sets.iter() {
                        combos.push(Combination {
                            arity,
                            coarity,
                            operators,
                            minimize,
                            records,
                        });
                    }
                }
            }
        }
        combos.into_iter()
    }
}

impl Index<usize> for CircuitDb {
    type Output = Coarities;

    fn index(&self, arity: usize) -> &Coarities {
        &self.arities[arity]
    }
}

/// Accumulates tables before freezing them into a [`CircuitDb`].
#[derive(Debug)]
pub struct CircuitDbBuilder {
    arities: Table<usize, Coarities>,
}

impl Default for CircuitDbBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitDbBuilder {
    pub fn new() -> Self {
        Self {
            arities: Table::new(),
        }
    }

    /// Adds (or replaces) the records for one combination.
    pub fn insert(
        &mut self,
        arity: usize,
        coarity: usize,
        operators: OperatorSet,
        minimize: OperatorSet,
        records: Records,
    ) -> &mut Self {
        log::debug!(
            "circuit table arity={} coarity={} operators={} minimize={}: {} records",
            arity,
            coarity,
            operators,
            minimize,
            records.len()
        );
        self.arities
            .entries
            .entry(arity)
            .or_insert_with(Table::new)
            .entries
            .entry(coarity)
            .or_insert_with(Table::new)
            .entries
            .entry(operators)
            .or_insert_with(Table::new)
            .entries
            .insert(minimize, records);
        self
    }

    pub fn build(self) -> CircuitDb {
        CircuitDb {
            arities: self.arities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use crate::record::Record;
    use crate::truth_table::TruthTable;

    fn small_db() -> CircuitDb {
        let every = OperatorSet::every();
        let mut builder = CircuitDbBuilder::new();
        builder
            .insert(
                0,
                1,
                every,
                every,
                Records::from_base64_strs(&["AAYA", "CwYA"]).unwrap(),
            )
            .insert(
                1,
                1,
                OperatorSet::id_not_and_or(),
                OperatorSet::id_not_and_or(),
                Records::new(vec![Record::from(vec![6, 0]); 4]),
            );
        builder.build()
    }

    #[test]
    fn test_index_path() {
        let db = small_db();
        let every = OperatorSet::every();
        let circuit = db[0][1][&every][&every]
            .get(&TruthTable::from_bits(&[1]))
            .unwrap();
        assert_eq!(circuit.to_string(), "(('nt',), ('id', 0))");
        assert_eq!(db.arities().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    #[should_panic(expected = "no entry for key 4")]
    fn test_index_missing_arity_panics() {
        let db = small_db();
        let _ = &db[4];
    }

    #[test]
    fn test_records_path_and_combinations() {
        let db = small_db();
        let ops = OperatorSet::id_not_and_or();
        assert_eq!(db.records(1, 1, &ops, &ops).map(Records::len), Some(4));
        let and_only = OperatorSet::of(&[Operator::And]);
        assert!(db.records(1, 1, &ops, &and_only).is_none());
        let shapes: Vec<_> = db.combinations().map(|c| (c.arity, c.coarity)).collect();
        assert_eq!(shapes, vec![(0, 1), (1, 1)]);
    }
}
