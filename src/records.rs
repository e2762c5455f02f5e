// SPDX-License-Identifier: Apache-2.0

//! Dense per-function tables of records and their bulk file format.
//!
//! A [`Records`] table holds one record for every function of a fixed arity
//! and coarity, positioned at the function's packed truth-table index (see
//! [`TruthTable::index`]).
//!
//! Bulk files concatenate records separated by a single zero byte. Every
//! record byte is stored incremented by one so that zero never occurs inside
//! a record; readers decrement each byte again. There is no trailing
//! separator.

use std::fmt;
use std::io;
use std::path::Path;

use crate::circuit::Circuit;
use crate::record::{Record, RecordError};
use crate::truth_table::TruthTable;

const SEPARATOR: u8 = 0;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Record(RecordError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {}", e),
            LoadError::Record(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Record(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<RecordError> for LoadError {
    fn from(e: RecordError) -> Self {
        Self::Record(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Records {
    records: Vec<Record>,
}

impl Records {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn from_base64_strs(strs: &[&str]) -> Result<Self, RecordError> {
        let records = strs
            .iter()
            .map(|s| Record::from_base64(s))
            .collect::<Result<Vec<Record>, RecordError>>()?;
        Ok(Self { records })
    }

    /// Reads the bulk file format.
    pub fn from_bulk_bytes(data: &[u8]) -> Self {
        let records = data
            .split(|&b| b == SEPARATOR)
            .map(|stored| Record::from(stored.iter().map(|&b| b - 1).collect::<Vec<u8>>()))
            .collect();
        Self { records }
    }

    /// Writes the bulk file format. Fails if any record holds the byte 255.
    pub fn to_bulk_bytes(&self) -> Result<Vec<u8>, RecordError> {
        let mut data = Vec::new();
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                data.push(SEPARATOR);
            }
            for (offset, &b) in record.as_bytes().iter().enumerate() {
                let stored = b
                    .checked_add(1)
                    .ok_or(RecordError::Unframeable { record: i, offset })?;
                data.push(stored);
            }
        }
        Ok(data)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read(path)?;
        let records = Self::from_bulk_bytes(&data);
        log::debug!(
            "loaded {} records ({} bytes) from {}",
            records.len(),
            data.len(),
            path.display()
        );
        Ok(records)
    }

    pub fn to_file(&self, path: &Path) -> Result<(), LoadError> {
        let data = self.to_bulk_bytes()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Returns the stored record for `truthtable`.
    ///
    /// The truth table is normalized but not validated; use
    /// [`crate::CircuitDb::lookup`] for checked access.
    pub fn record(&self, truthtable: &TruthTable) -> Result<&Record, RecordError> {
        let normalized = truthtable.clone().normalized();
        let index = normalized.index();
        index
            .and_then(|i| self.records.get(i))
            .ok_or(RecordError::MissingEntry {
                index,
                len: self.records.len(),
            })
    }

    /// Decodes the circuit stored for `truthtable`.
    ///
    /// The truth table is normalized but not validated; use
    /// [`crate::CircuitDb::lookup`] for checked access.
    pub fn get(&self, truthtable: &TruthTable) -> Result<Circuit, RecordError> {
        let normalized = truthtable.clone().normalized();
        self.record(&normalized)?.to_circuit(&normalized)
    }
}

impl<'a> IntoIterator for &'a Records {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn not_table() -> Records {
        Records::from_base64_strs(&["DAADAAEGAg==", "BgA=", "DAAGAQ==", "DAAKAAEGAg=="]).unwrap()
    }

    #[test]
    fn test_bulk_bytes_round_trip() {
        let records = not_table();
        let data = records.to_bulk_bytes().unwrap();
        assert!(!data.ends_with(&[SEPARATOR]));
        assert_eq!(data.iter().filter(|&&b| b == SEPARATOR).count(), 3);
        assert_eq!(Records::from_bulk_bytes(&data), records);
    }

    #[test]
    fn test_bulk_bytes_are_incremented() {
        let records = Records::new(vec![Record::from(vec![6, 0]), Record::from(vec![12, 0, 6, 1])]);
        assert_eq!(
            records.to_bulk_bytes().unwrap(),
            vec![7, 1, SEPARATOR, 13, 1, 7, 2]
        );
    }

    #[test]
    fn test_bulk_bytes_reject_255() {
        let records = Records::new(vec![Record::from(vec![6, 0]), Record::from(vec![6, 255])]);
        assert_eq!(
            records.to_bulk_bytes(),
            Err(RecordError::Unframeable {
                record: 1,
                offset: 1
            })
        );
    }

    #[test]
    fn test_get_normalizes_key() {
        let records = not_table();
        let scalar = records.get(&TruthTable::from_bits(&[1, 0])).unwrap();
        let singleton_rows = records
            .get(&TruthTable::from_bit_rows(&[&[1], &[0]]))
            .unwrap();
        assert_eq!(scalar, singleton_rows);
        assert_eq!(scalar.to_string(), "(('id',), ('not', 0), ('id', 1))");
    }

    #[test]
    fn test_get_missing_entry() {
        let records = not_table();
        assert_eq!(
            records.get(&TruthTable::from_bits(&[1, 0, 0, 0])),
            Err(RecordError::MissingEntry {
                index: Some(8),
                len: 4
            })
        );
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1_1_id-not-and-or_id-not-and-or");
        let records = not_table();
        records.to_file(&path).unwrap();
        assert_eq!(Records::from_file(&path).unwrap(), records);
    }
}
