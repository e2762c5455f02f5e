// SPDX-License-Identifier: Apache-2.0

use circuitdb::record::MAX_GATES;
use circuitdb::{CircuitDb, Combination, TruthTable};
use clap::ArgMatches;

use crate::common::load_db;
use crate::report_cli_error::{report_anyhow_error_and_exit, report_cli_error_and_exit};

#[derive(Debug, Default)]
struct Summary {
    tables: usize,
    entries: usize,
    failures: Vec<String>,
}

fn verify_entry(combo: &Combination<'_>, index: usize) -> Result<(), String> {
    let tt = TruthTable::from_index(index, combo.arity, combo.coarity);
    let circuit = combo.records.get(&tt).map_err(|e| e.to_string())?;
    if circuit.len() > MAX_GATES {
        return Err(format!("{} gates exceed the limit of {}", circuit.len(), MAX_GATES));
    }
    if let Some(gate) = circuit
        .gates()
        .iter()
        .find(|g| !g.is_input && !combo.operators.contains(g.operator))
    {
        return Err(format!("uses operator {} outside the allowed set", gate.operator));
    }
    let got = circuit.truth_table();
    if got != tt {
        return Err(format!("circuit {} computes {}", circuit, got));
    }
    Ok(())
}

fn verify_combination(combo: &Combination<'_>, summary: &mut Summary) {
    let label = format!(
        "{}_{}_{}_{}",
        combo.arity,
        combo.coarity,
        combo.operators.tag(),
        combo.minimize.tag()
    );
    summary.tables += 1;
    let expected = 1usize << ((1usize << combo.arity) * combo.coarity);
    if combo.records.len() != expected {
        summary.failures.push(format!(
            "{}: {} entries, expected {}",
            label,
            combo.records.len(),
            expected
        ));
    }
    for index in 0..combo.records.len().min(expected) {
        summary.entries += 1;
        if let Err(e) = verify_entry(combo, index) {
            summary.failures.push(format!("{}[{}]: {}", label, index, e));
        }
    }
    log::debug!("verified {}", label);
}

fn verify_db(db: &CircuitDb) -> Summary {
    let mut summary = Summary::default();
    for combo in db.combinations() {
        verify_combination(&combo, &mut summary);
    }
    summary
}

pub fn handle_verify(matches: &ArgMatches) {
    let db = match load_db(matches) {
        Ok(db) => db,
        Err(e) => report_anyhow_error_and_exit(&e, "verify"),
    };
    let summary = verify_db(&db);
    if !summary.failures.is_empty() {
        for failure in &summary.failures {
            eprintln!("{}", failure);
        }
        report_cli_error_and_exit(
            "verification failed",
            Some("verify"),
            vec![
                ("failures", summary.failures.len().to_string()),
                ("entries", summary.entries.to_string()),
            ],
        );
    }
    println!(
        "verified {} entries in {} tables",
        summary.entries, summary.tables
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuitdb::{CircuitDbBuilder, OperatorSet, Record, Records};

    #[test]
    fn test_embedded_tables_verify() {
        let summary = verify_db(&CircuitDb::load_default());
        assert!(summary.failures.is_empty(), "{:?}", summary.failures);
        assert_eq!(summary.tables, 13);
        assert_eq!(summary.entries, 3 * (4 + 16 + 256 + 256) + 2);
    }

    #[test]
    fn test_wrong_entry_is_reported() {
        let ops = OperatorSet::id_not_and_or();
        // Identity stored for every unary function.
        let records = Records::new(vec![Record::from(vec![6, 0]); 4]);
        let mut builder = CircuitDbBuilder::new();
        builder.insert(1, 1, ops, ops, records);
        let summary = verify_db(&builder.build());
        assert_eq!(summary.entries, 4);
        assert_eq!(summary.failures.len(), 3);
        assert!(summary.failures[0].starts_with("1_1_id-not-and-or_id-not-and-or[0]: "));
    }

    #[test]
    fn test_short_table_is_reported() {
        let ops = OperatorSet::every();
        let records = Records::new(vec![Record::from(vec![0, 6, 0])]);
        let mut builder = CircuitDbBuilder::new();
        builder.insert(0, 1, ops, ops, records);
        let summary = verify_db(&builder.build());
        assert_eq!(
            summary.failures,
            vec!["0_1_every_every: 1 entries, expected 2".to_string()]
        );
    }
}
