// SPDX-License-Identifier: Apache-2.0

use circuitdb::CircuitDb;
use clap::ArgMatches;

use crate::common::load_db;
use crate::report_cli_error::report_anyhow_error_and_exit;

/// One line per stored table, in key order.
fn describe_tables(db: &CircuitDb) -> Vec<String> {
    db.combinations()
        .map(|c| {
            format!(
                "arity={} coarity={} operators={} minimize={} entries={}",
                c.arity,
                c.coarity,
                c.operators.tag(),
                c.minimize.tag(),
                c.records.len()
            )
        })
        .collect()
}

pub fn handle_tables(matches: &ArgMatches) {
    let db = match load_db(matches) {
        Ok(db) => db,
        Err(e) => report_anyhow_error_and_exit(&e, "tables"),
    };
    for line in describe_tables(&db) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_tables() {
        let lines = describe_tables(&CircuitDb::load_default());
        assert_eq!(lines.len(), 13);
        assert_eq!(
            lines[0],
            "arity=0 coarity=1 operators=every minimize=every entries=2"
        );
        assert!(lines.contains(
            &"arity=3 coarity=1 operators=id-not-and-xor minimize=and entries=256".to_string()
        ));
    }
}
