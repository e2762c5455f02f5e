// SPDX-License-Identifier: Apache-2.0

use anyhow::{anyhow, Context};
use circuitdb::{Circuit, CircuitDb, Record, Value};
use clap::ArgMatches;

use crate::common::load_db;
use crate::report_cli_error::{report_anyhow_error_and_exit, report_cli_error_and_exit};

const SUBCOMMAND: &str = "lookup";

fn parse_value(text: &str, what: &str) -> anyhow::Result<Value> {
    text.parse::<Value>()
        .with_context(|| format!("could not parse {} {:?}", what, text))
}

/// One line per gate, e.g. `g3 = and(g0, g1)`; outputs are marked.
fn format_gates(circuit: &Circuit) -> String {
    let mut lines = Vec::with_capacity(circuit.len());
    for (i, gate) in circuit.gates().iter().enumerate() {
        let line = if gate.is_input {
            format!("g{} = input", i)
        } else {
            let args: Vec<String> = gate.inputs.iter().map(|r| format!("g{}", r.id)).collect();
            format!("g{} = {}({})", i, gate.operator, args.join(", "))
        };
        if gate.is_output {
            lines.push(format!("{} (output)", line));
        } else {
            lines.push(line);
        }
    }
    lines.join("\n")
}

fn format_circuit(circuit: &Circuit, format: &str) -> anyhow::Result<String> {
    match format {
        "legible" => Ok(circuit.to_string()),
        "gates" => Ok(format_gates(circuit)),
        "json" => Ok(serde_json::to_string_pretty(circuit)?),
        "record" => Ok(Record::from_circuit(circuit)?.to_base64()),
        other => Err(anyhow!("unknown output format {:?}", other)),
    }
}

fn run(matches: &ArgMatches, db: &CircuitDb) -> anyhow::Result<String> {
    let truthtable = matches
        .get_one::<String>("truth_table")
        .expect("truth_table is required");
    let truthtable = parse_value(truthtable, "truth table")?;
    let operators = matches
        .get_one::<String>("operators")
        .map(|s| parse_value(s, "operator set"))
        .transpose()?;
    let minimize = matches
        .get_one::<String>("minimize")
        .map(|s| parse_value(s, "minimize set"))
        .transpose()?;
    let circuit = db.lookup(&truthtable, operators.as_ref(), minimize.as_ref())?;
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("legible");
    format_circuit(&circuit, format)
}

pub fn handle_lookup(matches: &ArgMatches) {
    let db = match load_db(matches) {
        Ok(db) => db,
        Err(e) => report_anyhow_error_and_exit(&e, SUBCOMMAND),
    };
    match run(matches, &db) {
        Ok(text) => println!("{}", text),
        Err(e) => match e.downcast_ref::<circuitdb::LookupError>() {
            Some(lookup_error) => report_cli_error_and_exit(
                &lookup_error.to_string(),
                Some(SUBCOMMAND),
                vec![("kind", format!("{:?}", lookup_error.kind()))],
            ),
            None => report_anyhow_error_and_exit(&e, SUBCOMMAND),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_gates() {
        let db = CircuitDb::load_default();
        let circuit = db
            .lookup(&"(0, 1, 1, 0)".parse().unwrap(), None, None)
            .unwrap();
        assert_eq!(
            format_gates(&circuit),
            "g0 = input\ng1 = input\ng2 = xor(g0, g1)\ng3 = id(g2) (output)"
        );
    }

    #[test]
    fn test_format_record() {
        let db = CircuitDb::load_default();
        let circuit = db.lookup(&"(1,)".parse().unwrap(), None, None).unwrap();
        assert_eq!(format_circuit(&circuit, "record").unwrap(), "CwYA");
        assert!(format_circuit(&circuit, "yaml").is_err());
    }
}
