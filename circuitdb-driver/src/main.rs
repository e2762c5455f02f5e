// SPDX-License-Identifier: Apache-2.0

//! Command line driver for the circuit table.
//!
//! Commands are given like:
//!
//! ```text
//! circuitdb <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - lookup: Prints a minimal circuit for a truth table.
//! - tables: Lists the stored tables and their entry counts.
//! - verify: Checks every stored circuit against its truth table.
//! - dump: Prints the records of a bulk file as base64, one per line.
//! - pack: Writes a bulk file from a base64 listing.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- lookup '(0, 0, 1, 0, 0, 0, 0, 1)'
//! $ cargo run -- lookup '(0, 1, 1, 0)' --operators '{id, not, and, or}' --format gates
//! $ cargo run -- --data-dir ../data verify
//! ```

mod bulk;
mod common;
mod lookup;
mod report_cli_error;
mod tables;
mod verify;

use clap::{Arg, ArgAction};
use report_cli_error::report_cli_error_and_exit;

fn main() {
    let _ = env_logger::try_init();

    log::info!("circuitdb starting; version: {}", env!("CARGO_PKG_VERSION"));

    let matches = clap::Command::new("circuitdb")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Queries and maintains the table of minimal Boolean circuits")
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .value_name("DATA_DIR")
                .help("Directory holding the bulk tables to use instead of the embedded ones")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("lookup")
                .about("Prints a minimal circuit implementing a truth table")
                .arg(
                    Arg::new("truth_table")
                        .value_name("TRUTH_TABLE")
                        .help("Truth table, e.g. '(0, 1, 1, 0)' or '((1, 0), (0, 1))'")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("operators")
                        .long("operators")
                        .value_name("SET")
                        .help("Operators circuits may use, e.g. '{id, not, and, or}'")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("minimize")
                        .long("minimize")
                        .value_name("SET")
                        .help("Operators whose count was minimized, e.g. '{and}'")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format")
                        .value_parser(["legible", "gates", "json", "record"])
                        .default_value("legible")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            clap::Command::new("tables").about("Lists every stored table with its entry count"),
        )
        .subcommand(
            clap::Command::new("verify")
                .about("Checks every stored circuit against the truth table it is filed under"),
        )
        .subcommand(
            clap::Command::new("dump")
                .about("Prints the records of a bulk file as base64, one per line")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .help("The bulk file to read")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            clap::Command::new("pack")
                .about("Writes a bulk file from base64 records, one per line")
                .arg(
                    Arg::new("input")
                        .value_name("INPUT")
                        .help("The base64 listing to read")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .value_name("OUTPUT")
                        .help("The bulk file to write")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("lookup") {
        lookup::handle_lookup(matches);
    } else if let Some(matches) = matches.subcommand_matches("tables") {
        tables::handle_tables(matches);
    } else if let Some(matches) = matches.subcommand_matches("verify") {
        verify::handle_verify(matches);
    } else if let Some(matches) = matches.subcommand_matches("dump") {
        bulk::handle_dump(matches);
    } else if let Some(matches) = matches.subcommand_matches("pack") {
        bulk::handle_pack(matches);
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
    } else {
        report_cli_error_and_exit("No valid subcommand provided.", None, vec![]);
    }
}
