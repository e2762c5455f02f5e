// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use test_case::test_case;

fn run_driver(args: &[&str]) -> Output {
    let command_path = env!("CARGO_BIN_EXE_circuitdb");
    Command::new(command_path)
        .args(args)
        .output()
        .expect("Failed to run circuitdb")
}

fn assert_success(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("data")
}

#[test_case(
    &["lookup", "(0, 0, 1, 0, 0, 0, 0, 1)"],
    "(('id',), ('id',), ('id',), ('xor', 0, 2), ('nimp', 1, 3), ('id', 4))";
    "default sets"
)]
#[test_case(
    &["lookup", "(0, 0, 1, 0, 0, 0, 0, 1)", "--operators", "{id, not, and, xor}", "--minimize", "{and}"],
    "(('id',), ('id',), ('id',), ('not', 0), ('xor', 2, 3), ('and', 1, 4), ('id', 5))";
    "fewest ands"
)]
#[test_case(
    &["lookup", "((0, 0), (1, 0), (0, 1), (1, 1))"],
    "(('id',), ('id',), ('id', 1), ('id', 0))";
    "two outputs"
)]
#[test_case(&["lookup", "(1,)", "--format", "record"], "CwYA"; "record format")]
#[test_case(
    &["lookup", "(1, 0)", "--operators", "{id, not, and, or}", "--format", "gates"],
    "g0 = input\ng1 = not(g0)\ng2 = id(g1) (output)";
    "gates format"
)]
fn test_lookup_subcommand(args: &[&str], want: &str) {
    let output = run_driver(args);
    assert_eq!(assert_success(&output), want);
}

#[test]
fn test_lookup_json() {
    let output = run_driver(&["lookup", "(0, 1)", "--format", "json"]);
    let stdout = assert_success(&output);
    assert!(stdout.contains("\"arity\": 1"), "{}", stdout);
    assert!(stdout.contains("\"operator\": \"id\""), "{}", stdout);
}

#[test_case(&["lookup", "(0, 0, 0)"], "truth table must have a length that is a power of two"; "bad length")]
#[test_case(&["lookup", "(0, 0, 0, 0)", "--operators", "[id]"], "collection of operators must be a set or frozenset"; "operators list")]
#[test_case(&["lookup", "(0, 1"], "could not parse truth table"; "unparsable")]
#[test_case(&["--data-dir", "/nonexistent/circuitdb", "tables"], "failed to load circuit tables from /nonexistent/circuitdb"; "missing data dir")]
fn test_errors_exit_one(args: &[&str], want_in_stderr: &str) {
    let output = run_driver(args);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(want_in_stderr), "stderr: {}", stderr);
}

#[test]
fn test_tables_subcommand() {
    let output = run_driver(&["tables"]);
    let stdout = assert_success(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 13);
    assert!(lines.contains(&"arity=2 coarity=2 operators=every minimize=every entries=256"));
}

#[test]
fn test_verify_with_data_dir() {
    let dir = data_dir();
    let output = run_driver(&["--data-dir", dir.to_str().unwrap(), "verify"]);
    assert_eq!(assert_success(&output), "verified 1598 entries in 13 tables");
}

#[test]
fn test_dump_and_pack_round_trip() {
    let original = data_dir().join("3_1_id-not-and-xor_and");
    let dump = run_driver(&["dump", original.to_str().unwrap()]);
    let listing_text = assert_success(&dump);
    assert_eq!(listing_text.lines().count(), 256);

    let temp_dir = tempfile::tempdir().unwrap();
    let listing = temp_dir.path().join("listing.txt");
    std::fs::write(&listing, format!("{}\n", listing_text)).unwrap();
    let packed = temp_dir.path().join("3_1_id-not-and-xor_and");
    let pack = run_driver(&["pack", listing.to_str().unwrap(), packed.to_str().unwrap()]);
    assert_success(&pack);

    assert_eq!(
        std::fs::read(&packed).unwrap(),
        std::fs::read(&original).unwrap()
    );
}

#[test]
fn test_version_subcommand() {
    let output = run_driver(&["version"]);
    assert_eq!(assert_success(&output), env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_deeply_nested_literal_exits_one() {
    let nested = "(".repeat(100_000);
    let output = run_driver(&["lookup", &nested]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nesting too deep"), "stderr: {}", stderr);
}
