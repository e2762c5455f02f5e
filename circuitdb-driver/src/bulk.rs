// SPDX-License-Identifier: Apache-2.0

//! Conversion between bulk table files and base64 record listings.

use std::path::Path;

use anyhow::Context;
use circuitdb::Records;
use clap::ArgMatches;

use crate::report_cli_error::report_anyhow_error_and_exit;

fn dump(path: &Path) -> anyhow::Result<Vec<String>> {
    let records = Records::from_file(path)
        .with_context(|| format!("failed to read bulk file {}", path.display()))?;
    Ok(records.iter().map(|r| r.to_base64()).collect())
}

fn pack(input: &Path, output: &Path) -> anyhow::Result<usize> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let records = Records::from_base64_strs(&lines)
        .with_context(|| format!("invalid record listing in {}", input.display()))?;
    records
        .to_file(output)
        .with_context(|| format!("failed to write bulk file {}", output.display()))?;
    Ok(records.len())
}

pub fn handle_dump(matches: &ArgMatches) {
    let path = matches.get_one::<String>("file").expect("file is required");
    match dump(Path::new(path)) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => report_anyhow_error_and_exit(&e, "dump"),
    }
}

pub fn handle_pack(matches: &ArgMatches) {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let output = matches
        .get_one::<String>("output")
        .expect("output is required");
    match pack(Path::new(input), Path::new(output)) {
        Ok(count) => log::info!("packed {} records into {}", count, output),
        Err(e) => report_anyhow_error_and_exit(&e, "pack"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_then_dump() {
        let dir = tempfile::tempdir().unwrap();
        let listing = dir.path().join("listing.txt");
        let bulk = dir.path().join("1_1_every_every");
        std::fs::write(&listing, "AQAGAQ==\nBgA=\nDAAGAQ==\nEQAGAQ==\n").unwrap();
        assert_eq!(pack(&listing, &bulk).unwrap(), 4);
        assert_eq!(
            dump(&bulk).unwrap(),
            vec!["AQAGAQ==", "BgA=", "DAAGAQ==", "EQAGAQ=="]
        );
    }

    #[test]
    fn test_pack_rejects_bad_base64() {
        let dir = tempfile::tempdir().unwrap();
        let listing = dir.path().join("listing.txt");
        std::fs::write(&listing, "not base64!\n").unwrap();
        let err = pack(&listing, &dir.path().join("out")).unwrap_err();
        assert!(err.to_string().starts_with("invalid record listing in "));
    }
}
