// SPDX-License-Identifier: Apache-2.0

use colored::Colorize;

/// Prints `message` in bold red, prefixed by the subcommand, followed by the
/// given key/value details, and exits with status 1.
pub fn report_cli_error_and_exit(
    message: &str,
    subcommand: Option<&str>,
    details: Vec<(&str, String)>,
) -> ! {
    let prefix = subcommand.map(|s| format!("{}: ", s)).unwrap_or_default();
    eprintln!("circuitdb: {}{}", prefix, message.red().bold());
    for (key, value) in details {
        eprintln!("  {}: {}", key, value);
    }
    std::process::exit(1);
}

/// Reports an `anyhow` error, listing each underlying cause as a detail.
pub fn report_anyhow_error_and_exit(error: &anyhow::Error, subcommand: &str) -> ! {
    let details = error
        .chain()
        .skip(1)
        .map(|cause| ("caused by", cause.to_string()))
        .collect();
    report_cli_error_and_exit(&error.to_string(), Some(subcommand), details)
}
