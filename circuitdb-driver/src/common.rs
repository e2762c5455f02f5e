// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use circuitdb::CircuitDb;
use clap::ArgMatches;

/// Returns the table selected by the global `--data-dir` flag, or the
/// embedded one when it is absent.
pub fn load_db(matches: &ArgMatches) -> anyhow::Result<Arc<CircuitDb>> {
    match matches.get_one::<String>("data_dir") {
        Some(dir) => {
            let db = CircuitDb::from_data_dir(Path::new(dir))
                .with_context(|| format!("failed to load circuit tables from {}", dir))?;
            Ok(Arc::new(db))
        }
        None => Ok(CircuitDb::load_default()),
    }
}
