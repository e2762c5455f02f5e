// SPDX-License-Identifier: Apache-2.0

//! The stored circuits.
//!
//! Small tables are kept inline as base64 records. Tables for functions of
//! arity 2 and coarity 2, and of arity 3 and coarity 1, are kept in bulk
//! files under `data/`, named `<arity>_<coarity>_<operators>_<minimize>`.

use std::path::Path;

use crate::db::{CircuitDb, CircuitDbBuilder};
use crate::operator::{Operator, OperatorSet};
use crate::records::{LoadError, Records};

enum Source {
    Base64(&'static [&'static str]),
    Bulk(&'static [u8]),
}

struct TableSpec {
    arity: usize,
    coarity: usize,
    operators: OperatorSet,
    minimize: OperatorSet,
    source: Source,
}

impl TableSpec {
    fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.arity,
            self.coarity,
            self.operators.tag(),
            self.minimize.tag()
        )
    }
}

const EVERY: OperatorSet = OperatorSet::every();
const ID_NOT_AND_OR: OperatorSet = OperatorSet::id_not_and_or();
const ID_NOT_AND_XOR: OperatorSet = OperatorSet::id_not_and_xor();
const AND: OperatorSet = OperatorSet::of(&[Operator::And]);

macro_rules! bulk {
    ($name:literal) => {
        Source::Bulk(include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/",
            $name
        )))
    };
}

const TABLES: &[TableSpec] = &[
    TableSpec {
        arity: 1,
        coarity: 1,
        operators: ID_NOT_AND_OR,
        minimize: ID_NOT_AND_OR,
        source: Source::Base64(&["DAADAAEGAg==", "BgA=", "DAAGAQ==", "DAAKAAEGAg=="]),
    },
    TableSpec {
        arity: 2,
        coarity: 1,
        operators: ID_NOT_AND_OR,
        minimize: ID_NOT_AND_OR,
        source: Source::Base64(&[
            "DAADAAIGAw==",
            "AwABBgI=",
            "DAEDAAIGAw==",
            "BgA=",
            "DAADAQIGAw==",
            "BgE=",
            "AwABDAIKAAEDAwQGBQ==",
            "CgABBgI=",
            "CgABDAIGAw==",
            "AwABCgABDAMKAgQGBQ==",
            "DAEGAg==",
            "DAEKAAIGAw==",
            "DAAGAg==",
            "DAAKAQIGAw==",
            "AwABDAIGAw==",
            "DAAKAAIGAw==",
        ]),
    },
    TableSpec {
        arity: 2,
        coarity: 2,
        operators: ID_NOT_AND_OR,
        minimize: ID_NOT_AND_OR,
        source: bulk!("2_2_id-not-and-or_id-not-and-or"),
    },
    TableSpec {
        arity: 3,
        coarity: 1,
        operators: ID_NOT_AND_OR,
        minimize: ID_NOT_AND_OR,
        source: bulk!("3_1_id-not-and-or_id-not-and-or"),
    },
    TableSpec {
        arity: 1,
        coarity: 1,
        operators: ID_NOT_AND_XOR,
        minimize: AND,
        source: Source::Base64(&["DAAMAAkBAgYD", "BgA=", "DAAGAQ==", "DAAJAAEGAg=="]),
    },
    TableSpec {
        arity: 2,
        coarity: 1,
        operators: ID_NOT_AND_XOR,
        minimize: AND,
        source: Source::Base64(&[
            "DAAMAAkCAwYE",
            "AwABBgI=",
            "DAEDAAIGAw==",
            "BgA=",
            "DAADAQIGAw==",
            "BgE=",
            "CQABBgI=",
            "DAADAQIJAAMGBA==",
            "DAAMAQMCAwYE",
            "DAAJAQIGAw==",
            "DAEGAg==",
            "DAADAQIMAwYE",
            "DAAGAg==",
            "DAADAAEJAgMGBA==",
            "AwABDAIGAw==",
            "DAAJAAIGAw==",
        ]),
    },
    TableSpec {
        arity: 2,
        coarity: 2,
        operators: ID_NOT_AND_XOR,
        minimize: AND,
        source: bulk!("2_2_id-not-and-xor_and"),
    },
    TableSpec {
        arity: 3,
        coarity: 1,
        operators: ID_NOT_AND_XOR,
        minimize: AND,
        source: bulk!("3_1_id-not-and-xor_and"),
    },
    TableSpec {
        arity: 0,
        coarity: 1,
        operators: EVERY,
        minimize: EVERY,
        source: Source::Base64(&["AAYA", "CwYA"]),
    },
    TableSpec {
        arity: 1,
        coarity: 1,
        operators: EVERY,
        minimize: EVERY,
        source: Source::Base64(&["AQAGAQ==", "BgA=", "DAAGAQ==", "EQAGAQ=="]),
    },
    TableSpec {
        arity: 2,
        coarity: 1,
        operators: EVERY,
        minimize: EVERY,
        source: Source::Base64(&[
            "AgABBgI=",
            "AwABBgI=",
            "BAABBgI=",
            "BQABBgI=",
            "BwABBgI=",
            "CAABBgI=",
            "CQABBgI=",
            "CgABBgI=",
            "DQABBgI=",
            "DgABBgI=",
            "DwABBgI=",
            "EAABBgI=",
            "EgABBgI=",
            "EwABBgI=",
            "FAABBgI=",
            "FQABBgI=",
        ]),
    },
    TableSpec {
        arity: 2,
        coarity: 2,
        operators: EVERY,
        minimize: EVERY,
        source: bulk!("2_2_every_every"),
    },
    TableSpec {
        arity: 3,
        coarity: 1,
        operators: EVERY,
        minimize: EVERY,
        source: bulk!("3_1_every_every"),
    },
];

fn load_with(
    mut load_bulk: impl FnMut(&TableSpec, &'static [u8]) -> Result<Records, LoadError>,
) -> Result<CircuitDb, LoadError> {
    let mut builder = CircuitDbBuilder::new();
    for spec in TABLES {
        let records = match spec.source {
            Source::Base64(strs) => Records::from_base64_strs(strs)?,
            Source::Bulk(bytes) => load_bulk(spec, bytes)?,
        };
        builder.insert(
            spec.arity,
            spec.coarity,
            spec.operators,
            spec.minimize,
            records,
        );
    }
    Ok(builder.build())
}

pub(crate) fn load_embedded() -> Result<CircuitDb, LoadError> {
    load_with(|_, bytes| Ok(Records::from_bulk_bytes(bytes)))
}

pub(crate) fn load_from_dir(dir: &Path) -> Result<CircuitDb, LoadError> {
    log::info!("loading bulk circuit tables from {}", dir.display());
    load_with(|spec, _| Records::from_file(&dir.join(spec.file_name())))
}
