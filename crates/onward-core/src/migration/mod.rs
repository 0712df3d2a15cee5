mod block;
mod engine;
mod local;
mod pending;
mod store;
mod traits;
mod version;

pub use block::wrap_in_block;
pub use engine::MigrationEngine;
pub use local::normalize_local;
pub use pending::{compute_pending, PendingSet};
pub use store::SqlVersionStore;
pub use traits::{MigrationSource, QueryExecutor, VersionStore};
pub use version::{basename, parse_version};

use serde::Serialize;

/// Migration version number, stored as `BIGINT`.
pub type Version = i64;

/// One local change script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// Parsed from the leading digits of the identifier's basename.
    pub version: Version,
    /// Identifier as listed by the source, used to read the body back.
    pub name: String,
}

impl Migration {
    pub fn new(version: Version, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
        }
    }
}

/// A row of the applied-version table, reduced to the one column we read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRow {
    pub version: Version,
}

/// Highest known version on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatestVersions {
    pub local: Option<Version>,
    pub remote: Option<Version>,
}
