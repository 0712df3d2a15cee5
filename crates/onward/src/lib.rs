//! onward - forward-only schema migrations for PostgreSQL.
//!
//! The `onward` binary is the usual entry point. The re-exports below let
//! other programs embed the same engine.

pub use onward_core::config::{OnwardConfig, OrphanPolicy};
pub use onward_core::error::{OnwardError, Result};
pub use onward_core::migration::{
    LatestVersions, Migration, MigrationEngine, MigrationSource, PendingSet, QueryExecutor,
    Version, VersionStore,
};
pub use onward_runtime::{init_logging, Database, DirectorySource, PgExecutor};
