//! Core of onward: forward-only schema migrations.
//!
//! Local migration files are reconciled against the versions already
//! recorded in the database, and whatever is missing is applied in version
//! order. Database access and file access are supplied by the caller through
//! [`QueryExecutor`] and [`MigrationSource`].

pub mod config;
pub mod error;
pub mod migration;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::OnwardConfig;
pub use error::{OnwardError, Result};
pub use migration::{
    LatestVersions, Migration, MigrationEngine, MigrationSource, PendingSet, QueryExecutor,
    Version, VersionRow, VersionStore,
};
