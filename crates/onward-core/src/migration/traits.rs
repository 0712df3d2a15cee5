use std::future::Future;
use std::pin::Pin;

use super::{Version, VersionRow};
use crate::error::Result;

/// Runs query text against the backing database.
///
/// Implementations own connection handling; each call acquires what it needs
/// and releases it before the returned future completes.
pub trait QueryExecutor: Send + Sync {
    /// Execute statement text that returns no rows of interest.
    fn execute(&self, sql: &str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Execute a query and decode its `version` column.
    fn query_versions(
        &self,
        sql: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<VersionRow>>> + Send + '_>>;
}

/// Supplies candidate migration identifiers and their script bodies.
pub trait MigrationSource: Send + Sync {
    /// Raw identifiers, in no particular order.
    fn list(&self) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>>;

    /// Full script text for an identifier returned by [`MigrationSource::list`].
    fn read(&self, locator: &str) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

/// Durable record of applied versions.
pub trait VersionStore: Send + Sync {
    /// Create the backing structure if it does not exist yet.
    fn ensure(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Applied versions, ascending.
    fn applied(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Version>>> + Send + '_>>;

    /// Mark a version as applied. Recording a present version is a no-op.
    fn record(&self, version: Version) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
