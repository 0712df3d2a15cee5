use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::traits::{QueryExecutor, VersionStore};
use super::Version;
use crate::config::validate_identifier;
use crate::error::Result;

/// Version store kept in `<schema>.migrations` through a [`QueryExecutor`].
pub struct SqlVersionStore {
    executor: Arc<dyn QueryExecutor>,
    schema: String,
}

impl SqlVersionStore {
    pub fn new(executor: Arc<dyn QueryExecutor>, schema: impl Into<String>) -> Result<Self> {
        let schema = schema.into();
        validate_identifier(&schema)?;
        Ok(Self { executor, schema })
    }

    /// Qualified name of the version table.
    pub fn table(&self) -> String {
        format!("{}.migrations", self.schema)
    }

    fn ensure_sql(&self) -> String {
        format!(
            r#"
            CREATE SCHEMA IF NOT EXISTS {schema};
            CREATE TABLE IF NOT EXISTS {table} (
                version BIGINT PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
            schema = self.schema,
            table = self.table()
        )
    }

    fn applied_sql(&self) -> String {
        format!("SELECT version FROM {} ORDER BY version ASC", self.table())
    }

    fn record_sql(&self, version: Version) -> String {
        format!(
            "INSERT INTO {} (version) VALUES ({}) ON CONFLICT (version) DO NOTHING",
            self.table(),
            version
        )
    }
}

impl VersionStore for SqlVersionStore {
    fn ensure(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move { self.executor.execute(&self.ensure_sql()).await })
    }

    fn applied(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Version>>> + Send + '_>> {
        Box::pin(async move {
            let rows = self.executor.query_versions(&self.applied_sql()).await?;
            Ok(rows.into_iter().map(|row| row.version).collect())
        })
    }

    fn record(&self, version: Version) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move { self.executor.execute(&self.record_sql(version)).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OnwardError;
    use crate::testing::RecordingExecutor;

    #[test]
    fn test_rejects_unsafe_schema() {
        let executor = Arc::new(RecordingExecutor::new());
        let err = SqlVersionStore::new(executor, "x; DROP SCHEMA public").err();
        assert!(matches!(err, Some(OnwardError::Config(_))));
    }

    #[tokio::test]
    async fn test_ensure_is_create_if_not_exists() {
        let executor = Arc::new(RecordingExecutor::new());
        let store = SqlVersionStore::new(executor.clone(), "onward").unwrap();

        store.ensure().await.unwrap();

        let statements = executor.statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("CREATE SCHEMA IF NOT EXISTS onward;"));
        assert!(statements[0].contains("CREATE TABLE IF NOT EXISTS onward.migrations"));
        assert!(statements[0].contains("version BIGINT PRIMARY KEY"));
        assert!(statements[0].contains("created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()"));
    }

    #[tokio::test]
    async fn test_applied_decodes_rows() {
        let executor = Arc::new(RecordingExecutor::with_versions(vec![1, 4, 9]));
        let store = SqlVersionStore::new(executor.clone(), "meta").unwrap();

        assert_eq!(store.applied().await.unwrap(), vec![1, 4, 9]);
        assert_eq!(
            executor.statements(),
            vec!["SELECT version FROM meta.migrations ORDER BY version ASC".to_string()]
        );
    }

    #[tokio::test]
    async fn test_record_is_idempotent_insert() {
        let executor = Arc::new(RecordingExecutor::new());
        let store = SqlVersionStore::new(executor.clone(), "onward").unwrap();

        store.record(12).await.unwrap();

        assert_eq!(
            executor.statements(),
            vec![
                "INSERT INTO onward.migrations (version) VALUES (12) ON CONFLICT (version) DO NOTHING"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_executor_errors_propagate() {
        let executor = Arc::new(RecordingExecutor::new());
        executor.fail_on("INSERT INTO");
        let store = SqlVersionStore::new(executor, "onward").unwrap();

        let err = store.record(1).await.unwrap_err();
        assert!(err.is_database());
    }
}
