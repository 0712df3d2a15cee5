use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Executor, Row};

use onward_core::config::DatabaseConfig;
use onward_core::error::{OnwardError, Result};
use onward_core::migration::{QueryExecutor, VersionRow};

/// Database connection wrapper providing connection pooling.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection from configuration.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let url = config.require_url()?;
        let timeout_sql = statement_timeout_sql(config.statement_timeout_secs);

        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.pool_timeout_secs))
            .after_connect(move |conn, _meta| {
                let timeout_sql = timeout_sql.clone();
                Box::pin(async move {
                    if let Some(sql) = timeout_sql {
                        sqlx::query(&sql).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            })
            .connect(url)
            .await
            .map_err(|e| OnwardError::Database(format!("Failed to connect: {}", e)))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Query executor sharing this pool.
    pub fn executor(&self) -> PgExecutor {
        PgExecutor::new(self.pool.clone())
    }

    /// Close all connections gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn statement_timeout_sql(secs: u64) -> Option<String> {
    (secs > 0).then(|| format!("SET statement_timeout = {}", secs * 1000))
}

/// [`QueryExecutor`] over a PostgreSQL pool.
///
/// Every call checks out one connection and returns it to the pool when the
/// call finishes, whether it succeeded or not.
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Driver failures convert into `OnwardError::Sql`, keeping the sqlx error.
    async fn run(&self, sql: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // Simple query protocol, so multi-statement text is accepted.
        conn.execute(sqlx::raw_sql(sql)).await?;
        Ok(())
    }

    async fn fetch_versions(&self, sql: &str) -> Result<Vec<VersionRow>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(sql).fetch_all(&mut *conn).await?;

        rows.iter()
            .map(|row| -> Result<VersionRow> {
                let version = row.try_get::<i64, _>("version")?;
                Ok(VersionRow { version })
            })
            .collect()
    }
}

impl QueryExecutor for PgExecutor {
    fn execute(&self, sql: &str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let sql = sql.to_string();
        Box::pin(async move { self.run(&sql).await })
    }

    fn query_versions(
        &self,
        sql: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<VersionRow>>> + Send + '_>> {
        let sql = sql.to_string();
        Box::pin(async move { self.fetch_versions(&sql).await })
    }
}
