//! Reconciles local migrations with the applied-version record and applies
//! what is missing, one migration at a time.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::block::wrap_in_block;
use super::local::normalize_local;
use super::pending::{compute_pending, PendingSet};
use super::store::SqlVersionStore;
use super::traits::{MigrationSource, QueryExecutor, VersionStore};
use super::{LatestVersions, Migration, Version};
use crate::config::OrphanPolicy;
use crate::error::{OnwardError, Result};

/// Drives listing, diffing and applying migrations.
///
/// Every operation awaits each step before starting the next; migrations are
/// never applied concurrently.
pub struct MigrationEngine {
    source: Arc<dyn MigrationSource>,
    executor: Arc<dyn QueryExecutor>,
    store: Arc<dyn VersionStore>,
    orphan_policy: OrphanPolicy,
}

impl MigrationEngine {
    /// Engine that keeps its version record in `<schema>.migrations`.
    pub fn new(
        source: Arc<dyn MigrationSource>,
        executor: Arc<dyn QueryExecutor>,
        schema: &str,
    ) -> Result<Self> {
        let store = SqlVersionStore::new(executor.clone(), schema)?;
        Ok(Self::with_store(source, executor, Arc::new(store)))
    }

    /// Engine with a caller-supplied version store.
    pub fn with_store(
        source: Arc<dyn MigrationSource>,
        executor: Arc<dyn QueryExecutor>,
        store: Arc<dyn VersionStore>,
    ) -> Self {
        Self {
            source,
            executor,
            store,
            orphan_policy: OrphanPolicy::default(),
        }
    }

    /// Set how `run_migrations` treats applied versions with no local file.
    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    /// Local migrations, validated and sorted ascending.
    pub async fn list_local(&self) -> Result<Vec<Migration>> {
        let identifiers = self.source.list().await?;
        let migrations = normalize_local(identifiers)?;
        debug!("Found {} local migrations", migrations.len());
        Ok(migrations)
    }

    /// Applied versions, ascending. Creates the version table if needed.
    pub async fn list_remote(&self) -> Result<Vec<Version>> {
        self.store.ensure().await?;
        let mut versions = self.store.applied().await?;
        versions.sort_unstable();
        versions.dedup();
        debug!("Already applied versions: {:?}", versions);
        Ok(versions)
    }

    /// Local migrations not yet applied, plus any orphaned remote versions.
    ///
    /// The local list is validated before the database is touched.
    pub async fn pending(&self) -> Result<PendingSet> {
        let local = self.list_local().await?;
        let remote = self.list_remote().await?;

        let pending = compute_pending(&local, &remote);
        for version in &pending.orphaned {
            warn!(
                "Version {} is recorded as applied but has no local migration",
                version
            );
        }
        Ok(pending)
    }

    /// Execute one script as a single block, then record its version.
    ///
    /// If the script commits but recording fails, the version stays
    /// unrecorded; `skip` repairs that.
    pub async fn run_migration(&self, version: Version, script: &str) -> Result<()> {
        self.store.ensure().await?;
        self.apply(version, script).await
    }

    /// Apply every pending migration in ascending order, stopping at the first
    /// failure. Returns the versions applied.
    pub async fn run_migrations(&self) -> Result<Vec<Version>> {
        let pending = self.pending().await?;

        if self.orphan_policy == OrphanPolicy::Fail && !pending.orphaned.is_empty() {
            return Err(OnwardError::OrphanedVersions {
                versions: pending.orphaned,
            });
        }

        if pending.is_empty() {
            info!("No pending migrations");
            return Ok(Vec::new());
        }

        let mut applied = Vec::with_capacity(pending.migrations.len());
        for migration in &pending.migrations {
            let script = self.source.read(&migration.name).await?;
            self.apply(migration.version, &script).await?;
            applied.push(migration.version);
        }

        info!("Applied {} migrations", applied.len());
        Ok(applied)
    }

    /// Record `version` as applied without running anything.
    ///
    /// Any version is accepted, whether or not a local file exists for it.
    pub async fn skip(&self, version: Version) -> Result<()> {
        self.store.ensure().await?;
        self.store.record(version).await?;
        info!("Skipped migration {}", version);
        Ok(())
    }

    /// Highest local and highest applied version.
    pub async fn latest_versions(&self) -> Result<LatestVersions> {
        let local = self.list_local().await?;
        let remote = self.list_remote().await?;

        Ok(LatestVersions {
            local: local.last().map(|m| m.version),
            remote: remote.last().copied(),
        })
    }

    async fn apply(&self, version: Version, script: &str) -> Result<()> {
        info!("Applying migration: {}", version);

        self.executor
            .execute(&wrap_in_block(script))
            .await
            .map_err(|e| {
                OnwardError::Database(format!("Failed to apply migration {}: {}", version, e))
            })?;

        self.store.record(version).await.map_err(|e| {
            OnwardError::Database(format!("Failed to record migration {}: {}", version, e))
        })?;

        info!("Migration applied: {}", version);
        Ok(())
    }
}
