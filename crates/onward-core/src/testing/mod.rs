//! In-memory collaborators for exercising the engine without a database.
//!
//! Enabled by the `testing` feature.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};

use crate::error::{OnwardError, Result};
use crate::migration::{MigrationSource, QueryExecutor, Version, VersionRow, VersionStore};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Query executor that records every statement it is handed.
#[derive(Default)]
pub struct RecordingExecutor {
    statements: Mutex<Vec<String>>,
    versions: Mutex<Vec<Version>>,
    fail_patterns: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor whose version queries return `versions`.
    pub fn with_versions(versions: Vec<Version>) -> Self {
        let executor = Self::default();
        *lock(&executor.versions) = versions;
        executor
    }

    /// Fail any statement containing `pattern`.
    pub fn fail_on(&self, pattern: impl Into<String>) {
        lock(&self.fail_patterns).push(pattern.into());
    }

    /// Statements executed so far, in order. Failed statements are included.
    pub fn statements(&self) -> Vec<String> {
        lock(&self.statements).clone()
    }

    fn record(&self, sql: &str) -> Result<()> {
        lock(&self.statements).push(sql.to_string());
        let failing = lock(&self.fail_patterns)
            .iter()
            .find(|pattern| sql.contains(pattern.as_str()))
            .cloned();
        match failing {
            Some(pattern) => Err(OnwardError::Database(format!(
                "simulated failure on '{}'",
                pattern
            ))),
            None => Ok(()),
        }
    }
}

impl QueryExecutor for RecordingExecutor {
    fn execute(&self, sql: &str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let result = self.record(sql);
        Box::pin(async move { result })
    }

    fn query_versions(
        &self,
        sql: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<VersionRow>>> + Send + '_>> {
        let result: Result<Vec<VersionRow>> = self.record(sql).map(|_| {
            lock(&self.versions)
                .iter()
                .map(|&version| VersionRow { version })
                .collect()
        });
        Box::pin(async move { result })
    }
}

/// Migration source backed by a map of identifier to script body.
#[derive(Default)]
pub struct MemorySource {
    files: Mutex<BTreeMap<String, String>>,
    reads: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, identifier: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(identifier, body);
        self
    }

    pub fn insert(&self, identifier: impl Into<String>, body: impl Into<String>) {
        lock(&self.files).insert(identifier.into(), body.into());
    }

    /// Locators passed to `read`, in order.
    pub fn reads(&self) -> Vec<String> {
        lock(&self.reads).clone()
    }
}

impl MigrationSource for MemorySource {
    fn list(&self) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>> {
        // Reverse so callers cannot lean on the map's ordering.
        let identifiers: Vec<String> = lock(&self.files).keys().rev().cloned().collect();
        Box::pin(async move { Ok::<_, OnwardError>(identifiers) })
    }

    fn read(&self, locator: &str) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        lock(&self.reads).push(locator.to_string());
        let result = lock(&self.files).get(locator).cloned().ok_or_else(|| {
            OnwardError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no migration named {}", locator),
            ))
        });
        Box::pin(async move { result })
    }
}

/// Version store held in memory.
#[derive(Default)]
pub struct MemoryVersionStore {
    versions: Mutex<BTreeSet<Version>>,
    ensure_calls: Mutex<usize>,
    fail_record: Mutex<bool>,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(versions: impl IntoIterator<Item = Version>) -> Self {
        let store = Self::default();
        lock(&store.versions).extend(versions);
        store
    }

    /// Stored versions, ascending.
    pub fn versions(&self) -> Vec<Version> {
        lock(&self.versions).iter().copied().collect()
    }

    pub fn ensure_calls(&self) -> usize {
        *lock(&self.ensure_calls)
    }

    /// Make every subsequent `record` call fail.
    pub fn fail_records(&self) {
        *lock(&self.fail_record) = true;
    }
}

impl VersionStore for MemoryVersionStore {
    fn ensure(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        *lock(&self.ensure_calls) += 1;
        Box::pin(async { Ok::<_, OnwardError>(()) })
    }

    fn applied(&self) -> Pin<Box<dyn Future<Output = Result<Vec<Version>>> + Send + '_>> {
        let versions = self.versions();
        Box::pin(async move { Ok::<_, OnwardError>(versions) })
    }

    fn record(&self, version: Version) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let result = if *lock(&self.fail_record) {
            Err(OnwardError::Database(format!(
                "simulated failure recording version {}",
                version
            )))
        } else {
            lock(&self.versions).insert(version);
            Ok(())
        };
        Box::pin(async move { result })
    }
}
