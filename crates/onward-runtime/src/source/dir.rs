use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::io::AsyncWriteExt;
use tracing::debug;

use onward_core::config::MigrationsConfig;
use onward_core::error::{OnwardError, Result};
use onward_core::migration::{MigrationSource, Version};

/// Migration files in one directory, matched by extension.
///
/// Identifiers are bare file names; subdirectories are not searched.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &MigrationsConfig) -> Self {
        Self::new(&config.dir, &config.extension)
    }

    /// File name for a new migration, e.g. `12-add-users.sql`.
    pub fn file_name(&self, version: Version, name: &str) -> String {
        format!("{}-{}.{}", version, slugify(name), self.extension)
    }

    /// Create an empty migration file. Never overwrites an existing file.
    pub async fn create(&self, version: Version, name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(self.file_name(version, name));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let header = format!(
            "-- Migration {}: {}\n-- Statements run inside a single DO block.\n\n",
            version,
            name.trim()
        );
        file.write_all(header.as_bytes()).await?;
        file.flush().await?;

        debug!("Created migration file {}", path.display());
        Ok(path)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e == self.extension.as_str())
            .unwrap_or(false)
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Migrations directory does not exist: {:?}", self.dir);
                return Ok(Vec::new());
            }
            Err(e) => return Err(OnwardError::Io(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() || !self.matches_extension(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                names.push(name.to_string());
            }
        }

        debug!("Listed {} candidate files in {:?}", names.len(), self.dir);
        Ok(names)
    }
}

impl MigrationSource for DirectorySource {
    fn list(&self) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>> {
        Box::pin(self.list_files())
    }

    fn read(&self, locator: &str) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let path = self.dir.join(locator);
        Box::pin(async move {
            tokio::fs::read_to_string(&path).await.map_err(|e| {
                OnwardError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read {}: {}", path.display(), e),
                ))
            })
        })
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed to one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "migration".to_string()
    } else {
        slug.to_string()
    }
}
