mod new;
mod pending;
mod run;
mod skip;
mod version;

pub use new::NewCommand;
pub use pending::PendingCommand;
pub use run::RunCommand;
pub use skip::SkipCommand;
pub use version::VersionCommand;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use onward_core::config::OnwardConfig;
use onward_core::error::OnwardError;
use onward_core::migration::MigrationEngine;
use onward_runtime::{Database, DirectorySource};

/// onward - forward-only PostgreSQL migrations
///
/// Configuration comes from the environment: ONWARD_DIR selects the
/// directory holding migration files and DATABASE_URL the database.
/// A `.env` in the current directory is loaded first, then one in
/// ONWARD_DIR. Variables already set are never overridden.
#[derive(Parser)]
#[command(name = "onward")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new migration file.
    New(NewCommand),

    /// Apply all pending migrations.
    Run(RunCommand),

    /// Show the latest local and applied versions.
    Version(VersionCommand),

    /// List pending migrations. Exits with 1 when any exist.
    Pending(PendingCommand),

    /// Mark versions as applied without running them.
    Skip(SkipCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<ExitCode> {
        dotenvy::dotenv().ok();
        if let Some(path) = dir_env_file(std::env::var("ONWARD_DIR").ok().as_deref()) {
            dotenvy::from_path(&path).ok();
        }

        let config = OnwardConfig::from_env()?;
        onward_runtime::init_logging(&config.logging)?;

        match self.command {
            Commands::New(cmd) => cmd.execute(&config).await,
            Commands::Run(cmd) => cmd.execute(&config).await,
            Commands::Version(cmd) => cmd.execute(&config).await,
            Commands::Pending(cmd) => cmd.execute(&config).await,
            Commands::Skip(cmd) => cmd.execute(&config).await,
        }
    }
}

/// `.env` inside the configured working directory, if there is one.
fn dir_env_file(dir: Option<&str>) -> Option<PathBuf> {
    let path = PathBuf::from(dir?).join(".env");
    path.is_file().then_some(path)
}

/// Open the database and build an engine over the configured directory.
///
/// The returned [`Database`] must be closed by the caller once done.
pub(crate) async fn connect(
    config: &OnwardConfig,
) -> std::result::Result<(Database, MigrationEngine), OnwardError> {
    let db = Database::from_config(&config.database).await?;
    let source = Arc::new(DirectorySource::from_config(&config.migrations));
    let engine = MigrationEngine::new(source, Arc::new(db.executor()), &config.database.schema)?
        .with_orphan_policy(config.migrations.orphan_policy);
    Ok((db, engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_commands() {
        assert!(Cli::try_parse_from(["onward", "new", "add-users"]).is_ok());
        assert!(Cli::try_parse_from(["onward", "new"]).is_ok());
        assert!(Cli::try_parse_from(["onward", "run"]).is_ok());
        assert!(Cli::try_parse_from(["onward", "version", "--json"]).is_ok());
        assert!(Cli::try_parse_from(["onward", "pending"]).is_ok());
    }

    #[test]
    fn test_cli_parse_skip_versions() {
        let cli = Cli::try_parse_from(["onward", "skip", "3", "10", "-1"]).unwrap();
        match cli.command {
            Commands::Skip(cmd) => assert_eq!(cmd.versions, vec![3, 10, -1]),
            _ => panic!("expected skip"),
        }
    }

    #[test]
    fn test_cli_skip_requires_versions() {
        assert!(Cli::try_parse_from(["onward", "skip"]).is_err());
        assert!(Cli::try_parse_from(["onward", "skip", "abc"]).is_err());
    }

    #[test]
    fn test_dir_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        assert_eq!(dir_env_file(Some(dir_str)), None);
        assert_eq!(dir_env_file(None), None);

        std::fs::write(dir.path().join(".env"), "DATABASE_URL=postgres://localhost/app\n").unwrap();
        assert_eq!(dir_env_file(Some(dir_str)), Some(dir.path().join(".env")));
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["onward", "down"]).is_err());
    }
}
