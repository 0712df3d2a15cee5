use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console::style;

use onward_core::config::OnwardConfig;
use onward_core::error::OnwardError;
use onward_core::migration::Version;

use super::connect;

/// Exit code for a failure reported by the database.
pub const DATABASE_ERROR_EXIT: u8 = 2;

/// Exit code for any other failure.
pub const OTHER_ERROR_EXIT: u8 = 1;

/// Apply all pending migrations.
#[derive(Parser)]
pub struct RunCommand {}

impl RunCommand {
    pub async fn execute(self, config: &OnwardConfig) -> Result<ExitCode> {
        match run(config).await {
            Ok(applied) => {
                if applied.is_empty() {
                    println!("  {} Nothing to apply", style("ℹ").blue());
                } else {
                    for version in &applied {
                        println!("  {} Applied {}", style("✓").green(), version);
                    }
                    println!(
                        "  {} {} migration(s) applied",
                        style("✓").green(),
                        applied.len()
                    );
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("  {} {}", style("✗").red(), e);
                Ok(ExitCode::from(failure_exit_code(&e)))
            }
        }
    }
}

/// Exit code for a failed run: database failures are told apart from bad input.
fn failure_exit_code(err: &OnwardError) -> u8 {
    if err.is_database() {
        DATABASE_ERROR_EXIT
    } else {
        OTHER_ERROR_EXIT
    }
}

async fn run(config: &OnwardConfig) -> std::result::Result<Vec<Version>, OnwardError> {
    tracing::debug!("Using migrations in {:?}", config.migrations.dir);
    let (db, engine) = connect(config).await?;
    let result = engine.run_migrations().await;
    db.close().await;
    result
}
