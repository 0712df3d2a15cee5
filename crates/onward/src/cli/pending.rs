use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console::style;

use onward_core::config::OnwardConfig;
use onward_core::migration::PendingSet;

use super::connect;

/// List pending migrations.
#[derive(Parser)]
pub struct PendingCommand {
    /// Print the pending set (migrations and orphaned versions) as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PendingCommand {
    pub async fn execute(self, config: &OnwardConfig) -> Result<ExitCode> {
        let (db, engine) = connect(config).await?;
        let result = engine.pending().await;
        db.close().await;
        let pending = result?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&pending)?);
        } else {
            for version in &pending.orphaned {
                println!(
                    "  {} Applied version {} has no local migration",
                    style("!").yellow(),
                    version
                );
            }
            if pending.is_empty() {
                println!("  {} Up to date", style("✓").green());
            }
            for migration in &pending.migrations {
                println!("  {} {}", style("○").yellow(), style(&migration.name).yellow());
            }
        }

        Ok(ExitCode::from(pending_exit_code(&pending)))
    }
}

/// 0 when up to date, 1 when migrations are waiting. Orphans alone do not count.
fn pending_exit_code(pending: &PendingSet) -> u8 {
    if pending.is_empty() {
        0
    } else {
        1
    }
}
