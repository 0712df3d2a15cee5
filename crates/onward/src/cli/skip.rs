use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console::style;

use onward_core::config::OnwardConfig;
use onward_core::migration::Version;

use super::connect;

/// Mark versions as applied without running them.
#[derive(Parser)]
pub struct SkipCommand {
    /// Versions to record.
    #[arg(required = true, allow_negative_numbers = true)]
    pub versions: Vec<Version>,
}

impl SkipCommand {
    pub async fn execute(self, config: &OnwardConfig) -> Result<ExitCode> {
        let (db, engine) = connect(config).await?;

        let mut result = Ok(());
        for version in &self.versions {
            if let Err(e) = engine.skip(*version).await {
                result = Err(e);
                break;
            }
            println!("  {} Skipped {}", style("✓").green(), version);
        }

        db.close().await;
        result?;
        Ok(ExitCode::SUCCESS)
    }
}
