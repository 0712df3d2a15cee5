use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console::style;

use onward_core::config::OnwardConfig;
use onward_core::migration::Version;

use super::connect;

/// Show the latest local and applied versions.
#[derive(Parser)]
pub struct VersionCommand {
    /// Print the versions as JSON.
    #[arg(long)]
    pub json: bool,
}

impl VersionCommand {
    pub async fn execute(self, config: &OnwardConfig) -> Result<ExitCode> {
        let (db, engine) = connect(config).await?;
        let result = engine.latest_versions().await;
        db.close().await;
        let latest = result?;

        if self.json {
            println!("{}", serde_json::to_string(&latest)?);
        } else {
            println!("  Local:  {}", display(latest.local));
            println!("  Remote: {}", display(latest.remote));
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn display(version: Option<Version>) -> String {
    match version {
        Some(v) => style(v).cyan().to_string(),
        None => style("none").dim().to_string(),
    }
}
