use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use onward_core::config::OnwardConfig;
use onward_core::migration::{normalize_local, MigrationSource, Version};
use onward_runtime::DirectorySource;

/// Create a new migration file.
#[derive(Parser)]
pub struct NewCommand {
    /// Short description used in the file name.
    #[arg(default_value = "migration")]
    pub name: String,

    /// Do not open $EDITOR on the new file.
    #[arg(long)]
    pub no_edit: bool,
}

impl NewCommand {
    pub async fn execute(self, config: &OnwardConfig) -> Result<ExitCode> {
        let source = DirectorySource::from_config(&config.migrations);
        let local = normalize_local(source.list().await?)?;
        let version = next_version(local.last().map(|m| m.version));

        let path = source.create(version, &self.name).await?;
        println!("  {} Created {}", style("✓").green(), path.display());

        if !self.no_edit {
            if let Ok(editor) = std::env::var("EDITOR") {
                open_editor(&editor, &path).await?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn next_version(latest: Option<Version>) -> Version {
    latest.map_or(1, |v| v + 1)
}

async fn open_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        return Ok(());
    };

    let status = tokio::process::Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .await
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
        anyhow::bail!("Editor '{}' exited with {}", editor, status);
    }
    Ok(())
}
