mod cli;

use std::process::ExitCode;

use clap::Parser;
use console::style;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("  {} {:#}", style("✗").red(), e);
            ExitCode::FAILURE
        }
    }
}
