mod auth;
mod backport;
mod cli;
mod config;
mod error;
mod flake;
mod github;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting repoaudit - GitHub Repository Audit Tool");
    cli.execute().await?;

    Ok(())
}
