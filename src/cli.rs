use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;

use crate::auth::Token;
use crate::backport;
use crate::config::Config;
use crate::flake;
use crate::github::cache::CacheStore;
use crate::github::client::GitHubClient;
use crate::output;

const GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_OWNER: &str = "opensearch-project";
const DEFAULT_REPO: &str = "OpenSearch-Dashboards";
const DEFAULT_CACHE_DIR: &str = "cache";
const DEFAULT_CONFIG_PATH: &str = "repoaudit.toml";

#[derive(Parser)]
#[command(name = "repoaudit")]
#[command(author, version, about = "GitHub Repository Audit Tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file supplying flag defaults [default: repoaudit.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct CommonArgs {
    /// API auth token
    #[arg(short, long, env = "GITHUB_TOKEN")]
    auth: Option<String>,

    /// Repository owner [default: opensearch-project]
    #[arg(long)]
    owner: Option<String>,

    /// Repository name [default: OpenSearch-Dashboards]
    #[arg(long)]
    repo: Option<String>,

    /// Read previously fetched data from the local cache when present
    #[arg(short, long, default_value_t = false)]
    use_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report pull requests whose backport labels have no matching backport PR
    Backports {
        #[command(flatten)]
        common: CommonArgs,

        /// Where to write the Markdown report
        #[arg(short, long, default_value = backport::report::DEFAULT_REPORT_PATH)]
        report: PathBuf,
    },
    /// Aggregate workflow runs and jobs into failure statistics
    Flakes {
        #[command(flatten)]
        common: CommonArgs,

        /// Maximum workflow runs to fetch [default: 300]
        #[arg(short, long)]
        limit: Option<usize>,

        /// Restrict workflow runs to a branch
        #[arg(short, long)]
        branch: Option<String>,

        /// Write statistics as JSON to this path instead of printing tables
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(short, long, default_value_t = false)]
        pretty: bool,
    },
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.command {
            Commands::Backports { common, report } => {
                self.execute_backports(&config, common, report).await
            }
            Commands::Flakes {
                common,
                limit,
                branch,
                output,
                pretty,
            } => {
                self.execute_flakes(&config, common, *limit, branch.as_deref(), output.as_deref(), *pretty)
                    .await
            }
        }
    }

    fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
        };
        Ok(config)
    }

    fn build_client(&self, config: &Config, common: &CommonArgs) -> Result<(GitHubClient, CacheStore)> {
        let auth = common.auth.clone().or_else(|| config.github.auth.clone());
        let token = auth.map(Token::from);
        let owner = common
            .owner
            .clone()
            .or_else(|| config.github.owner.clone())
            .unwrap_or_else(|| DEFAULT_OWNER.to_string());
        let repo = common
            .repo
            .clone()
            .or_else(|| config.github.repo.clone())
            .unwrap_or_else(|| DEFAULT_REPO.to_string());
        let use_cache = common.use_cache || config.audit.use_cache;

        let client = GitHubClient::new(GITHUB_API_URL, owner, repo, token.as_ref())?;
        let cache = CacheStore::new(DEFAULT_CACHE_DIR, use_cache)?;

        Ok((client, cache))
    }

    async fn execute_backports(
        &self,
        config: &Config,
        common: &CommonArgs,
        report_path: &Path,
    ) -> Result<()> {
        let (client, cache) = self.build_client(config, common)?;
        info!(
            "Auditing backports for repository: {}/{}",
            client.owner(),
            client.repo()
        );

        let summary = backport::run(&client, &cache).await?;
        backport::report::write_report(report_path, summary.missing.values())?;
        output::print_backport_summary(&summary, report_path);

        Ok(())
    }

    async fn execute_flakes(
        &self,
        config: &Config,
        common: &CommonArgs,
        limit: Option<usize>,
        branch: Option<&str>,
        output_path: Option<&Path>,
        pretty: bool,
    ) -> Result<()> {
        let (client, cache) = self.build_client(config, common)?;
        info!(
            "Collecting CI failure statistics for repository: {}/{}",
            client.owner(),
            client.repo()
        );

        let limit = limit.unwrap_or(config.audit.limit);
        let branch = branch.or(config.audit.branch.as_deref());

        let stats = flake::run(&client, &cache, limit, branch).await?;

        if let Some(path) = output_path {
            let json = if pretty {
                serde_json::to_string_pretty(&stats)?
            } else {
                serde_json::to_string(&stats)?
            };
            std::fs::write(path, json)?;
            info!("Statistics written to: {}", path.display());
        } else {
            output::print_flake_summary(&stats);
        }

        Ok(())
    }
}
