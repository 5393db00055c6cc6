//! Bump command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use gantry_core::config::load_config_or_default;
use gantry_core::error::GitError;
use gantry_core::{BumpLevel, CiContext};
use gantry_git::{clone_branch, git_push, rebase_signoff, RepoRef};
use gantry_npm::bump_package;
use gantry_npm::manifest::read_package_info;

use crate::cli::{output, Cli, OutputFormat};

/// Bump the package version on a branch and push the result
///
/// Works in a per-run clone under the runner's temp directory; the clone is
/// left behind for the runner to dispose of.
#[derive(Debug, Args)]
pub struct BumpCommand {
    /// Bump level to apply
    #[arg(short, long, default_value = "patch")]
    pub level: BumpLevel,

    /// Repository to bump, in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Branch to bump
    #[arg(long, env = "CURRENT_BRANCH")]
    pub branch: String,

    /// Scratch directory for the clone
    #[arg(long, env = "RUNNER_TEMP")]
    pub temp_dir: Option<PathBuf>,

    /// Sub-package directory inside the repository
    #[arg(long)]
    pub base_directory: Option<PathBuf>,
}

impl BumpCommand {
    /// Execute the bump command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            level = %self.level,
            repository = %self.repository,
            branch = %self.branch,
            "executing bump command"
        );
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd);

        let temp = self.temp_dir.clone().unwrap_or_else(std::env::temp_dir);
        let ctx = CiContext::new(&self.repository, &self.branch, temp);
        let repo_ref = RepoRef::parse(&ctx.repository)?;

        let dest = ctx.clone_dir();
        let repo = clone_branch(&repo_ref.https_url(), &dest, &ctx.branch)?;

        let pkg_dir = match &self.base_directory {
            Some(base) => dest.join(base),
            None => dest.clone(),
        };
        let previous = read_package_info(&pkg_dir)?.version;

        let tag = bump_package(&dest, self.base_directory.as_deref(), self.level)?;

        if config.git.signoff {
            rebase_signoff(repo.path())?;
        }

        git_push(repo.path(), &config.git.remote, &ctx.branch)?;
        if !repo.is_sync(&config.git.remote, &ctx.branch)? {
            return Err(GitError::OutOfSync {
                branch: ctx.branch.clone(),
            }
            .into());
        }

        self.output_result(&previous, &tag, cli)
    }

    fn output_result(&self, previous: &str, tag: &str, cli: &Cli) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "repository": self.repository,
                    "branch": self.branch,
                    "level": self.level,
                    "previous_version": previous,
                    "tag": tag,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Version Bump"));
                    println!();
                    println!("  Repository:       {}", self.repository);
                    println!("  Branch:           {}", self.branch);
                    println!("  Previous version: {}", style(previous).cyan());
                    println!("  New version:      {}", style(tag).green().bold());
                }
                output::success(&format!("pushed {} to {}", tag, self.branch));
            }
        }
        Ok(())
    }
}
