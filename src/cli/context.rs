//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by every command that talks to GitHub.

use crate::cli::style::{Stylize, check, spinner_style};
use indicatif::ProgressBar;
use pr_chain::auth::get_github_auth;
use pr_chain::config::Config;
use pr_chain::error::Result;
use pr_chain::graph::build_pr_chains;
use pr_chain::platform::{
    PlatformService, create_platform_service, filter_by_author, parse_repo_info,
};
use pr_chain::repo::{GitRepo, RepoLock};
use pr_chain::types::{Platform, PlatformConfig, PrChain};
use std::time::Duration;
use tracing::debug;

/// Shared context for CLI commands that interact with the platform
///
/// Opens the working copy, works out which GitHub repository it belongs to
/// and authenticates against it.
pub struct CommandContext {
    /// Effective configuration
    pub config: Config,
    /// The local working copy
    pub repo: GitRepo,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Create a new command context
    pub async fn new(config: Config) -> Result<Self> {
        let repo = GitRepo::from_config(&config)?;

        let detected = repo
            .remote_url()
            .ok()
            .and_then(|url| parse_repo_info(&url).ok());
        let platform_config = match (config.github_repo_parts()?, detected) {
            (Some((owner, name)), detected) => PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo: name,
                host: detected.and_then(|d| d.host),
            },
            (None, Some(detected)) => detected,
            (None, None) => parse_repo_info(&repo.remote_url()?)?,
        };
        debug!(owner = %platform_config.owner, repo = %platform_config.repo, "using repository");

        let auth = get_github_auth().await?;
        let platform = create_platform_service(&platform_config, &auth, config.branch_rules)?;

        Ok(Self {
            config,
            repo,
            platform,
        })
    }

    /// Configured branch prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.config.branch_prefix.as_deref()
    }

    /// Take the working-copy lock for a mutating command
    pub fn lock(&self) -> Result<RepoLock> {
        RepoLock::acquire(&self.repo.git_dir()?)
    }

    /// Login whose PRs are considered
    pub async fn username(&self) -> Result<String> {
        match &self.config.username {
            Some(user) => Ok(user.clone()),
            None => self.platform.current_user().await,
        }
    }

    /// List the user's open PRs and build their chains
    pub async fn fetch_chains(&self) -> Result<Vec<PrChain>> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message("Fetching open pull requests...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        let username = self.username().await?;
        let prs = filter_by_author(self.platform.list_open_prs().await?, &username);
        let chains = build_pr_chains(&prs);

        spinner.finish_with_message(format!(
            "{} Found {} open PR(s) by {} in {} chain(s)",
            check(),
            prs.len(),
            username.accent(),
            chains.len()
        ));
        Ok(chains)
    }
}
