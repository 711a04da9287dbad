//! PR-hosting platform services
//!
//! The chain engine only reads pull requests; everything that talks to the
//! hosting API sits behind [`PlatformService`].

mod detection;
mod factory;
mod github;

pub use detection::parse_repo_info;
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::ids::Branch;
use crate::types::PullRequest;
use async_trait::async_trait;

/// Platform service trait for PR operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// All open PRs in the repository
    ///
    /// PRs whose branch names fail validation are left out.
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>>;

    /// Login of the authenticated user
    async fn current_user(&self) -> Result<String>;

    /// Create a new PR with explicit body and draft options.
    async fn create_pr_with_options(
        &self,
        head: &Branch,
        base: &Branch,
        title: &str,
        body: Option<&str>,
        draft: bool,
    ) -> Result<PullRequest>;

    /// Replace the title of an existing PR
    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<PullRequest>;

    /// Ask users to review a PR
    async fn request_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()>;

    /// Publish a draft PR (convert to ready for review)
    async fn publish_pr(&self, pr_number: u64) -> Result<PullRequest>;

    /// Whether `branch` exists on the hosted repository
    async fn branch_exists(&self, branch: &Branch) -> Result<bool>;
}

/// Keep only PRs opened by `author`
pub fn filter_by_author(prs: Vec<PullRequest>, author: &str) -> Vec<PullRequest> {
    prs.into_iter()
        .filter(|pr| pr.author.eq_ignore_ascii_case(author))
        .collect()
}
