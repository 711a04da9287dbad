//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::ids::{BaseBranch, Branch, BranchRules, HeadBranch};
use crate::platform::PlatformService;
use crate::types::{Platform, PlatformConfig, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::params::repos::Reference;
use serde::Deserialize;
use tracing::{debug, warn};

/// Page size for PR listing
const PER_PAGE: u8 = 100;

// GraphQL response types for publish_pr mutation

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadyForReviewData {
    mark_pull_request_ready_for_review: MarkReadyPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadyPayload {
    pull_request: GraphQlPullRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    number: u64,
    url: String,
    base_ref_name: String,
    head_ref_name: String,
    title: String,
    is_draft: bool,
    author: Option<GraphQlActor>,
}

#[derive(Deserialize)]
struct GraphQlActor {
    login: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    rules: BranchRules,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(
        token: &str,
        owner: String,
        repo: String,
        host: Option<String>,
        rules: BranchRules,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo,
                host,
            },
            rules,
        })
    }

    /// Convert an octocrab PR, validating both branch names
    fn pr_from_octocrab(&self, pr: octocrab::models::pulls::PullRequest) -> Result<PullRequest> {
        Ok(PullRequest {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            head: HeadBranch::with_rules(pr.head.ref_field.as_str(), &self.rules)?,
            base: BaseBranch::with_rules(pr.base.ref_field.as_str(), &self.rules)?,
            author: pr.user.map(|u| u.login).unwrap_or_default(),
            html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
            is_draft: pr.draft.unwrap_or(false),
        })
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>> {
        debug!(owner = %self.config.owner, repo = %self.config.repo, "listing open PRs");
        let first = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(PER_PAGE)
            .send()
            .await?;
        let all = self.client.all_pages(first).await?;

        let mut prs = Vec::with_capacity(all.len());
        for raw in all {
            let number = raw.number;
            match self.pr_from_octocrab(raw) {
                Ok(pr) => prs.push(pr),
                Err(e) => warn!(pr_number = number, error = %e, "skipping PR with invalid branch"),
            }
        }
        debug!(count = prs.len(), "listed open PRs");
        Ok(prs)
    }

    async fn current_user(&self) -> Result<String> {
        let user = self.client.current().user().await?;
        debug!(login = %user.login, "resolved current user");
        Ok(user.login)
    }

    async fn create_pr_with_options(
        &self,
        head: &Branch,
        base: &Branch,
        title: &str,
        body: Option<&str>,
        draft: bool,
    ) -> Result<PullRequest> {
        debug!(%head, %base, draft, "creating PR");
        let pulls = self.client.pulls(&self.config.owner, &self.config.repo);
        let mut builder = pulls
            .create(title, head.as_str(), base.as_str())
            .draft(draft);

        if let Some(body_text) = body {
            builder = builder.body(body_text);
        }

        let pr = builder.send().await?;

        let result = self.pr_from_octocrab(pr)?;
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<PullRequest> {
        debug!(pr_number, title, "updating PR title");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .title(title)
            .send()
            .await?;

        debug!(pr_number, "updated PR title");
        self.pr_from_octocrab(pr)
    }

    async fn request_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()> {
        if reviewers.is_empty() {
            return Ok(());
        }
        debug!(pr_number, ?reviewers, "requesting reviewers");
        self.client
            .pulls(&self.config.owner, &self.config.repo)
            .request_reviews(pr_number, reviewers.to_vec(), Vec::<String>::new())
            .await?;
        Ok(())
    }

    async fn publish_pr(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "publishing PR");
        // Fetch PR to get node_id for GraphQL mutation
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let node_id = pr.node_id.as_ref().ok_or_else(|| {
            Error::GitHubApi("PR missing node_id for GraphQL mutation".to_string())
        })?;

        // Execute GraphQL mutation to mark PR as ready for review
        let response: GraphQlResponse<MarkReadyForReviewData> = self
            .client
            .graphql(&serde_json::json!({
                "query": r"
                    mutation MarkPullRequestReadyForReview($pullRequestId: ID!) {
                        markPullRequestReadyForReview(input: { pullRequestId: $pullRequestId }) {
                            pullRequest {
                                number
                                url
                                baseRefName
                                headRefName
                                title
                                isDraft
                                author { login }
                            }
                        }
                    }
                ",
                "variables": {
                    "pullRequestId": node_id
                }
            }))
            .await
            .map_err(|e| Error::GitHubApi(format!("GraphQL mutation failed: {e}")))?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        let data = response
            .data
            .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))?;
        let published = data.mark_pull_request_ready_for_review.pull_request;

        debug!(pr_number, "published PR");
        Ok(PullRequest {
            number: published.number,
            title: published.title,
            head: HeadBranch::with_rules(published.head_ref_name.as_str(), &self.rules)?,
            base: BaseBranch::with_rules(published.base_ref_name.as_str(), &self.rules)?,
            author: published.author.map(|a| a.login).unwrap_or_default(),
            html_url: published.url,
            is_draft: published.is_draft,
        })
    }

    async fn branch_exists(&self, branch: &Branch) -> Result<bool> {
        let result = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                debug!(%branch, "branch not found on remote");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
