//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use pr_chain::error::{Error, Result};
use pr_chain::ids::{BaseBranch, Branch, HeadBranch};
use pr_chain::platform::PlatformService;
use pr_chain::types::{Platform, PlatformConfig, PullRequest};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr_with_options`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub draft: bool,
}

/// Call record for `request_reviewers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCall {
    pub pr_number: u64,
    pub reviewers: Vec<String>,
}

/// Simple mock platform service for testing
///
/// Holds a list of open PRs that title updates and publishing act on, records
/// every mutating call, and can be told to fail.
pub struct MockPlatformService {
    config: PlatformConfig,
    user: String,
    next_pr_number: AtomicU64,
    open_prs: Mutex<Vec<PullRequest>>,
    remote_branches: Mutex<HashSet<String>>,
    // Call tracking
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    update_title_calls: Mutex<Vec<(u64, String)>>,
    review_calls: Mutex<Vec<ReviewCall>>,
    publish_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    error_on_update_title: Mutex<Option<String>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create an empty mock acting as `octocat`
    pub fn new() -> Self {
        Self {
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner: "test".to_string(),
                repo: "repo".to_string(),
                host: None,
            },
            user: "octocat".to_string(),
            next_pr_number: AtomicU64::new(100),
            open_prs: Mutex::new(Vec::new()),
            remote_branches: Mutex::new(HashSet::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            update_title_calls: Mutex::new(Vec::new()),
            review_calls: Mutex::new(Vec::new()),
            publish_calls: Mutex::new(Vec::new()),
            error_on_list: Mutex::new(None),
            error_on_update_title: Mutex::new(None),
        }
    }

    /// Seed the open PRs returned by `list_open_prs`
    pub fn set_open_prs(&self, prs: Vec<PullRequest>) {
        *self.open_prs.lock().unwrap() = prs;
    }

    /// Mark branches as present on the remote
    pub fn add_remote_branches(&self, branches: &[&str]) {
        let mut set = self.remote_branches.lock().unwrap();
        set.extend(branches.iter().map(|b| (*b).to_string()));
    }

    // === Error injection methods ===

    /// Make `list_open_prs` return an error
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_pr_title` return an error
    pub fn fail_update_title(&self, msg: &str) {
        *self.error_on_update_title.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_update_title_calls(&self) -> Vec<(u64, String)> {
        self.update_title_calls.lock().unwrap().clone()
    }

    pub fn get_review_calls(&self) -> Vec<ReviewCall> {
        self.review_calls.lock().unwrap().clone()
    }

    pub fn get_publish_calls(&self) -> Vec<u64> {
        self.publish_calls.lock().unwrap().clone()
    }

    fn find_pr(&self, pr_number: u64) -> Result<PullRequest> {
        self.open_prs
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.number == pr_number)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} not found")))
    }

    fn modify_pr(&self, pr_number: u64, f: impl FnOnce(&mut PullRequest)) -> Result<PullRequest> {
        let mut prs = self.open_prs.lock().unwrap();
        let pr = prs
            .iter_mut()
            .find(|p| p.number == pr_number)
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} not found")))?;
        f(pr);
        Ok(pr.clone())
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>> {
        if let Some(msg) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self.open_prs.lock().unwrap().clone())
    }

    async fn current_user(&self) -> Result<String> {
        Ok(self.user.clone())
    }

    async fn create_pr_with_options(
        &self,
        head: &Branch,
        base: &Branch,
        title: &str,
        _body: Option<&str>,
        draft: bool,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            draft,
        });

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            title: title.to_string(),
            head: HeadBranch::from(head.clone()),
            base: BaseBranch::from(base.clone()),
            author: self.user.clone(),
            html_url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.config.owner, self.config.repo
            ),
            is_draft: draft,
        };
        self.open_prs.lock().unwrap().push(pr.clone());
        Ok(pr)
    }

    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<PullRequest> {
        if let Some(msg) = self.error_on_update_title.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        self.update_title_calls
            .lock()
            .unwrap()
            .push((pr_number, title.to_string()));
        self.modify_pr(pr_number, |pr| pr.title = title.to_string())
    }

    async fn request_reviewers(&self, pr_number: u64, reviewers: &[String]) -> Result<()> {
        self.find_pr(pr_number)?;
        self.review_calls.lock().unwrap().push(ReviewCall {
            pr_number,
            reviewers: reviewers.to_vec(),
        });
        Ok(())
    }

    async fn publish_pr(&self, pr_number: u64) -> Result<PullRequest> {
        self.publish_calls.lock().unwrap().push(pr_number);
        self.modify_pr(pr_number, |pr| pr.is_draft = false)
    }

    async fn branch_exists(&self, branch: &Branch) -> Result<bool> {
        Ok(self.remote_branches.lock().unwrap().contains(branch.as_str()))
    }
}
