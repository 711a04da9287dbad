//! Shared test utilities

#![allow(dead_code)]

mod mock_platform;
mod mock_vcs;
mod temp_git;

pub use mock_platform::{CreatePrCall, MockPlatformService, ReviewCall};
pub use mock_vcs::{MockVcs, VcsCall};
pub use temp_git::TempGitRepo;

use pr_chain::ids::{BaseBranch, HeadBranch};
use pr_chain::types::{PrChain, PullRequest};

/// Build an open PR from `base` to `head`
pub fn make_pr(number: u64, base: &str, head: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR for {head}"),
        head: HeadBranch::new(head).unwrap(),
        base: BaseBranch::new(base).unwrap(),
        author: "octocat".to_string(),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        is_draft: false,
    }
}

/// Chain over `branches` starting at `trunk`, numbered from 1
pub fn make_chain(trunk: &str, branches: &[&str]) -> PrChain {
    let mut prs = Vec::new();
    let mut base = trunk;
    for (i, head) in branches.iter().enumerate() {
        prs.push(make_pr(i as u64 + 1, base, head));
        base = head;
    }
    PrChain::new(prs).unwrap()
}
