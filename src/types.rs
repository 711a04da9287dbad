//! Core types for pr-chain

use crate::error::{Error, Result};
use crate::ids::{BaseBranch, HeadBranch};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An open pull request, as reported by the hosting platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Head (source) branch
    pub head: HeadBranch,
    /// Base (target) branch
    pub base: BaseBranch,
    /// Login of the PR author
    pub author: String,
    /// Web URL for the PR
    pub html_url: String,
    /// Whether PR is a draft
    pub is_draft: bool,
}

/// A linear stack of pull requests, trunk-most first
///
/// Every adjacent pair satisfies `prs[i].head == prs[i + 1].base`, and the
/// chain is never empty. Both are checked on construction.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PrChain(Vec<PullRequest>);

impl PrChain {
    /// Build a chain, validating the stacking invariant
    pub fn new(prs: Vec<PullRequest>) -> Result<Self> {
        if prs.is_empty() {
            return Err(Error::Precondition("a chain needs at least one PR".to_string()));
        }
        if let Some(pair) = prs
            .windows(2)
            .find(|w| w[0].head.as_branch() != w[1].base.as_branch())
        {
            return Err(Error::Precondition(format!(
                "PR #{} has head {} but the next PR #{} has base {}",
                pair[0].number, pair[0].head, pair[1].number, pair[1].base
            )));
        }
        Ok(Self(prs))
    }

    /// Pull requests in stack order
    pub fn prs(&self) -> &[PullRequest] {
        &self.0
    }

    /// Iterate pull requests in stack order
    pub fn iter(&self) -> std::slice::Iter<'_, PullRequest> {
        self.0.iter()
    }

    /// Number of pull requests
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Base of the first PR (usually the trunk)
    pub fn base(&self) -> &BaseBranch {
        &self.0[0].base
    }

    /// Head of the last PR (the leaf)
    pub fn leaf(&self) -> &HeadBranch {
        &self.0[self.0.len() - 1].head
    }
}

impl<'a> IntoIterator for &'a PrChain {
    type Item = &'a PullRequest;
    type IntoIter = std::slice::Iter<'a, PullRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// `<base> <- <#n,#m,...> <- <head>`, the form shown when picking a chain
impl fmt::Display for PrChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numbers: Vec<String> = self.0.iter().map(|pr| format!("#{}", pr.number)).collect();
        write!(f, "{} <- {} <- {}", self.base(), numbers.join(","), self.leaf())
    }
}

/// A pull request that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestBlueprint {
    /// Head (source) branch
    pub head: HeadBranch,
    /// Base (target) branch
    pub base: BaseBranch,
    /// Title to create the PR with
    pub title: String,
}

/// Relation between a local branch and its remote tracking branch
///
/// `0` means synced, `-k` behind by `k` commits, `+k` ahead by `k` commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CheckoutResult(pub i64);

impl CheckoutResult {
    /// Local tip equals remote tracking tip
    pub const SYNCED: Self = Self(0);

    /// Whether local and remote agree
    pub const fn is_synced(self) -> bool {
        self.0 == 0
    }

    /// Commits the local branch is missing, if behind
    pub const fn behind(self) -> Option<u64> {
        if self.0 < 0 {
            Some(self.0.unsigned_abs())
        } else {
            None
        }
    }

    /// Commits not yet on the remote, if ahead
    pub const fn ahead(self) -> Option<u64> {
        if self.0 > 0 {
            Some(self.0.unsigned_abs())
        } else {
            None
        }
    }
}

impl fmt::Display for CheckoutResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "up to date"),
            n if n < 0 => write!(f, "behind by {}", n.unsigned_abs()),
            n => write!(f, "ahead by {n}"),
        }
    }
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}
