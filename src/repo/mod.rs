//! Local repository access
//!
//! [`VersionControl`] is the seam between the sync engine and git; [`GitRepo`]
//! implements it by running the `git` executable against one working copy.

mod git;
mod lock;
pub mod output;

pub use git::GitRepo;
pub use lock::RepoLock;

use crate::error::Result;
use crate::ids::{BaseBranch, Branch, Commit, HeadBranch};
use crate::types::CheckoutResult;

/// Operations the sync engine needs from version control
///
/// Implementations must treat anything they cannot interpret as an error.
/// Every mutating call is blocking, and callers never issue two at once
/// against the same working copy.
pub trait VersionControl {
    /// Check out `branch` and report how it relates to its remote tracking
    /// branch.
    fn checkout(&self, branch: &Branch) -> Result<CheckoutResult>;

    /// Fast-forward `branch` from its remote. Returns whether it moved.
    fn pull(&self, branch: &Branch) -> Result<bool>;

    /// Publish `branch` to its remote. Returns whether the remote changed.
    ///
    /// Pushing the trunk branch is refused.
    fn push(&self, branch: &Branch) -> Result<bool>;

    /// Most recent common ancestor of two branches
    fn merge_base(&self, a: &Branch, b: &Branch) -> Result<Commit>;

    /// Current tip of `branch`
    fn rev_parse(&self, branch: &Branch) -> Result<Commit>;

    /// Whether every commit of `base` is already reachable from `head`.
    ///
    /// A head whose tip equals the base tip or the merge base is a caller
    /// error, not a `false`.
    fn is_ancestor_merged(&self, base: &BaseBranch, head: &HeadBranch) -> Result<bool>;

    /// Merge `base` into `head`. Returns whether a merge commit was created.
    ///
    /// Leaves the working copy untouched when `base` is already merged.
    fn merge_into(&self, base: &BaseBranch, head: &HeadBranch) -> Result<bool>;
}
