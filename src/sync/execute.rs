//! Merge walk over a chain

use crate::error::Result;
use crate::ids::{BaseBranch, Branch, HeadBranch};
use crate::repo::VersionControl;
use crate::types::PrChain;
use tracing::{debug, info};

/// What a sync run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// `(base, head)` pairs that received a merge commit, in merge order
    pub merged: Vec<(BaseBranch, HeadBranch)>,
    /// Number of `merge_into` calls, including ones that were no-ops
    pub merge_attempts: usize,
}

impl SyncReport {
    /// Whether the run changed any branch
    pub const fn has_merges(&self) -> bool {
        !self.merged.is_empty()
    }
}

/// Merge every base into its head so the whole chain is in sync.
///
/// Walks from the leaf-most PR towards the trunk. Whenever a pair is found
/// unmerged, every pair from there to the leaf is merged in order, so a change
/// ripples through all downstream branches. A chain that is already in sync
/// performs no merges.
///
/// Stops at the first error; merges made before it stay in place.
pub fn sync_chain(chain: &PrChain, vcs: &dyn VersionControl) -> Result<SyncReport> {
    let prs = chain.prs();
    let mut report = SyncReport::default();

    for i in (0..prs.len()).rev() {
        debug!(index = i, pr = prs[i].number, "checking pair");
        if vcs.is_ancestor_merged(&prs[i].base, &prs[i].head)? {
            continue;
        }

        for pr in &prs[i..] {
            debug!(pr = pr.number, base = %pr.base, head = %pr.head, "merging");
            report.merge_attempts += 1;
            if vcs.merge_into(&pr.base, &pr.head)? {
                report.merged.push((pr.base.clone(), pr.head.clone()));
            }
        }
    }

    info!(
        chain = %chain,
        merges = report.merged.len(),
        "chain synced"
    );
    Ok(report)
}

/// Pairs whose base is not yet merged into the head, without merging.
pub fn find_unmerged(chain: &PrChain, vcs: &dyn VersionControl) -> Result<Vec<(BaseBranch, HeadBranch)>> {
    let mut unmerged = Vec::new();
    for pr in chain {
        if !vcs.is_ancestor_merged(&pr.base, &pr.head)? {
            unmerged.push((pr.base.clone(), pr.head.clone()));
        }
    }
    Ok(unmerged)
}

/// Fast-forward every branch of the chain from its remote.
///
/// Returns the branches that moved.
pub fn refresh_chain(chain: &PrChain, vcs: &dyn VersionControl) -> Result<Vec<Branch>> {
    let mut branches: Vec<&Branch> = vec![chain.base().as_branch()];
    branches.extend(chain.iter().map(|pr| pr.head.as_branch()));

    let mut moved = Vec::new();
    for branch in branches {
        if vcs.pull(branch)? {
            moved.push(branch.clone());
        }
    }
    Ok(moved)
}
