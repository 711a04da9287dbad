//! Chain discovery over open pull requests
//!
//! Pull requests form a graph where an edge runs from a PR to every PR whose
//! base is its head. [`build_pr_chains`] enumerates the maximal linear paths
//! through that graph.

use crate::ids::Branch;
use crate::types::{PrChain, PullRequest};
use std::collections::HashMap;
use tracing::debug;

/// Working state for one enumeration
struct ChainSearch<'a> {
    /// Open PRs keyed by their base branch
    by_base: HashMap<&'a Branch, Vec<&'a PullRequest>>,
    /// Longest chain per leaf head, in the order leaves were first seen
    best: Vec<Vec<&'a PullRequest>>,
    /// Leaf head -> index into `best`
    leaf_index: HashMap<&'a Branch, usize>,
}

impl<'a> ChainSearch<'a> {
    fn new(prs: &'a [PullRequest]) -> Self {
        let mut by_base: HashMap<&Branch, Vec<&PullRequest>> = HashMap::new();
        for pr in prs {
            by_base.entry(pr.base.as_branch()).or_default().push(pr);
        }
        Self {
            by_base,
            best: Vec::new(),
            leaf_index: HashMap::new(),
        }
    }

    /// Extend `chain` with `pr`, then follow every continuation.
    ///
    /// Each continuation gets its own copy of the chain so sibling branches of
    /// the search never see each other's PRs.
    fn walk(&mut self, pr: &'a PullRequest, mut chain: Vec<&'a PullRequest>) {
        chain.push(pr);

        let continuations: Vec<&'a PullRequest> = self
            .by_base
            .get(pr.head.as_branch())
            .map(|next| {
                next.iter()
                    .copied()
                    // Cycle guard: never revisit a PR already on this path
                    .filter(|n| !chain.iter().any(|c| c.number == n.number))
                    .collect()
            })
            .unwrap_or_default();

        if continuations.is_empty() {
            self.record(chain);
            return;
        }
        for next in continuations {
            self.walk(next, chain.clone());
        }
    }

    fn record(&mut self, chain: Vec<&'a PullRequest>) {
        if chain.len() < 2 {
            return;
        }
        let leaf = chain[chain.len() - 1].head.as_branch();
        match self.leaf_index.get(leaf) {
            Some(&i) if chain.len() > self.best[i].len() => self.best[i] = chain,
            Some(_) => {}
            None => {
                self.leaf_index.insert(leaf, self.best.len());
                self.best.push(chain);
            }
        }
    }
}

/// Enumerate maximal chains of stacked pull requests.
///
/// For each leaf head branch only the longest chain ending there is kept, and
/// single-PR chains are dropped. Chains come back trunk-most PR first, in the
/// order their leaves were first reached.
pub fn build_pr_chains(prs: &[PullRequest]) -> Vec<PrChain> {
    let mut search = ChainSearch::new(prs);
    for pr in prs {
        search.walk(pr, Vec::new());
    }

    let chains: Vec<PrChain> = search
        .best
        .into_iter()
        .filter_map(|chain| PrChain::new(chain.into_iter().cloned().collect()).ok())
        .collect();
    debug!(prs = prs.len(), chains = chains.len(), "built PR chains");
    chains
}

/// Find the chain ending at `leaf`
pub fn find_chain_by_leaf<'a>(chains: &'a [PrChain], leaf: &str) -> Option<&'a PrChain> {
    chains.iter().find(|c| c.leaf().as_str() == leaf)
}
