//! Publishing a synced chain

use crate::error::Result;
use crate::ids::HeadBranch;
use crate::repo::VersionControl;
use crate::types::PrChain;
use tracing::info;

/// Result of pushing a chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Heads whose remote branch changed
    pub pushed: Vec<HeadBranch>,
    /// Heads the remote already had
    pub up_to_date: Vec<HeadBranch>,
}

/// Push every head branch of the chain, in chain order.
///
/// Pushes are independent: if one fails, the ones before it are not undone.
pub fn push_chain(chain: &PrChain, vcs: &dyn VersionControl) -> Result<PublishReport> {
    let mut report = PublishReport::default();
    for pr in chain {
        if vcs.push(&pr.head)? {
            report.pushed.push(pr.head.clone());
        } else {
            report.up_to_date.push(pr.head.clone());
        }
    }
    info!(
        pushed = report.pushed.len(),
        up_to_date = report.up_to_date.len(),
        "chain published"
    );
    Ok(report)
}
