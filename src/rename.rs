//! Title templates for PRs in a chain
//!
//! A template may reference `$1`, the PR's 1-based position in the chain, and
//! `$2`, a short `b<base><-b<head>` label built from the branch names with the
//! user's prefix removed. The trunk is labelled `m`.

use crate::ids::Branch;
use crate::types::{PrChain, PullRequest};

/// Label used for the trunk in `$2`
const TRUNK_LABEL: &str = "m";

/// A title change planned for one PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleChange {
    /// PR number
    pub number: u64,
    /// Current title
    pub old_title: String,
    /// Rendered title
    pub new_title: String,
}

impl TitleChange {
    /// Whether the rendered title differs from the current one
    pub fn is_change(&self) -> bool {
        self.old_title != self.new_title
    }
}

fn suffix<'a>(branch: &'a Branch, prefix: Option<&str>, trunk: &Branch) -> &'a str {
    if branch == trunk {
        return TRUNK_LABEL;
    }
    let name = branch.as_str();
    let stripped = prefix
        .and_then(|p| name.strip_prefix(p))
        .unwrap_or(name);
    if stripped.is_empty() { TRUNK_LABEL } else { stripped }
}

/// Render `template` for the PR at 0-based `index` in its chain.
pub fn render_title(
    template: &str,
    index: usize,
    pr: &PullRequest,
    prefix: Option<&str>,
    trunk: &Branch,
) -> String {
    let label = format!(
        "b{}<-b{}",
        suffix(pr.base.as_branch(), prefix, trunk),
        suffix(pr.head.as_branch(), prefix, trunk)
    );
    template
        .replace("$1", &(index + 1).to_string())
        .replace("$2", &label)
}

/// Render titles for every PR of `chain`, trunk-most first.
pub fn plan_chain_titles(
    template: &str,
    chain: &PrChain,
    prefix: Option<&str>,
    trunk: &Branch,
) -> Vec<TitleChange> {
    chain
        .iter()
        .enumerate()
        .map(|(i, pr)| TitleChange {
            number: pr.number,
            old_title: pr.title.clone(),
            new_title: render_title(template, i, pr, prefix, trunk),
        })
        .collect()
}
