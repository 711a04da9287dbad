//! PR blueprints from branch-list files
//!
//! A branch-list file names one branch per line, trunk-most first. Each branch
//! after the first becomes the head of a PR whose base is the line above it.

use crate::error::{Error, Result};
use crate::ids::{BaseBranch, Branch, BranchRules, HeadBranch};
use crate::types::PullRequestBlueprint;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory searched for branch-list files
pub const BRANCHES_DIR: &str = "branches";

/// Read branch names from `path`.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn load_branches(path: &Path, rules: &BranchRules) -> Result<Vec<Branch>> {
    let content = fs::read_to_string(path)?;
    let branches = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| Branch::with_rules(l, rules))
        .collect::<Result<Vec<_>>>()?;
    debug!(path = %path.display(), count = branches.len(), "loaded branch list");
    Ok(branches)
}

/// Turn an ordered branch list into PR blueprints.
///
/// The first branch may be the trunk; every other branch must start with
/// `prefix` when one is configured. Titles default to the head branch name.
pub fn blueprints_from_branches(
    branches: &[Branch],
    prefix: Option<&str>,
    trunk: &Branch,
) -> Result<Vec<PullRequestBlueprint>> {
    if branches.len() < 2 {
        return Err(Error::Precondition(
            "a branch list needs at least two branches".to_string(),
        ));
    }

    let owned = |b: &Branch| prefix.is_none_or(|p| b.as_str().starts_with(p));
    for (i, branch) in branches.iter().enumerate() {
        let allowed = owned(branch) || (i == 0 && branch == trunk);
        if !allowed {
            return Err(Error::Precondition(format!(
                "branch '{branch}' does not start with prefix '{}'",
                prefix.unwrap_or_default()
            )));
        }
    }

    Ok(branches
        .windows(2)
        .map(|pair| PullRequestBlueprint {
            head: HeadBranch::from(pair[1].clone()),
            base: BaseBranch::from(pair[0].clone()),
            title: pair[1].to_string(),
        })
        .collect())
}

/// List `*.txt` files in `dir`, sorted by name.
pub fn find_branches_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Precondition(format!(
            "no {} directory found",
            dir.display()
        )));
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(Error::Precondition(format!(
            "no .txt files found in {}",
            dir.display()
        )));
    }
    Ok(files)
}
