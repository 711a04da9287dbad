//! In-memory commit graph implementing `VersionControl`

#![allow(dead_code)]

use pr_chain::error::{Error, Result};
use pr_chain::ids::{BaseBranch, Branch, Commit, HeadBranch};
use pr_chain::repo::VersionControl;
use pr_chain::types::CheckoutResult;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Checkout(String),
    Pull(String),
    Push(String),
    MergeInto { base: String, head: String },
}

#[derive(Default)]
struct Graph {
    /// Parents of each commit; a commit's parents always have lower indices
    parents: Vec<Vec<usize>>,
    local: HashMap<String, usize>,
    remote: HashMap<String, usize>,
}

impl Graph {
    fn commit(&mut self, parents: Vec<usize>) -> usize {
        self.parents.push(parents);
        self.parents.len() - 1
    }

    fn ancestors(&self, tip: usize) -> HashSet<usize> {
        let mut seen = HashSet::new();
        let mut stack = vec![tip];
        while let Some(c) = stack.pop() {
            if seen.insert(c) {
                stack.extend(self.parents[c].iter().copied());
            }
        }
        seen
    }

    fn tip(&self, branch: &str) -> Result<usize> {
        self.local.get(branch).copied().ok_or_else(|| Error::GitCommand {
            command: format!("git rev-parse --verify refs/heads/{branch}"),
            status: "128".to_string(),
            stdout: String::new(),
            stderr: "fatal: Needed a single revision".to_string(),
        })
    }

    /// Newest common ancestor; indices are topologically ordered
    fn merge_base(&self, a: usize, b: usize) -> usize {
        let ours = self.ancestors(a);
        self.ancestors(b)
            .into_iter()
            .filter(|c| ours.contains(c))
            .max()
            .unwrap_or(0)
    }
}

fn hash(index: usize) -> Commit {
    Commit::parse(format!("{:040x}", index + 1)).unwrap()
}

/// Mock version control over an in-memory commit graph
///
/// Every branch starts out pushed. `advance` adds local commits, and
/// `advance_remote` simulates someone else pushing.
pub struct MockVcs {
    trunk: String,
    graph: Mutex<Graph>,
    conflicts: Mutex<HashSet<(String, String)>>,
    calls: Mutex<Vec<VcsCall>>,
}

impl MockVcs {
    /// A repository with a single root commit on `trunk`
    pub fn new(trunk: &str) -> Self {
        let mut graph = Graph::default();
        let root = graph.commit(Vec::new());
        graph.local.insert(trunk.to_string(), root);
        graph.remote.insert(trunk.to_string(), root);
        Self {
            trunk: trunk.to_string(),
            graph: Mutex::new(graph),
            conflicts: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Linear stack: each branch forks from the previous one with one commit
    pub fn with_stack(trunk: &str, branches: &[&str]) -> Self {
        let vcs = Self::new(trunk);
        let mut from = trunk;
        for branch in branches {
            vcs.branch(branch, from);
            from = branch;
        }
        vcs
    }

    /// Create `name` from `from` with one commit of its own, and push it
    pub fn branch(&self, name: &str, from: &str) {
        let mut g = self.graph.lock().unwrap();
        let start = g.local[from];
        let c = g.commit(vec![start]);
        g.local.insert(name.to_string(), c);
        g.remote.insert(name.to_string(), c);
    }

    /// Add a local commit on `branch`
    pub fn advance(&self, branch: &str) {
        let mut g = self.graph.lock().unwrap();
        let tip = g.local[branch];
        let c = g.commit(vec![tip]);
        g.local.insert(branch.to_string(), c);
    }

    /// Add a commit on the remote side of `branch` only
    pub fn advance_remote(&self, branch: &str) {
        let mut g = self.graph.lock().unwrap();
        let tip = g.remote[branch];
        let c = g.commit(vec![tip]);
        g.remote.insert(branch.to_string(), c);
    }

    /// Make merging `base` into `head` conflict
    pub fn conflict_on(&self, base: &str, head: &str) {
        self.conflicts
            .lock()
            .unwrap()
            .insert((base.to_string(), head.to_string()));
    }

    /// Whether `base` tip is reachable from `head` tip
    pub fn contains(&self, head: &str, base: &str) -> bool {
        let g = self.graph.lock().unwrap();
        g.ancestors(g.local[head]).contains(&g.local[base])
    }

    /// Local tip of `branch`
    pub fn tip(&self, branch: &str) -> Commit {
        let g = self.graph.lock().unwrap();
        hash(g.local[branch])
    }

    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// `(base, head)` of every `merge_into` call, in order
    pub fn merge_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VcsCall::MergeInto { base, head } => Some((base, head)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: VcsCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn delta(g: &Graph, branch: &str) -> Result<i64> {
        let local = g.tip(branch)?;
        let remote = *g
            .remote
            .get(branch)
            .ok_or_else(|| Error::NoUpstream(branch.to_string()))?;
        let ours = g.ancestors(local);
        let theirs = g.ancestors(remote);
        let ahead = ours.difference(&theirs).count() as i64;
        let behind = theirs.difference(&ours).count() as i64;
        match (ahead, behind) {
            (0, b) => Ok(-b),
            (a, 0) => Ok(a),
            (a, b) => Err(Error::Diverged {
                branch: branch.to_string(),
                ahead: a.unsigned_abs(),
                behind: b.unsigned_abs(),
            }),
        }
    }
}

impl VersionControl for MockVcs {
    fn checkout(&self, branch: &Branch) -> Result<CheckoutResult> {
        self.record(VcsCall::Checkout(branch.to_string()));
        let g = self.graph.lock().unwrap();
        Ok(CheckoutResult(Self::delta(&g, branch.as_str())?))
    }

    fn pull(&self, branch: &Branch) -> Result<bool> {
        self.record(VcsCall::Pull(branch.to_string()));
        let mut g = self.graph.lock().unwrap();
        let delta = Self::delta(&g, branch.as_str())?;
        if delta >= 0 {
            return Ok(false);
        }
        let remote = g.remote[branch.as_str()];
        g.local.insert(branch.to_string(), remote);
        Ok(true)
    }

    fn push(&self, branch: &Branch) -> Result<bool> {
        self.record(VcsCall::Push(branch.to_string()));
        if branch.as_str() == self.trunk {
            return Err(Error::Precondition(format!(
                "refusing to push trunk branch {branch}"
            )));
        }
        let mut g = self.graph.lock().unwrap();
        let local = g.tip(branch.as_str())?;
        match g.remote.get(branch.as_str()).copied() {
            Some(remote) if remote == local => Ok(false),
            Some(remote) if !g.ancestors(local).contains(&remote) => Err(Error::PushRejected {
                branch: branch.to_string(),
                details: "! [rejected] (non-fast-forward)".to_string(),
            }),
            _ => {
                g.remote.insert(branch.to_string(), local);
                Ok(true)
            }
        }
    }

    fn merge_base(&self, a: &Branch, b: &Branch) -> Result<Commit> {
        let g = self.graph.lock().unwrap();
        let base = g.merge_base(g.tip(a.as_str())?, g.tip(b.as_str())?);
        Ok(hash(base))
    }

    fn rev_parse(&self, branch: &Branch) -> Result<Commit> {
        let g = self.graph.lock().unwrap();
        Ok(hash(g.tip(branch.as_str())?))
    }

    fn is_ancestor_merged(&self, base: &BaseBranch, head: &HeadBranch) -> Result<bool> {
        let g = self.graph.lock().unwrap();
        let base_tip = g.tip(base.as_str())?;
        let head_tip = g.tip(head.as_str())?;
        let merge_base = g.merge_base(base_tip, head_tip);
        if head_tip == base_tip {
            return Err(Error::Precondition(format!(
                "{head} and {base} point at the same commit"
            )));
        }
        if head_tip == merge_base {
            return Err(Error::Precondition(format!(
                "{head} has no commits of its own on top of {base}"
            )));
        }
        Ok(merge_base == base_tip)
    }

    fn merge_into(&self, base: &BaseBranch, head: &HeadBranch) -> Result<bool> {
        self.record(VcsCall::MergeInto {
            base: base.to_string(),
            head: head.to_string(),
        });
        if self.is_ancestor_merged(base, head)? {
            return Ok(false);
        }
        if self
            .conflicts
            .lock()
            .unwrap()
            .contains(&(base.to_string(), head.to_string()))
        {
            return Err(Error::MergeConflict {
                base: base.to_string(),
                head: head.to_string(),
                output: "CONFLICT (content): Merge conflict in file.txt".to_string(),
            });
        }
        let mut g = self.graph.lock().unwrap();
        let base_tip = g.tip(base.as_str())?;
        let head_tip = g.tip(head.as_str())?;
        let c = g.commit(vec![head_tip, base_tip]);
        g.local.insert(head.to_string(), c);
        Ok(true)
    }
}
