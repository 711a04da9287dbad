//! `git` CLI implementation of [`VersionControl`]

use super::VersionControl;
use super::output::{
    MergeOutcome, PushReport, is_merge_conflict, parse_checkout_confirmation, parse_commit_line,
    parse_left_right_counts, parse_merge_output, parse_pull_output, parse_push_porcelain,
    parse_tracking_status,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::ids::{BaseBranch, Branch, Commit, HeadBranch};
use crate::types::CheckoutResult;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, trace, warn};

/// Captured result of one git invocation
#[derive(Debug)]
struct GitOutput {
    command: String,
    status: Option<i32>,
    stdout: String,
    stderr: String,
}

impl GitOutput {
    const fn success(&self) -> bool {
        matches!(self.status, Some(0))
    }

    fn into_error(self) -> Error {
        Error::GitCommand {
            command: self.command,
            status: self
                .status
                .map_or_else(|| "signal".to_string(), |s| s.to_string()),
            stdout: self.stdout,
            stderr: self.stderr,
        }
    }
}

/// A local git working copy
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
    remote: String,
    trunk: Branch,
}

impl GitRepo {
    /// Open the working copy at `path`
    ///
    /// `remote` is the remote every branch tracks and `trunk` the branch that
    /// is never pushed.
    pub fn open(path: &Path, remote: impl Into<String>, trunk: Branch) -> Result<Self> {
        let repo = Self {
            path: path.to_path_buf(),
            remote: remote.into(),
            trunk,
        };
        let out = repo.run(&["rev-parse", "--is-inside-work-tree"])?;
        if out.stdout.trim() != "true" {
            return Err(Error::Config(format!(
                "{} is not inside a git working tree",
                path.display()
            )));
        }
        Ok(repo)
    }

    /// Open the working copy described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(&config.repo_path, config.remote.clone(), config.trunk()?)
    }

    /// Path of the working copy
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remote name (e.g. "origin")
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Trunk branch
    pub const fn trunk(&self) -> &Branch {
        &self.trunk
    }

    /// URL of the configured remote
    pub fn remote_url(&self) -> Result<String> {
        let out = self.run(&["remote", "get-url", &self.remote])?;
        Ok(out.stdout.trim().to_string())
    }

    /// Absolute path of the `.git` directory
    pub fn git_dir(&self) -> Result<PathBuf> {
        let out = self.run(&["rev-parse", "--absolute-git-dir"])?;
        Ok(PathBuf::from(out.stdout.trim()))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.path);
        // Output parsing depends on untranslated messages
        cmd.env("LC_ALL", "C");
        cmd.env("LANG", "C");
        cmd.env("LANGUAGE", "C");
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    fn run_unchecked(&self, args: &[&str]) -> Result<GitOutput> {
        let command = format!("git -C {} {}", self.path.display(), args.join(" "));
        debug!(%command, "running git");
        let output = self.command().args(args).output()?;
        let out = GitOutput {
            command,
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace!(status = ?out.status, stdout = %out.stdout.trim(), stderr = %out.stderr.trim(), "git finished");
        Ok(out)
    }

    fn run(&self, args: &[&str]) -> Result<GitOutput> {
        let out = self.run_unchecked(args)?;
        if out.success() {
            Ok(out)
        } else {
            Err(out.into_error())
        }
    }

    fn tracking_ref(&self, branch: &Branch) -> String {
        format!("refs/remotes/{}/{}", self.remote, branch)
    }

    /// Resolve a full ref, `None` if it does not exist
    fn try_rev_parse(&self, full_ref: &str) -> Result<Option<Commit>> {
        let out = self.run_unchecked(&["rev-parse", "--verify", "--quiet", full_ref])?;
        match out.status {
            Some(0) => parse_commit_line(&out.stdout, &out.command).map(Some),
            Some(1) if out.stdout.trim().is_empty() => Ok(None),
            _ => Err(out.into_error()),
        }
    }

    /// `(ahead, behind)` of `branch` relative to its remote tracking branch
    fn ahead_behind(&self, branch: &Branch) -> Result<(u64, u64)> {
        let range = format!("refs/heads/{branch}...{}", self.tracking_ref(branch));
        let out = self.run(&["rev-list", "--left-right", "--count", &range])?;
        parse_left_right_counts(&out.stdout)
    }

    fn to_delta(branch: &Branch, ahead: u64, behind: u64) -> Result<i64> {
        let overflow = || Error::Internal(format!("commit count overflow for {branch}"));
        match (ahead, behind) {
            (0, 0) => Ok(0),
            (n, 0) => i64::try_from(n).map_err(|_| overflow()),
            (0, n) => i64::try_from(n).map(|n| -n).map_err(|_| overflow()),
            (ahead, behind) => Err(Error::Diverged {
                branch: branch.to_string(),
                ahead,
                behind,
            }),
        }
    }
}

impl VersionControl for GitRepo {
    fn checkout(&self, branch: &Branch) -> Result<CheckoutResult> {
        let out = self.run(&["checkout", branch.as_str()])?;
        parse_checkout_confirmation(&out.stderr, branch.as_str())?;
        let reported = parse_tracking_status(&out.stdout, &self.remote, branch.as_str())?;

        // Cross-check the prose against the commit graph
        let (ahead, behind) = self.ahead_behind(branch)?;
        let counted = Self::to_delta(branch, ahead, behind)?;
        if counted != reported.0 {
            return Err(Error::UnexpectedGitOutput {
                command: out.command,
                output: format!(
                    "checkout reported {reported} but rev-list counts {ahead} ahead, {behind} behind"
                ),
            });
        }

        debug!(%branch, %reported, "checked out");
        Ok(reported)
    }

    fn pull(&self, branch: &Branch) -> Result<bool> {
        self.checkout(branch)?;
        let out = self.run(&["pull", "--ff-only", "--no-rebase"])?;
        if !parse_pull_output(&out.stdout, &out.stderr)? {
            debug!(%branch, "already up to date");
            return Ok(false);
        }

        warn!(%branch, "pulled: {}", out.stdout.lines().next().unwrap_or_default());
        let status = self.checkout(branch)?;
        if !status.is_synced() {
            return Err(Error::UnexpectedGitOutput {
                command: out.command,
                output: format!("{branch} is {status} after pull"),
            });
        }
        Ok(true)
    }

    fn push(&self, branch: &Branch) -> Result<bool> {
        if branch == &self.trunk {
            return Err(Error::Precondition(format!(
                "refusing to push trunk branch {branch}"
            )));
        }

        let tracking = self.tracking_ref(branch);
        let local_before = self.rev_parse(branch)?;
        let remote_before = self.try_rev_parse(&tracking)?;

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        let out = self.run_unchecked(&["push", "--porcelain", &self.remote, &refspec])?;
        let report = parse_push_porcelain(&out.stdout, &out.stderr, branch.as_str());
        if !out.success() {
            return Err(match report {
                Err(e @ Error::PushRejected { .. }) => e,
                _ => out.into_error(),
            });
        }
        let report = report?;

        let local_after = self.rev_parse(branch)?;
        let remote_after = self.try_rev_parse(&tracking)?;
        let mismatch = |what: String| Error::UnexpectedGitOutput {
            command: out.command.clone(),
            output: format!("{what}\n{}", out.stdout.trim()),
        };

        if local_after != local_before {
            return Err(mismatch(format!(
                "local {branch} moved during push ({} -> {})",
                local_before.short(),
                local_after.short()
            )));
        }
        if remote_after.as_ref() != Some(&local_before) {
            return Err(mismatch(format!(
                "{tracking} does not match local {branch} after push"
            )));
        }

        match report {
            PushReport::UpToDate => {
                if remote_before.as_ref() != Some(&local_before) {
                    return Err(mismatch(format!(
                        "push reported {branch} up to date but {tracking} differed"
                    )));
                }
                debug!(%branch, "everything up to date");
                Ok(false)
            }
            PushReport::Updated { old, new } => {
                let range_matches = remote_before
                    .as_ref()
                    .is_some_and(|before| before.matches_abbrev(&old))
                    && local_before.matches_abbrev(&new);
                if !range_matches {
                    return Err(mismatch(format!(
                        "push reported {old}..{new}, expected {}..{}",
                        remote_before.as_ref().map_or("(none)", Commit::short),
                        local_before.short()
                    )));
                }
                info!(%branch, "pushed {old}..{new}");
                Ok(true)
            }
            PushReport::Created => {
                if remote_before.is_some() {
                    return Err(mismatch(format!(
                        "push created {branch} but {tracking} already existed"
                    )));
                }
                info!(%branch, "pushed new branch");
                Ok(true)
            }
        }
    }

    fn merge_base(&self, a: &Branch, b: &Branch) -> Result<Commit> {
        let a_ref = format!("refs/heads/{a}");
        let b_ref = format!("refs/heads/{b}");
        let out = self.run(&["merge-base", &a_ref, &b_ref])?;
        if !out.stderr.trim().is_empty() {
            return Err(Error::UnexpectedGitOutput {
                command: out.command,
                output: out.stderr,
            });
        }
        parse_commit_line(&out.stdout, &out.command)
    }

    fn rev_parse(&self, branch: &Branch) -> Result<Commit> {
        let full_ref = format!("refs/heads/{branch}");
        let out = self.run(&["rev-parse", "--verify", &full_ref])?;
        parse_commit_line(&out.stdout, &out.command)
    }

    fn is_ancestor_merged(&self, base: &BaseBranch, head: &HeadBranch) -> Result<bool> {
        let merge_base = self.merge_base(base, head)?;
        let base_tip = self.rev_parse(base)?;
        let head_tip = self.rev_parse(head)?;

        if head_tip == base_tip {
            return Err(Error::Precondition(format!(
                "{head} and {base} point at the same commit {}",
                head_tip.short()
            )));
        }
        if head_tip == merge_base {
            return Err(Error::Precondition(format!(
                "{head} has no commits of its own on top of {base}"
            )));
        }

        let merged = base_tip == merge_base;
        if !merged {
            debug!(%base, %head, "base is not merged into head");
        }
        Ok(merged)
    }

    fn merge_into(&self, base: &BaseBranch, head: &HeadBranch) -> Result<bool> {
        if self.is_ancestor_merged(base, head)? {
            return Ok(false);
        }

        let status = self.checkout(head)?;
        if let Some(behind) = status.behind() {
            warn!(%head, behind, "merging into a branch that is behind its remote");
        } else if let Some(ahead) = status.ahead() {
            warn!(%head, ahead, "merging into a branch with unpushed commits");
        }

        let base_ref = format!("refs/heads/{base}");
        let out = self.run_unchecked(&["merge", "--no-edit", &base_ref])?;
        if !out.success() {
            if is_merge_conflict(&out.stdout) {
                return Err(Error::MergeConflict {
                    base: base.to_string(),
                    head: head.to_string(),
                    output: format!("{}\n{}", out.stdout.trim(), out.stderr.trim())
                        .trim()
                        .to_string(),
                });
            }
            return Err(out.into_error());
        }
        if !out.stderr.trim().is_empty() {
            return Err(Error::UnexpectedGitOutput {
                command: out.command,
                output: out.stderr,
            });
        }

        match parse_merge_output(&out.stdout, base.as_str())? {
            MergeOutcome::AlreadyUpToDate => Ok(false),
            MergeOutcome::Merged { strategy } => {
                info!(%base, %head, %strategy, "merged base into head");
                Ok(true)
            }
        }
    }
}
