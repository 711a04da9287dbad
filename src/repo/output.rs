//! Parsers for git's human-oriented output.
//!
//! Every prose match lives here so a git upgrade that rewords a message only
//! touches this file. All parsers are strict: text they do not recognize is
//! an error, never a default. The expected wording is that of git 2.34+ run
//! with `LC_ALL=C`.

use crate::error::{Error, Result};
use crate::ids::Commit;
use crate::types::CheckoutResult;
use regex::Regex;
use std::sync::LazyLock;

/// One ref line of a fetch report, e.g. `   1a2b3c4..5d6e7f8  main -> origin/main`
static FETCH_REF_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^ [ +*!=t-] (?:\[[a-z ]+\]|[0-9a-f]+\.{2,3}[0-9a-f]+)\s+\S+\s+->\s+\S+(?:\s+\(.*\))?$",
    )
    .expect("valid regex")
});

/// `Merge made by the 'ort' strategy.`
static MERGE_MADE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge made by the '([a-z-]+)' strategy\.$").expect("valid regex")
});

/// `1a2b3c4..5d6e7f8`
static UPDATE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9a-f]{4,40})\.\.([0-9a-f]{4,40})$").expect("valid regex"));

fn unexpected(command: &str, output: &str) -> Error {
    Error::UnexpectedGitOutput {
        command: command.to_string(),
        output: output.to_string(),
    }
}

/// Verify the stderr confirmation printed by `git checkout <branch>`.
pub fn parse_checkout_confirmation(stderr: &str, branch: &str) -> Result<()> {
    let stderr = stderr.trim();
    if stderr == format!("Already on '{branch}'") || stderr == format!("Switched to branch '{branch}'")
    {
        Ok(())
    } else {
        Err(unexpected(&format!("git checkout {branch}"), stderr))
    }
}

/// Parse the tracking summary printed on stdout by `git checkout <branch>`.
///
/// Advice lines (`  (use "git pull" ...)`) after the summary are tolerated,
/// anything else is not.
pub fn parse_tracking_status(stdout: &str, remote: &str, branch: &str) -> Result<CheckoutResult> {
    let command = format!("git checkout {branch}");
    let mut lines = stdout.trim().lines();
    let Some(summary) = lines.next().map(str::trim_end) else {
        return Err(Error::NoUpstream(branch.to_string()));
    };
    let rest: Vec<&str> = lines.collect();

    let upstream = regex::escape(&format!("{remote}/{branch}"));

    if summary == format!("Your branch is up to date with '{remote}/{branch}'.") {
        return ensure_only_advice(&rest, &command, stdout).map(|()| CheckoutResult::SYNCED);
    }

    let behind = Regex::new(&format!(
        r"^Your branch is behind '{upstream}' by (\d+) commits?, and can be fast-forwarded\.$"
    ))
    .map_err(|e| Error::Internal(e.to_string()))?;
    if let Some(caps) = behind.captures(summary) {
        let n = parse_count(&caps[1], &command, stdout)?;
        ensure_only_advice(&rest, &command, stdout)?;
        return Ok(CheckoutResult(-n));
    }

    let ahead = Regex::new(&format!(r"^Your branch is ahead of '{upstream}' by (\d+) commits?\.$"))
        .map_err(|e| Error::Internal(e.to_string()))?;
    if let Some(caps) = ahead.captures(summary) {
        let n = parse_count(&caps[1], &command, stdout)?;
        ensure_only_advice(&rest, &command, stdout)?;
        return Ok(CheckoutResult(n));
    }

    if summary.starts_with(&format!("Your branch and '{remote}/{branch}' have diverged")) {
        let counts = Regex::new(r"and have (\d+) and (\d+) different commits each")
            .map_err(|e| Error::Internal(e.to_string()))?;
        if let Some(caps) = counts.captures(stdout) {
            return Err(Error::Diverged {
                branch: branch.to_string(),
                ahead: parse_count(&caps[1], &command, stdout)?.unsigned_abs(),
                behind: parse_count(&caps[2], &command, stdout)?.unsigned_abs(),
            });
        }
    }

    if summary.contains("but the upstream is gone") {
        return Err(Error::NoUpstream(branch.to_string()));
    }

    Err(unexpected(&command, stdout))
}

fn parse_count(digits: &str, command: &str, output: &str) -> Result<i64> {
    digits.parse().map_err(|_| unexpected(command, output))
}

fn ensure_only_advice(lines: &[&str], command: &str, output: &str) -> Result<()> {
    if lines
        .iter()
        .all(|l| l.trim().is_empty() || l.trim_start().starts_with("(use \""))
    {
        Ok(())
    } else {
        Err(unexpected(command, output))
    }
}

/// Parse `git pull --ff-only`. Returns whether the branch moved.
pub fn parse_pull_output(stdout: &str, stderr: &str) -> Result<bool> {
    let command = "git pull";
    for line in stderr.lines() {
        let known = line.trim().is_empty()
            || line.starts_with("From ")
            || FETCH_REF_LINE.is_match(line.trim_end());
        if !known {
            return Err(unexpected(command, stderr));
        }
    }

    let stdout = stdout.trim();
    if stdout == "Already up to date." {
        return Ok(false);
    }
    let mut lines = stdout.lines();
    let updating = lines.next().is_some_and(|l| l.starts_with("Updating "));
    let fast_forward = lines.next().is_some_and(|l| l.trim() == "Fast-forward");
    if updating && fast_forward {
        Ok(true)
    } else {
        Err(unexpected(command, stdout))
    }
}

/// What a successful `git merge` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing to merge
    AlreadyUpToDate,
    /// A merge commit was created
    Merged {
        /// Strategy git reported (`ort`, `recursive`)
        strategy: String,
    },
}

/// Parse the stdout of a `git merge` that exited successfully.
///
/// Per-file notices (`Auto-merging <path>`, `Removing <path>`) may precede the
/// strategy line; only the indented diffstat may follow it.
pub fn parse_merge_output(stdout: &str, base: &str) -> Result<MergeOutcome> {
    let command = format!("git merge {base}");
    let trimmed = stdout.trim();
    if trimmed == "Already up to date." {
        return Ok(MergeOutcome::AlreadyUpToDate);
    }

    let mut strategy = None;
    for line in stdout.lines().map(str::trim_end) {
        if strategy.is_some() {
            if !line.is_empty() && !line.starts_with(' ') {
                return Err(unexpected(&command, trimmed));
            }
        } else if let Some(caps) = MERGE_MADE.captures(line) {
            strategy = Some(caps[1].to_string());
        } else if !(line.is_empty()
            || line.starts_with("Auto-merging ")
            || line.starts_with("Removing "))
        {
            return Err(unexpected(&command, trimmed));
        }
    }

    strategy
        .map(|strategy| MergeOutcome::Merged { strategy })
        .ok_or_else(|| unexpected(&command, trimmed))
}

/// Whether the output of a failed `git merge` reports conflicts.
pub fn is_merge_conflict(stdout: &str) -> bool {
    stdout.lines().any(|l| l.starts_with("CONFLICT ("))
        || stdout.contains("Automatic merge failed; fix conflicts")
}

/// Outcome of a `git push --porcelain` for one ref
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushReport {
    /// Remote already had the commit
    UpToDate,
    /// Remote branch was fast-forwarded
    Updated {
        /// Abbreviated old remote tip
        old: String,
        /// Abbreviated new remote tip
        new: String,
    },
    /// Remote branch was created
    Created,
}

/// Parse `git push --porcelain <remote> refs/heads/<b>:refs/heads/<b>`.
///
/// Ref lines have the form `<flag>\t<src>:<dst>\t<summary>`.
pub fn parse_push_porcelain(stdout: &str, stderr: &str, branch: &str) -> Result<PushReport> {
    let command = format!("git push {branch}");
    let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");

    for line in stdout.lines() {
        if line.starts_with("To ") || line.trim() == "Done" || line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(3, '\t');
        let (Some(flag), Some(spec), Some(summary)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(unexpected(&command, stdout));
        };
        if spec != refspec {
            return Err(unexpected(&command, stdout));
        }
        return match flag {
            "=" => Ok(PushReport::UpToDate),
            "*" => Ok(PushReport::Created),
            " " => UPDATE_RANGE.captures(summary.trim()).map_or_else(
                || Err(unexpected(&command, stdout)),
                |caps| {
                    Ok(PushReport::Updated {
                        old: caps[1].to_string(),
                        new: caps[2].to_string(),
                    })
                },
            ),
            "!" => Err(Error::PushRejected {
                branch: branch.to_string(),
                details: summary.to_string(),
            }),
            _ => Err(unexpected(&command, stdout)),
        };
    }

    if stderr.lines().any(|l| l.trim() == "Everything up-to-date") {
        return Ok(PushReport::UpToDate);
    }
    Err(unexpected(&command, stdout))
}

/// Parse `git rev-list --left-right --count a...b` into `(left, right)`.
pub fn parse_left_right_counts(stdout: &str) -> Result<(u64, u64)> {
    let command = "git rev-list --left-right --count";
    let mut parts = stdout.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => {
            let left = left.parse().map_err(|_| unexpected(command, stdout))?;
            let right = right.parse().map_err(|_| unexpected(command, stdout))?;
            Ok((left, right))
        }
        _ => Err(unexpected(command, stdout)),
    }
}

/// Parse a single full commit hash (output of `rev-parse`, `merge-base`).
pub fn parse_commit_line(stdout: &str, command: &str) -> Result<Commit> {
    let line = stdout.trim();
    if line.lines().count() != 1 {
        return Err(unexpected(command, stdout));
    }
    Commit::parse(line).map_err(|_| unexpected(command, stdout))
}
