//! Error types for pr-chain

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by pr-chain
///
/// Git-facing variants always carry the raw diagnostic so the user can act on
/// it; nothing here is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Branch name failed validation
    #[error("'{name}' is not a valid branch name: {reason}")]
    InvalidBranch {
        /// The rejected name
        name: String,
        /// Which rule it broke
        reason: String,
    },

    /// Commit hash failed validation
    #[error("'{0}' is not a valid commit hash")]
    InvalidCommit(String),

    /// git exited with a non-zero status
    #[error("git command failed: {command} (exit status {status})\nstdout: {stdout}\nstderr: {stderr}")]
    GitCommand {
        /// Command line that was run
        command: String,
        /// Exit status, or "signal" when killed
        status: String,
        /// Captured stdout
        stdout: String,
        /// Captured stderr
        stderr: String,
    },

    /// git succeeded but printed something we do not recognize
    #[error("unexpected output from {command}:\n{output}")]
    UnexpectedGitOutput {
        /// Command line that was run
        command: String,
        /// The unrecognized text
        output: String,
    },

    /// Merging base into head produced conflicts
    #[error("merging {base} into {head} failed with conflicts:\n{output}")]
    MergeConflict {
        /// Branch being merged
        base: String,
        /// Branch receiving the merge
        head: String,
        /// Raw git diagnostic
        output: String,
    },

    /// Local branch and its remote tracking branch have diverged
    #[error("branch {branch} has diverged from its remote ({ahead} ahead, {behind} behind)")]
    Diverged {
        /// Branch name
        branch: String,
        /// Commits only on the local branch
        ahead: u64,
        /// Commits only on the remote tracking branch
        behind: u64,
    },

    /// Branch has no remote tracking branch
    #[error("branch {0} has no remote tracking branch")]
    NoUpstream(String),

    /// The remote refused a push
    #[error("push of {branch} was rejected: {details}")]
    PushRejected {
        /// Branch name
        branch: String,
        /// Rejection reason reported by git
        details: String,
    },

    /// A caller broke an operation's precondition
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Another pr-chain process holds the repository lock
    #[error("repository is locked by another process ({0})")]
    Locked(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}
