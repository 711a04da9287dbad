//! Throwaway git repositories for integration tests

#![allow(dead_code)]

use pr_chain::ids::Branch;
use pr_chain::repo::GitRepo;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A bare "remote" plus a working clone with `main` pushed
pub struct TempGitRepo {
    dir: TempDir,
    work: PathBuf,
    remote: PathBuf,
}

fn git_in(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .args(args)
        .env("LC_ALL", "C")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed:\n{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(path: &Path) {
    git_in(path, &["config", "user.name", "Test User"]);
    git_in(path, &["config", "user.email", "test@example.com"]);
    git_in(path, &["config", "commit.gpgsign", "false"]);
}

impl TempGitRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let remote = dir.path().join("remote.git");
        let work = dir.path().join("work");

        fs::create_dir(&remote).unwrap();
        git_in(&remote, &["init", "--bare", "--quiet"]);
        git_in(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        git_in(
            dir.path(),
            &[
                "clone",
                "--quiet",
                remote.to_str().unwrap(),
                work.to_str().unwrap(),
            ],
        );
        git_in(&work, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        configure_identity(&work);

        let repo = Self { dir, work, remote };
        repo.commit_file("README.md", "hello\n", "initial commit");
        repo.git(&["push", "--quiet", "-u", "origin", "main"]);
        repo
    }

    /// Working copy path
    pub fn path(&self) -> &Path {
        &self.work
    }

    /// Run git in the working copy, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        git_in(&self.work, args)
    }

    /// Write `name` and commit it on the current branch
    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        fs::write(self.work.join(name), content).unwrap();
        self.git(&["add", name]);
        self.git(&["commit", "--quiet", "-m", message]);
    }

    /// Create `name` from `from`, commit one file on it and push with upstream
    pub fn create_pushed_branch(&self, name: &str, from: &str) {
        self.git(&["checkout", "--quiet", "-b", name, from]);
        let file = format!("{}.txt", name.replace('/', "_"));
        self.commit_file(&file, &format!("{name}\n"), &format!("work on {name}"));
        self.git(&["push", "--quiet", "-u", "origin", name]);
    }

    pub fn checkout(&self, branch: &str) {
        self.git(&["checkout", "--quiet", branch]);
    }

    /// Full hash of `rev`
    pub fn rev(&self, rev: &str) -> String {
        self.git(&["rev-parse", rev])
    }

    /// Whether `ancestor` is reachable from `descendant`
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        Command::new("git")
            .arg("-C")
            .arg(&self.work)
            .args(["merge-base", "--is-ancestor", ancestor, descendant])
            .status()
            .expect("failed to run git")
            .success()
    }

    /// A second clone of the same remote, for simulating other people's pushes
    pub fn other_clone(&self) -> PathBuf {
        let other = self.dir.path().join("other");
        git_in(
            self.dir.path(),
            &[
                "clone",
                "--quiet",
                self.remote.to_str().unwrap(),
                other.to_str().unwrap(),
            ],
        );
        configure_identity(&other);
        other
    }

    /// Run git in an arbitrary directory
    pub fn git_at(path: &Path, args: &[&str]) -> String {
        git_in(path, args)
    }

    /// `GitRepo` over the working copy with `main` as trunk
    pub fn repo(&self) -> GitRepo {
        GitRepo::open(&self.work, "origin", Branch::new("main").unwrap()).unwrap()
    }
}
