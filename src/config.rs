//! Configuration loading
//!
//! Settings come from a TOML file (by default
//! `<config dir>/pr-chain/config.toml`), then environment variables, then CLI
//! flags, each layer overriding the previous one.

use crate::error::{Error, Result};
use crate::ids::{Branch, BranchRules};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name under the user's config dir
const CONFIG_DIR: &str = "pr-chain";

/// Default config file name
const CONFIG_FILE: &str = "config.toml";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local working copy
    pub repo_path: PathBuf,
    /// GitHub repository as `owner/name`; detected from the remote when unset
    pub github_repo: Option<String>,
    /// Remote that every chain branch tracks
    pub remote: String,
    /// Default branch; never pushed
    pub trunk: String,
    /// Author whose PRs are considered; the token owner when unset
    pub username: Option<String>,
    /// Prefix every branch created by this user starts with
    pub branch_prefix: Option<String>,
    /// Logins asked to review a chain
    pub reviewers: Vec<String>,
    /// Branch name bounds
    pub branch_rules: BranchRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            github_repo: None,
            remote: "origin".to_string(),
            trunk: "main".to_string(),
            username: None,
            branch_prefix: None,
            reviewers: Vec::new(),
            branch_rules: BranchRules::default(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With `path`, the file must exist. Without it, the default location is
    /// used if present. Environment overrides are applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply overrides from environment-style lookups.
    ///
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("LOCAL_REPO_PATH") {
            self.repo_path = PathBuf::from(v);
        }
        if let Some(v) = get("GITHUB_REPO") {
            self.github_repo = Some(v);
        }
        if let Some(v) = get("PRC_REMOTE") {
            self.remote = v;
        }
        if let Some(v) = get("PRC_TRUNK") {
            self.trunk = v;
        }
        if let Some(v) = get("GITHUB_USERNAME") {
            self.username = Some(v);
        }
        if let Some(v) = get("BRANCH_PREFIX") {
            self.branch_prefix = Some(v);
        }
        if let Some(v) = get("REVIEWERS") {
            self.reviewers = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Check values that would otherwise fail late
    pub fn validate(&self) -> Result<()> {
        if self.branch_rules.min_len == 0 || self.branch_rules.min_len > self.branch_rules.max_len
        {
            return Err(Error::Config(format!(
                "invalid branch length bounds {}..={}",
                self.branch_rules.min_len, self.branch_rules.max_len
            )));
        }
        self.trunk()?;
        if self.remote.trim().is_empty() || self.remote.contains(char::is_whitespace) {
            return Err(Error::Config(format!("invalid remote name '{}'", self.remote)));
        }
        if let Some(repo) = &self.github_repo {
            parse_owner_repo(repo)?;
        }
        Ok(())
    }

    /// The trunk branch, validated
    pub fn trunk(&self) -> Result<Branch> {
        Branch::with_rules(self.trunk.clone(), &self.branch_rules)
            .map_err(|e| Error::Config(format!("invalid trunk: {e}")))
    }

    /// Configured repository split into `(owner, name)`
    pub fn github_repo_parts(&self) -> Result<Option<(String, String)>> {
        self.github_repo
            .as_deref()
            .map(parse_owner_repo)
            .transpose()
    }

}

fn parse_owner_repo(repo: &str) -> Result<(String, String)> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(Error::Config(format!(
            "github_repo must look like owner/name, got '{repo}'"
        ))),
    }
}

/// Default config file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}
