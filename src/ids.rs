//! Validated identities for branches and commits.
//!
//! Nothing reaches `git` as an argument unless it went through one of these
//! constructors. `BaseBranch` and `HeadBranch` share a representation; the
//! distinct types only stop base and head from being swapped at call sites.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Characters git refuses in ref names (plus `-`, handled separately).
const FORBIDDEN_CHARS: &[char] = &['~', '^', ':', '?', '[', '*', '\\'];

/// Length bounds applied to branch names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchRules {
    /// Minimum length in characters
    pub min_len: usize,
    /// Maximum length in characters
    pub max_len: usize,
}

impl Default for BranchRules {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 30,
        }
    }
}

impl BranchRules {
    /// Check `name` against these bounds and the fixed git rules.
    pub fn check(&self, name: &str) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidBranch {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let len = name.chars().count();
        if len < self.min_len || len > self.max_len {
            return Err(invalid(&format!(
                "length must be between {} and {}",
                self.min_len, self.max_len
            )));
        }
        if name.starts_with('/') || name.ends_with('/') {
            return Err(invalid("cannot start or end with '/'"));
        }
        if name.contains("//") {
            return Err(invalid("cannot contain '//'"));
        }
        if name.starts_with('-') {
            return Err(invalid("cannot start with '-'"));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("cannot contain whitespace"));
        }
        if let Some(c) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
            return Err(invalid(&format!("cannot contain '{c}'")));
        }
        if name.contains("@{") {
            return Err(invalid("cannot contain '@{'"));
        }
        if name.contains("..") {
            return Err(invalid("cannot contain '..'"));
        }
        Ok(())
    }
}

/// A validated git branch name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Branch(String);

impl Branch {
    /// Validate `name` with the default [`BranchRules`].
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_rules(name, &BranchRules::default())
    }

    /// Validate `name` with explicit rules.
    pub fn with_rules(name: impl Into<String>, rules: &BranchRules) -> Result<Self> {
        let name = name.into();
        rules.check(&name)?;
        Ok(Self(name))
    }

    /// The branch name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Branch {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Branch> for String {
    fn from(branch: Branch) -> Self {
        branch.0
    }
}

impl AsRef<str> for Branch {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

macro_rules! role_branch {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Branch);

        impl $name {
            /// Validate `name` with the default [`BranchRules`].
            pub fn new(name: impl Into<String>) -> Result<Self> {
                Branch::new(name).map(Self)
            }

            /// Validate `name` with explicit rules.
            pub fn with_rules(name: impl Into<String>, rules: &BranchRules) -> Result<Self> {
                Branch::with_rules(name, rules).map(Self)
            }

            /// The underlying branch, without its role
            pub const fn as_branch(&self) -> &Branch {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = Branch;

            fn deref(&self) -> &Branch {
                &self.0
            }
        }

        impl From<Branch> for $name {
            fn from(branch: Branch) -> Self {
                Self(branch)
            }
        }

        impl From<$name> for Branch {
            fn from(branch: $name) -> Self {
                branch.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

role_branch!(
    /// Base (target) branch of a pull request
    BaseBranch
);

role_branch!(
    /// Head (source) branch of a pull request
    HeadBranch
);

/// A full 40-character lowercase hex commit id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commit(String);

impl Commit {
    /// Validate a commit hash (format only, existence is git's business).
    pub fn parse(hash: impl Into<String>) -> Result<Self> {
        let hash = hash.into();
        let valid = hash.len() == 40
            && hash
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(hash))
        } else {
            Err(Error::InvalidCommit(hash))
        }
    }

    /// The full hash
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 7 characters, for display
    pub fn short(&self) -> &str {
        &self.0[..7]
    }

    /// Whether an abbreviated hash printed by git refers to this commit.
    pub fn matches_abbrev(&self, abbrev: &str) -> bool {
        abbrev.len() >= 4 && self.0.starts_with(abbrev)
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Commit {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Commit> for String {
    fn from(commit: Commit) -> Self {
        commit.0
    }
}
