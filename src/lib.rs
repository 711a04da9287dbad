//! pr-chain - stacked pull requests on plain Git
//!
//! This library discovers chains of dependent GitHub pull requests (each PR's
//! base branch is the previous PR's head branch) and keeps them in sync by
//! merging every base into its head, from the trunk outwards.
//!
//! # Architecture
//!
//! - [`ids`] - validated branch and commit identities
//! - [`repo`] - the only place that runs `git`, turning its output into types
//! - [`graph`] - builds maximal chains from a flat list of open PRs
//! - [`sync`] - cascading merge walk and publishing of a chain
//! - [`platform`] - GitHub collaborator (listing, re-titling, creating PRs)
//!
//! State is passed explicitly through [`config::Config`] (no globals).

pub mod auth;
pub mod blueprint;
pub mod config;
pub mod error;
pub mod graph;
pub mod ids;
pub mod platform;
pub mod rename;
pub mod repo;
pub mod sync;
pub mod types;

pub use error::{Error, Result};
pub use ids::{BaseBranch, Branch, BranchRules, Commit, HeadBranch};
pub use types::*;
