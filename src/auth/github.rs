//! GitHub token discovery

use super::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
pub const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN", "GITHUB_ACCESS_TOKEN"];

/// A GitHub token and where it came from
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Personal access token
    pub token: String,
    /// Where the token was found
    pub source: AuthSource,
}

/// Pick a token from environment-style lookups.
pub fn resolve_github_token(lookup: impl Fn(&str) -> Option<String>) -> Option<GitHubAuthConfig> {
    TOKEN_ENV_VARS.iter().find_map(|var| {
        lookup(var)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|token| {
                debug!(var, "using GitHub token from environment");
                GitHubAuthConfig {
                    token,
                    source: AuthSource::EnvVar,
                }
            })
    })
}

/// Find a GitHub token: environment first, then `gh auth token`.
pub async fn get_github_auth() -> Result<GitHubAuthConfig> {
    if let Some(auth) = resolve_github_token(|var| std::env::var(var).ok()) {
        return Ok(auth);
    }

    let output = Command::new("gh").args(["auth", "token"]).output().await;
    match output {
        Ok(out) if out.status.success() => {
            let token = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if token.is_empty() {
                return Err(Error::Auth("gh auth token returned nothing".to_string()));
            }
            debug!("using GitHub token from gh CLI");
            Ok(GitHubAuthConfig {
                token,
                source: AuthSource::Cli,
            })
        }
        _ => Err(Error::Auth(format!(
            "no GitHub token found. Set one of {} or run 'gh auth login'",
            TOKEN_ENV_VARS.join(", ")
        ))),
    }
}
