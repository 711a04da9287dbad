//! Repository detection from remote URLs

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use url::Url;

/// Parse a git remote URL into a [`PlatformConfig`].
///
/// Accepts scp-like (`git@github.com:owner/repo.git`), `https://` and
/// `ssh://` forms. Hosts other than `github.com` are treated as GitHub
/// Enterprise.
pub fn parse_repo_info(remote_url: &str) -> Result<PlatformConfig> {
    let unsupported = || Error::Config(format!("cannot parse GitHub repository from '{remote_url}'"));
    let trimmed = remote_url.trim();

    let (host, path) = if trimmed.contains("://") {
        let url = Url::parse(trimmed).map_err(|_| unsupported())?;
        let host = url.host_str().ok_or_else(unsupported)?.to_string();
        (host, url.path().to_string())
    } else {
        // scp-like syntax: [user@]host:path
        let (user_host, path) = trimmed.split_once(':').ok_or_else(unsupported)?;
        let host = user_host.rsplit('@').next().unwrap_or(user_host);
        (host.to_string(), path.to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    let (Some(owner), Some(repo), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(unsupported());
    };
    if owner.is_empty() || repo.is_empty() || host.is_empty() {
        return Err(unsupported());
    }

    Ok(PlatformConfig {
        platform: Platform::GitHub,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: (host != "github.com").then_some(host),
    })
}
