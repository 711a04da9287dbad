//! Platform service construction

use crate::auth::GitHubAuthConfig;
use crate::error::Result;
use crate::ids::BranchRules;
use crate::platform::{GitHubService, PlatformService};
use crate::types::{Platform, PlatformConfig};

/// Build the service for `config`, authenticated with `auth`.
pub fn create_platform_service(
    config: &PlatformConfig,
    auth: &GitHubAuthConfig,
    rules: BranchRules,
) -> Result<Box<dyn PlatformService>> {
    match config.platform {
        Platform::GitHub => Ok(Box::new(GitHubService::new(
            &auth.token,
            config.owner.clone(),
            config.repo.clone(),
            config.host.clone(),
            rules,
        )?)),
    }
}
