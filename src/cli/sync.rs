//! Sync command - merge every base into its head across a chain

use crate::cli::context::CommandContext;
use crate::cli::select::select_chain;
use crate::cli::style::{CHECK, Stylize, arrow, check};
use anstream::println;
use pr_chain::error::Result;
use pr_chain::sync::{find_unmerged, push_chain, refresh_chain, sync_chain};

/// Options for the sync command
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Leaf head branch of the chain to sync
    pub leaf: Option<String>,
    /// Fast-forward every branch from the remote first
    pub pull: bool,
    /// Push every head after syncing
    pub push: bool,
    /// Report unmerged pairs without merging
    pub dry_run: bool,
}

/// Run the sync command
pub async fn run_sync(ctx: &CommandContext, options: SyncOptions) -> Result<()> {
    let chains = ctx.fetch_chains().await?;
    let Some(chain) = select_chain(&chains, options.leaf.as_deref())? else {
        println!("{}", "Aborting, no chains found.".muted());
        return Ok(());
    };

    println!("{} {}", "Syncing chain:".emphasis(), chain.to_string().accent());

    if options.dry_run {
        let unmerged = find_unmerged(chain, &ctx.repo)?;
        if unmerged.is_empty() {
            println!("{}", "Chain is already in sync".muted());
        } else {
            println!("{}:", "Not yet merged".emphasis());
            for (base, head) in &unmerged {
                println!("  {} {} into {}", arrow(), base.accent(), head.accent());
            }
        }
        println!("{}", "Dry run complete".muted());
        return Ok(());
    }

    let _lock = ctx.lock()?;

    if options.pull {
        let moved = refresh_chain(chain, &ctx.repo)?;
        for branch in &moved {
            println!("  {} Pulled {}", check(), branch.accent());
        }
    }

    let report = sync_chain(chain, &ctx.repo)?;
    for (base, head) in &report.merged {
        println!("  {} Merged {} into {}", check(), base.accent(), head.accent());
    }

    println!();
    if report.has_merges() {
        println!(
            "{} {} merge(s)",
            format!("{CHECK} Sync complete:").success(),
            report.merged.len().accent()
        );
    } else {
        println!("{}", format!("{CHECK} Chain already in sync").success());
    }

    if options.push {
        let published = push_chain(chain, &ctx.repo)?;
        println!(
            "{} {} pushed, {} up to date",
            format!("{CHECK} Push complete:").success(),
            published.pushed.len().accent(),
            published.up_to_date.len().accent()
        );
    }

    Ok(())
}
