//! Push command - publish every head of a chain

use crate::cli::context::CommandContext;
use crate::cli::select::select_chain;
use crate::cli::style::{CHECK, Stylize, check};
use anstream::println;
use pr_chain::error::Result;
use pr_chain::sync::push_chain;

/// Run the push command
pub async fn run_push(ctx: &CommandContext, leaf: Option<&str>) -> Result<()> {
    let chains = ctx.fetch_chains().await?;
    let Some(chain) = select_chain(&chains, leaf)? else {
        println!("{}", "Aborting, no chains found.".muted());
        return Ok(());
    };

    let _lock = ctx.lock()?;
    let report = push_chain(chain, &ctx.repo)?;

    for head in &report.pushed {
        println!("  {} Pushed {}", check(), head.accent());
    }
    for head in &report.up_to_date {
        println!("  {} {}", "=".muted(), format!("{head} already up to date").muted());
    }
    println!(
        "{} {} pushed, {} up to date",
        format!("{CHECK} Push complete:").success(),
        report.pushed.len().accent(),
        report.up_to_date.len().accent()
    );
    Ok(())
}
