//! Rename command - re-title every PR of a chain from a template

use crate::cli::context::CommandContext;
use crate::cli::select::select_chain;
use crate::cli::style::{Stylize, arrow, check};
use anstream::println;
use pr_chain::error::Result;
use pr_chain::rename::plan_chain_titles;

/// Run the rename command
pub async fn run_rename(
    ctx: &CommandContext,
    template: &str,
    leaf: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let chains = ctx.fetch_chains().await?;
    let Some(chain) = select_chain(&chains, leaf)? else {
        println!("{}", "Aborting, no chains found.".muted());
        return Ok(());
    };

    let trunk = ctx.repo.trunk();
    let plan = plan_chain_titles(template, chain, ctx.prefix(), trunk);

    for change in &plan {
        if !change.is_change() {
            println!(
                "  {} #{} {}",
                "=".muted(),
                change.number,
                change.new_title.muted()
            );
            continue;
        }
        if dry_run {
            println!(
                "  {} #{} {} {} {}",
                arrow(),
                change.number,
                change.old_title.muted(),
                "->".muted(),
                change.new_title.accent()
            );
        } else {
            ctx.platform
                .update_pr_title(change.number, &change.new_title)
                .await?;
            println!(
                "  {} #{} {}",
                check(),
                change.number,
                change.new_title.accent()
            );
        }
    }

    if dry_run {
        println!("{}", "Dry run complete".muted());
    }
    Ok(())
}
