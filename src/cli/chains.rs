//! Chains command - list the user's PR chains

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, pr_link};
use anstream::println;
use pr_chain::error::{Error, Result};

/// Run the chains command
pub async fn run_chains(ctx: &CommandContext, json: bool) -> Result<()> {
    let chains = ctx.fetch_chains().await?;

    if json {
        let out = serde_json::to_string_pretty(&chains)
            .map_err(|e| Error::Internal(format!("Failed to serialize chains: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    if chains.is_empty() {
        println!("{}", "No chains of two or more open PRs found".muted());
        return Ok(());
    }

    for chain in &chains {
        println!();
        println!("{} {}", "Chain ending at".emphasis(), chain.leaf().accent());
        for pr in chain {
            let draft = if pr.is_draft { " [draft]".muted() } else { String::new() };
            println!(
                "  {} {} {}{}",
                arrow(),
                pr_link(pr.number, &pr.html_url),
                pr.title,
                draft
            );
            println!("      {}", format!("{} <- {}", pr.base, pr.head).muted());
        }
    }
    Ok(())
}
