//! Review command - request reviews on every PR of a chain

use crate::cli::context::CommandContext;
use crate::cli::select::select_chain;
use crate::cli::style::{Stylize, check, pr_link};
use anstream::println;
use pr_chain::error::{Error, Result};

/// Run the review command
pub async fn run_review(ctx: &CommandContext, leaf: Option<&str>, publish: bool) -> Result<()> {
    let reviewers = &ctx.config.reviewers;
    if reviewers.is_empty() {
        return Err(Error::Config(
            "no reviewers configured; set `reviewers` in the config file or REVIEWERS".to_string(),
        ));
    }

    let chains = ctx.fetch_chains().await?;
    let Some(chain) = select_chain(&chains, leaf)? else {
        println!("{}", "Aborting, no chains found.".muted());
        return Ok(());
    };

    let mut drafts = Vec::new();
    for pr in chain {
        ctx.platform.request_reviewers(pr.number, reviewers).await?;
        println!(
            "  {} Requested review on {} from {}",
            check(),
            pr_link(pr.number, &pr.html_url),
            reviewers.join(", ").accent()
        );

        if pr.is_draft {
            if publish {
                ctx.platform.publish_pr(pr.number).await?;
                println!("  {} Marked #{} ready for review", check(), pr.number);
            } else {
                drafts.push(pr.number);
            }
        }
    }

    if !drafts.is_empty() {
        let list: Vec<String> = drafts.iter().map(|n| format!("#{n}")).collect();
        println!();
        println!(
            "{} {}",
            "Still drafts:".warn(),
            list.join(", ").warn()
        );
        println!(
            "{}",
            "   Run again with --publish to mark them ready for review.".muted()
        );
    }
    Ok(())
}
