//! Create command - open draft PRs from a branch-list file

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, pr_link};
use anstream::println;
use dialoguer::{Confirm, Select};
use pr_chain::blueprint::{BRANCHES_DIR, blueprints_from_branches, find_branches_files, load_branches};
use pr_chain::error::{Error, Result};
use pr_chain::ids::Branch;
use pr_chain::types::PullRequestBlueprint;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Run the create command
pub async fn run_create(ctx: &CommandContext, file: Option<&Path>, yes: bool) -> Result<()> {
    let file = match file {
        Some(f) => f.to_path_buf(),
        None => pick_branches_file(&ctx.repo.path().join(BRANCHES_DIR))?,
    };
    println!("Using {}", file.display().accent());

    let branches = load_branches(&file, &ctx.config.branch_rules)?;
    let blueprints = blueprints_from_branches(&branches, ctx.prefix(), ctx.repo.trunk())?;

    let mut missing = Vec::new();
    let unique: BTreeSet<&Branch> = branches.iter().collect();
    for branch in unique {
        if !ctx.platform.branch_exists(branch).await? {
            missing.push(branch.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(Error::Precondition(format!(
            "branches not found on GitHub: {}",
            missing.join(", ")
        )));
    }

    print_plan(&blueprints);

    if !yes
        && !Confirm::new()
            .with_prompt("Create PRs according to the plan above?")
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
    {
        println!("{}", "Aborted".muted());
        return Ok(());
    }

    let mut created = Vec::new();
    for blueprint in &blueprints {
        let pr = ctx
            .platform
            .create_pr_with_options(&blueprint.head, &blueprint.base, &blueprint.title, None, true)
            .await?;
        println!(
            "  {} Created {} {}",
            check(),
            pr_link(pr.number, &pr.html_url),
            pr.title
        );
        created.push(pr.number);
    }

    let list: Vec<String> = created.iter().map(|n| format!("#{n}")).collect();
    println!("{} {}", "Created PRs:".success(), list.join(", "));
    Ok(())
}

/// The single branch-list file in `dir`, or the user's pick among several
fn pick_branches_file(dir: &Path) -> Result<PathBuf> {
    let mut files = find_branches_files(dir)?;
    if files.len() == 1 {
        return Ok(files.remove(0));
    }

    let names: Vec<String> = files
        .iter()
        .map(|f| {
            f.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect();
    let picked = Select::new()
        .with_prompt("Select file with branches")
        .items(&names)
        .default(0)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read selection: {e}")))?;
    Ok(files.swap_remove(picked))
}

/// Print the plan as a three-column table
fn print_plan(blueprints: &[PullRequestBlueprint]) {
    let width = |f: fn(&PullRequestBlueprint) -> usize, header: &str| {
        blueprints.iter().map(f).max().unwrap_or(0).max(header.len())
    };
    let head_w = width(|b| b.head.as_str().len(), "Source");
    let base_w = width(|b| b.base.as_str().len(), "Target");

    println!("{}:", "Plan".emphasis());
    println!(
        "  {}",
        format!("{:<head_w$}  {:<base_w$}  Title", "Source", "Target").emphasis()
    );
    for b in blueprints {
        println!(
            "  {:<head_w$}  {:<base_w$}  {}",
            b.head.as_str(),
            b.base.as_str(),
            b.title
        );
    }
    println!();
}
