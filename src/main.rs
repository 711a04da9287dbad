//! prc - stacked pull requests on plain Git

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use cli::{CommandContext, SyncOptions};
use pr_chain::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prc")]
#[command(about = "Stacked pull requests on plain Git: list, sync, push and re-title PR chains")]
#[command(version)]
struct Cli {
    /// Path to the git working copy (overrides `repo_path`)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Config file (default: <config dir>/pr-chain/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chains of your open pull requests
    Chains {
        /// Print chains as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge every base into its head across a chain
    Sync {
        /// Leaf head branch of the chain (prompts when omitted)
        #[arg(long)]
        leaf: Option<String>,

        /// Fast-forward every branch from the remote first
        #[arg(long)]
        pull: bool,

        /// Push every head branch afterwards
        #[arg(long)]
        push: bool,

        /// Show which pairs are unmerged without merging
        #[arg(long)]
        dry_run: bool,
    },

    /// Push every head branch of a chain
    Push {
        /// Leaf head branch of the chain (prompts when omitted)
        #[arg(long)]
        leaf: Option<String>,
    },

    /// Re-title every PR of a chain from a template ($1 = position, $2 = branch label)
    Rename {
        /// Title template, e.g. "[$1] my feature ($2)"
        #[arg(long, short)]
        template: String,

        /// Leaf head branch of the chain (prompts when omitted)
        #[arg(long)]
        leaf: Option<String>,

        /// Show new titles without changing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Request reviews on every PR of a chain
    Review {
        /// Leaf head branch of the chain (prompts when omitted)
        #[arg(long)]
        leaf: Option<String>,

        /// Mark draft PRs ready for review
        #[arg(long)]
        publish: bool,
    },

    /// Create draft PRs from a branch-list file
    Create {
        /// Branch-list file (default: the .txt file in branches/)
        file: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("PRC_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("warn,pr_chain=debug,prc=debug"),
        _ => EnvFilter::new("warn,pr_chain=trace,prc=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.path {
        config.repo_path = path;
    }

    let ctx = CommandContext::new(config).await?;

    match cli.command {
        Commands::Chains { json } => cli::run_chains(&ctx, json).await?,
        Commands::Sync {
            leaf,
            pull,
            push,
            dry_run,
        } => {
            cli::run_sync(
                &ctx,
                SyncOptions {
                    leaf,
                    pull,
                    push,
                    dry_run,
                },
            )
            .await?;
        }
        Commands::Push { leaf } => cli::run_push(&ctx, leaf.as_deref()).await?,
        Commands::Rename {
            template,
            leaf,
            dry_run,
        } => cli::run_rename(&ctx, &template, leaf.as_deref(), dry_run).await?,
        Commands::Review { leaf, publish } => {
            cli::run_review(&ctx, leaf.as_deref(), publish).await?;
        }
        Commands::Create { file, yes } => cli::run_create(&ctx, file.as_deref(), yes).await?,
    }

    Ok(())
}
