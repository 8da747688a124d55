//! Ember Control - CLI for the Ember engagement engine
//!
//! Drives the engine against the local state store and renders the
//! aggregate read model. The persona label and signals snapshot normally
//! arrive from the analytics pipeline; here they are supplied as flags and
//! a JSON file so flows can be exercised end to end.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "emberctl")]
#[command(about = "Ember - engagement engine for the financial education dashboard", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Config file path (defaults to /etc/ember/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// User id (defaults to the configured default user)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the user's engagement status
    Status,

    /// Record a tracked activity
    Record {
        /// Activity label, e.g. recommendation_completed or calculator_used
        activity: String,

        /// Explicit point override
        #[arg(long)]
        points: Option<u32>,

        /// Persona label from the analytics pipeline
        #[arg(long)]
        persona: Option<String>,

        /// Path to a signals snapshot JSON file
        #[arg(long)]
        signals: Option<PathBuf>,
    },

    /// List the challenge catalog
    Challenges,

    /// Manage the active challenge
    Challenge {
        #[command(subcommand)]
        action: ChallengeAction,
    },

    /// Evaluate persona milestones against a signals snapshot
    Milestones {
        /// Persona label from the analytics pipeline
        #[arg(long)]
        persona: String,

        /// Path to a signals snapshot JSON file
        #[arg(long)]
        signals: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ChallengeAction {
    /// Start a catalog challenge
    Start {
        /// Challenge id from the catalog
        id: String,
    },
    /// Complete the active challenge
    Complete {
        /// Persona label from the analytics pipeline
        #[arg(long)]
        persona: Option<String>,

        /// Path to a signals snapshot JSON file
        #[arg(long)]
        signals: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::build(cli.config.as_deref(), cli.user.clone())?;

    match cli.command {
        Commands::Status => commands::status(&ctx),
        Commands::Record {
            activity,
            points,
            persona,
            signals,
        } => commands::record(&ctx, &activity, points, persona.as_deref(), signals.as_deref()),
        Commands::Challenges => commands::challenges(),
        Commands::Challenge { action } => match action {
            ChallengeAction::Start { id } => commands::challenge_start(&ctx, &id),
            ChallengeAction::Complete { persona, signals } => {
                commands::challenge_complete(&ctx, persona.as_deref(), signals.as_deref())
            }
        },
        Commands::Milestones { persona, signals } => {
            commands::milestones(&persona, signals.as_deref())
        }
    }
}
