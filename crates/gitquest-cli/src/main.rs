mod cmd_config;
mod cmd_exec;
mod cmd_levels;
mod cmd_play;
mod cmd_progress;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gitquest",
    version,
    about = "Learn git by repairing a broken timeline"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play interactively (default when no subcommand is given)
    Play {
        /// Level to start at (must be unlocked)
        #[arg(long)]
        level: Option<u32>,
        /// Discard saved progress before starting
        #[arg(long)]
        fresh: bool,
    },
    /// Run a single command line against a repository state file
    Exec {
        /// JSON repository state (an uninitialized repository when absent)
        #[arg(long)]
        state: Option<PathBuf>,
        /// Command line (after --)
        #[arg(last = true, required = true)]
        line: Vec<String>,
    },
    /// List levels and their status
    Levels,
    /// Show score, achievements and level status
    Progress {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete saved progress
    Reset,
    /// Manage terminal settings
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = gitquest_session::store::store_root();

    match cli.cmd.unwrap_or(Command::Play {
        level: None,
        fresh: false,
    }) {
        Command::Play { level, fresh } => cmd_play::execute(&store, level, fresh),
        Command::Exec { state, line } => cmd_exec::execute(state.as_deref(), &line),
        Command::Levels => cmd_levels::execute(&store),
        Command::Progress { json } => cmd_progress::show(&store, json),
        Command::Reset => cmd_progress::reset(&store),
        Command::Config { cmd } => cmd_config::run(cmd, &store),
    }
}
