// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wafwatch::config::DEFAULT_EVENT_LOG_PATH;
use wafwatch_cli::commands::{inspect, timeline};

#[derive(Parser)]
#[command(name = "wafwatch")]
#[command(about = "wafwatch - offline view of the ModSecurity audit log", long_about = None)]
struct Cli {
    /// Path to the audit log
    #[arg(long, global = true, env = "MODSEC_LOG_FILE", default_value = DEFAULT_EVENT_LOG_PATH)]
    log: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether the audit log exists and summarize its contents.
    Inspect,
    /// List recorded events, newest first
    Timeline {
        /// Only show events matching this term (client ip, URI, rule id or message)
        #[arg(long, short)]
        query: Option<String>,

        /// Show at most this many events
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect => inspect::run(&cli.log),
        Commands::Timeline { query, limit } => timeline::run(&cli.log, query.as_deref(), limit),
    }
}
