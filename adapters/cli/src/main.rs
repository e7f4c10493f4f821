#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line entry point that plays one game of the funnel algo over stdio.

use std::{
    io::{self, BufWriter},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use funnel_cli::{load_tuning, run};
use funnel_system_turn_controller::Tuning;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the funnel algo.
#[derive(Debug, Parser)]
#[command(name = "funnel-algo")]
#[command(about = "Plays the funnel strategy against the game engine over stdio")]
struct Args {
    /// TOML file overriding the default controller tuning
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_filter: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let tuning = match &args.tuning {
        Some(path) => load_tuning(path)?,
        None => Tuning::default(),
    };
    info!(?tuning, "starting funnel algo");

    let stdin = io::stdin();
    let summary = run(stdin.lock(), BufWriter::new(io::stdout().lock()), tuning)?;
    info!(
        turns = summary.turns_played,
        attacks = summary.attacks_launched,
        game_over = summary.game_over,
        "session finished"
    );
    Ok(())
}
