//! Crowns CLI - generate boards and run bot matches from the command line.

// Allow unwrap in tests and print in the CLI binary
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Crowns - a real-time conquest game engine
#[derive(Parser, Debug)]
#[command(name = "crowns")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a board and print it
    Generate {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Board side length (default: 25)
        #[arg(long, default_value = "25")]
        size: u16,

        /// Number of crowns to place (1-4)
        #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=4))]
        players: u8,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run a timed match between built-in bots
    Play {
        /// Number of bots (2-4)
        #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u8).range(2..=4))]
        players: u8,

        /// Stop after this many ticks (default: 120)
        #[arg(short, long, default_value = "120")]
        ticks: u32,

        /// Tick period in milliseconds (overrides the config file)
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Random seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Match config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Generate {
            seed,
            size,
            players,
            format,
        } => cli::generate::execute(seed, size, players, format),

        Commands::Play {
            players,
            ticks,
            tick_ms,
            seed,
            config,
            format,
        } => cli::play::execute(&cli::play::PlayOptions {
            players,
            ticks,
            tick_ms,
            seed,
            config,
            format,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
