//! Command-line interface for strictly_lines.

use clap::{Parser, Subcommand};
use strictly_lines::GameMode;

/// Strictly Lines - N-by-N tic-tac-toe engine
#[derive(Parser, Debug)]
#[command(name = "strictly_lines")]
#[command(about = "N-by-N tic-tac-toe with incremental win detection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game on the terminal
    Play {
        /// Path to a TOML game config
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Board size (overrides config)
        #[arg(short, long)]
        size: Option<usize>,

        /// Game mode (overrides config)
        #[arg(short, long, value_enum)]
        mode: Option<GameMode>,

        /// Bot seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Replay a move-history file and print the final board
    Replay {
        /// File with one `[row,col]` per line
        file: std::path::PathBuf,

        /// Board size
        #[arg(short, long, default_value = "3")]
        size: usize,

        /// Stop at the first rejected move instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Print the winning lines of a board size
    Lines {
        /// Board size
        #[arg(short, long, default_value = "3")]
        size: usize,

        /// Print lines grouped by position instead
        #[arg(long)]
        by_position: bool,
    },

    /// Run bot-versus-bot games and print the score
    Simulate {
        /// Board size
        #[arg(short, long, default_value = "3")]
        size: usize,

        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Seed for both bots
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}
