//! Strictly Lines - Unified CLI
//!
//! Play, replay and inspect N-by-N tic-tac-toe games.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use strictly_lines::{
    GameConfig, GameEngine, GameMode, GameStatus, LineRegistry, MatchSession, MoveLog, MovePolicy,
    Player, RandomLinePolicy, Scoreboard,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            size,
            mode,
            seed,
        } => run_play(config, size, mode, seed),
        Command::Replay { file, size, strict } => run_replay(file, size, strict),
        Command::Lines { size, by_position } => run_lines(size, by_position),
        Command::Simulate { size, games, seed } => run_simulate(size, games, seed),
    }
}

/// Build the match config from an optional file plus flag overrides
#[instrument]
fn load_config(
    path: Option<PathBuf>,
    size: Option<usize>,
    mode: Option<GameMode>,
    seed: Option<u64>,
) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(size) = size {
        config = config.with_size(size);
    }
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }
    if let Some(seed) = seed {
        config = config.with_bot_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

/// Run an interactive game on stdin/stdout
fn run_play(
    config: Option<PathBuf>,
    size: Option<usize>,
    mode: Option<GameMode>,
    seed: Option<u64>,
) -> Result<()> {
    let config = load_config(config, size, mode, seed)?;
    let symbols = *config.symbols();
    let mut session = MatchSession::new(config)?;
    info!("Starting interactive match");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut out = std::io::stdout();

    loop {
        while let Some(pos) = session.bot_turn()? {
            writeln!(out, "Bot plays {}", pos)?;
        }

        let engine = session.engine();
        write!(out, "\n{}", engine.board().render_with(&symbols))?;

        if engine.is_terminal() {
            writeln!(out, "{}. {}", engine.status(), session.scores())?;
            write!(out, "Play again? [y/N] ")?;
            out.flush()?;
            match lines.next().transpose()? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                    session.restart()?;
                    continue;
                }
                _ => break,
            }
        }

        write!(
            out,
            "{} to move (row,col or q): ",
            symbols.of(engine.current_player())
        )?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }

        let Some(pos) = MoveLog::parse(line).into_iter().next() else {
            writeln!(out, "Could not read '{}', expected row,col", line)?;
            continue;
        };
        if let Err(e) = session.play_at(pos) {
            writeln!(out, "{}", e)?;
        }
    }

    writeln!(out, "Final score: {}", session.scores())?;
    writeln!(out, "Moves:\n{}", session.engine().log())?;
    Ok(())
}

/// Replay a move-history file
#[instrument]
fn run_replay(file: PathBuf, size: usize, strict: bool) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let moves = MoveLog::parse(&text);
    info!(moves = moves.len(), "Parsed move history");

    let engine = if strict {
        GameEngine::replay(size, moves)?
    } else {
        let (engine, skipped) = GameEngine::replay_lenient(size, moves)?;
        for pos in &skipped {
            println!("Skipped rejected move {}", pos);
        }
        engine
    };
    print!("{}", engine.board());
    match engine.status() {
        GameStatus::InProgress => println!("In progress, {} to move", engine.current_player()),
        status => println!("{} after {} moves", status, engine.log().len()),
    }
    if let Some(line) = engine.winning_line() {
        println!("Winning line: {}", line);
    }
    Ok(())
}

/// Print the winning lines of a board
#[instrument]
fn run_lines(size: usize, by_position: bool) -> Result<()> {
    let registry = LineRegistry::generate(size)?;
    if by_position {
        print!("{}", registry.render_position_index());
    } else {
        print!("{}", registry.render_active_lines());
    }
    Ok(())
}

/// Play bot against bot
#[instrument]
fn run_simulate(size: usize, games: u32, seed: u64) -> Result<()> {
    let mut scores = Scoreboard::default();
    let mut x_bot = RandomLinePolicy::new(seed);
    let mut o_bot = RandomLinePolicy::new(seed.wrapping_add(1));

    for _ in 0..games {
        let mut engine = GameEngine::new(size)?;
        while !engine.is_terminal() {
            let bot: &mut dyn MovePolicy = match engine.current_player() {
                Player::X => &mut x_bot,
                Player::O => &mut o_bot,
            };
            let pos = bot
                .choose(&engine)
                .context("Bot found no move on a live board")?;
            engine.make_move_at(pos)?;
        }
        scores.record(engine.status());
    }

    println!("{} games on {}x{}: {}", scores.games(), size, size, scores);
    Ok(())
}
