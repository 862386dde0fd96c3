#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Rookery, a chess move generator and perft tool.

use std::time::Instant;

use anyhow::{Context, bail};
use rookery::{
    chess::board::{Board, GameOutcome},
    perft,
};
use tracing_subscriber::EnvFilter;

mod cli;

fn load(fen: &str) -> anyhow::Result<Board> {
    Board::from_fen(fen).with_context(|| format!("invalid FEN \"{fen}\""))
}

fn threads_or_default(threads: Option<usize>) -> usize {
    threads.unwrap_or_else(num_cpus::get).max(1)
}

fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    unsafe {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = <cli::Cli as clap::Parser>::parse();

    match cli.subcommand {
        cli::Subcommands::Perft { depth, fen, threads, stats } => {
            let pos = load(&fen)?;
            let start = Instant::now();
            if stats {
                println!("{}", perft::perft_stats(&pos, depth));
            } else {
                let threads = threads_or_default(threads);
                tracing::debug!(depth, threads, "starting perft");
                let nodes = perft::parallel_perft(&pos, depth, threads);
                println!("{nodes}");
            }
            tracing::info!(elapsed_ms = start.elapsed().as_millis(), "perft finished");
        }
        cli::Subcommands::Divide { depth, fen } => {
            let pos = load(&fen)?;
            let mut total = 0;
            for (m, nodes) in perft::divide(&pos, depth) {
                let san = pos.san(m).map_or_else(|| m.to_string(), |san| san.to_string());
                println!("{san:<8}{:<7}{nodes}", pos.uci(m));
                total += nodes;
            }
            println!("total: {total}");
        }
        cli::Subcommands::Suite { path, node_limit, threads } => {
            let report = perft::gamut(&path, node_limit, threads_or_default(threads))?;
            println!("{} passed, {} failed, {} skipped", report.passed, report.failed, report.skipped);
            if report.failed > 0 {
                bail!("{} perft suite entries failed", report.failed);
            }
        }
        cli::Subcommands::Moves { fen } => {
            let pos = load(&fen)?;
            for line in perft::describe_moves(&pos) {
                println!("{line}");
            }
        }
        cli::Subcommands::Show { fen, moves } => {
            let mut pos = load(&fen)?;
            for text in &moves {
                let m = pos.parse_move(text).with_context(|| format!("cannot play \"{text}\" in {pos}"))?;
                pos = pos.make_move(m);
            }
            println!("{pos:X}");
            match pos.outcome() {
                None if pos.in_check() => println!("check"),
                None => println!("in progress"),
                Some(GameOutcome::WhiteWin(how)) => println!("white wins ({how:?})"),
                Some(GameOutcome::BlackWin(how)) => println!("black wins ({how:?})"),
                Some(GameOutcome::Draw(how)) => println!("draw ({how:?})"),
            }
        }
        cli::Subcommands::Bench { iterations } => {
            perft::bench(iterations)?;
        }
    }

    Ok(())
}
