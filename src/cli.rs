use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rookery::chess::board::STARTING_FEN;

#[derive(Parser)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommands,
}

#[derive(Subcommand)]
pub enum Subcommands {
    /// Count the leaf nodes of the legal move tree.
    Perft {
        /// Depth of the tree, in plies.
        #[clap(short, long, default_value = "5")]
        depth: usize,
        /// Position to count from.
        #[clap(long, default_value = STARTING_FEN)]
        fen: String,
        /// Worker threads; defaults to the number of logical cores.
        #[clap(short, long)]
        threads: Option<usize>,
        /// Also break down the leaves by move kind. Always single-threaded.
        #[clap(long, conflicts_with = "threads")]
        stats: bool,
    },
    /// Show the perft count under each root move.
    Divide {
        #[clap(short, long, default_value = "4")]
        depth: usize,
        #[clap(long, default_value = STARTING_FEN)]
        fen: String,
    },
    /// Run a perft EPD suite, lines of the form `<fen> ;D1 20 ;D2 400`.
    Suite {
        #[clap(long, value_name = "PATH", default_value = "epds/perftsuite.epd")]
        path: PathBuf,
        /// Skip any depth whose expected count is above this.
        #[clap(long, value_name = "NODES", default_value = "60000000")]
        node_limit: u64,
        #[clap(short, long)]
        threads: Option<usize>,
    },
    /// List the legal moves of a position with the position each one reaches.
    Moves {
        #[clap(long, default_value = STARTING_FEN)]
        fen: String,
    },
    /// Print a board diagram and the game state of a position.
    Show {
        #[clap(long, default_value = STARTING_FEN)]
        fen: String,
        /// Moves to play first, in SAN or coordinate notation.
        moves: Vec<String>,
    },
    /// Measure move generation throughput.
    Bench {
        #[clap(short, long, default_value = "100000")]
        iterations: usize,
    },
}
