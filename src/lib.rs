//! Chess rules: FEN parsing and printing, legal move generation, move
//! application, SAN and coordinate notation, and perft.

pub mod chess;
pub mod errors;
pub mod perft;
