use thiserror::Error;

use crate::chess::{piece::Colour, types::Square};

/// Ways a FEN string can fail to describe a board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    #[error("FEN string has {0} fields, expected exactly six separated by single spaces")]
    FieldCount(usize),
    #[error("FEN board has {0} ranks, expected 8")]
    BoardSegments(usize),
    #[error("FEN rank {rank:?} covers more than 8 files")]
    RankOverflow { rank: String },
    #[error("FEN rank {rank:?} covers only {files} files, expected 8")]
    RankUnderflow { rank: String, files: u8 },
    #[error("FEN rank {rank:?} has two adjacent digits")]
    AdjacentDigits { rank: String },
    #[error("unexpected character {0:?} in FEN board")]
    UnexpectedCharacter(char),
    #[error("invalid side to move {0:?}, expected \"w\" or \"b\"")]
    InvalidSide(String),
    #[error("invalid castling rights {0:?}")]
    InvalidCastling(String),
    #[error("invalid en passant square {0:?}")]
    InvalidEnPassant(String),
    #[error("invalid halfmove clock {0:?}")]
    InvalidHalfmoveClock(String),
    #[error("invalid fullmove number {0:?}")]
    InvalidFullmoveNumber(String),
}

/// Ways a piece of move text can fail to name a legal move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("no legal move matches {0:?}")]
    NoSuchMove(String),
    #[error("move text {0:?} matches more than one legal move")]
    Ambiguous(String),
}

/// Corruption found by the debug-only board consistency check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionValidityError {
    #[error("{colour} has {count} kings")]
    KingCount { colour: Colour, count: usize },
    #[error("pawn on back rank square {0}")]
    PawnOnBackRank(Square),
    #[error("en passant square {0} is not on the third or sixth rank")]
    MisplacedEnPassant(Square),
    #[error("en passant square {sq} is on the wrong rank for {side} to move")]
    EnPassantWrongSide { sq: Square, side: Colour },
    #[error("castling right for {0} is not on a rook home square")]
    BadCastlingSquare(Square),
    #[error("side not to move is in check")]
    OpponentInCheck,
}
