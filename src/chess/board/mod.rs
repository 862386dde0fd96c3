mod attacks;
mod makemove;
pub mod movegen;
mod san;
pub mod validation;

use std::fmt::{self, Debug, Display, Formatter};

pub use san::SanThunk;

use crate::{
    chess::{
        chessmove::Move,
        fen::Fen,
        piece::{Colour, Piece, PieceType},
        types::{CastlingRights, CheckState, File, GamePiece, Rank, Square},
    },
    errors::FenParseError,
};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A complete chess position.
///
/// Boards are plain values: playing a move returns a fresh `Board` and never
/// mutates the one it was played on.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; 64],
    /// The side to move.
    side: Colour,
    ep_sq: Option<Square>,
    castling: CastlingRights,
    /// Half moves since the last capture or pawn move.
    fifty_move_counter: u32,
    /// Starts at one and increments after every Black move.
    fullmove: u32,
}

impl Debug for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_string())
            .field("side", &self.side)
            .field("ep_sq", &self.ep_sq)
            .field("castling", &self.castling)
            .field("fifty_move_counter", &self.fifty_move_counter)
            .field("fullmove", &self.fullmove)
            .finish_non_exhaustive()
    }
}

impl Board {
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let parsed = Fen::parse(fen).inspect_err(|e| tracing::debug!(fen, error = %e, "rejected FEN"))?;
        Ok(Self::from(parsed))
    }

    pub fn fen(&self) -> Fen {
        Fen {
            board: self.mailbox,
            turn: self.side,
            castling: self.castling,
            ep: self.ep_sq,
            halfmove: self.fifty_move_counter,
            fullmove: self.fullmove,
        }
    }

    pub const fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq as usize]
    }

    pub const fn turn(&self) -> Colour {
        self.side
    }

    pub const fn ep_sq(&self) -> Option<Square> {
        self.ep_sq
    }

    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub const fn fifty_move_counter(&self) -> u32 {
        self.fifty_move_counter
    }

    pub const fn full_move_number(&self) -> u32 {
        self.fullmove
    }

    /// All pieces of `colour`, in ascending square order.
    pub fn pieces(&self, colour: Colour) -> Vec<GamePiece> {
        Square::all()
            .filter_map(|square| {
                self.mailbox[square]
                    .filter(|p| p.colour() == colour)
                    .map(|piece| GamePiece { piece, square })
            })
            .collect()
    }

    pub fn king_sq(&self, colour: Colour) -> Option<Square> {
        let king = Some(Piece::new(colour, PieceType::King));
        Square::all().find(|&sq| self.mailbox[sq] == king)
    }

    pub fn in_check(&self) -> bool {
        self.king_sq(self.side).is_some_and(|king| self.is_attacked(king, !self.side))
    }

    pub fn is_check_or_mate(&self) -> CheckState {
        if !self.in_check() {
            CheckState::None
        } else if self.has_legal_moves() {
            CheckState::Check
        } else {
            CheckState::Checkmate
        }
    }

    /// Whether the side to move has no legal moves and is not in check.
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && !self.has_legal_moves()
    }

    /// The check status of the position after `m`.
    pub fn gives(&self, m: Move) -> CheckState {
        self.make_move(m).is_check_or_mate()
    }

    /// No sequence of legal moves can end in checkmate: bare kings, or each
    /// side with at most one knight or bishop alongside its king.
    /// Two knights against a bare king still count as mating material.
    pub fn has_insufficient_material(&self) -> bool {
        let mut minors = [0u8; 2];
        for piece in self.mailbox.iter().flatten() {
            match piece.piece_type() {
                PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
                PieceType::Knight | PieceType::Bishop => minors[piece.colour()] += 1,
                PieceType::King => (),
            }
        }
        minors.iter().all(|&n| n <= 1)
    }

    /// The result of the game if this position ends it.
    pub fn outcome(&self) -> Option<GameOutcome> {
        use DrawType::{FiftyMoves, InsufficientMaterial, Stalemate};
        use GameOutcome::{BlackWin, Draw, WhiteWin};

        if !self.has_legal_moves() {
            return Some(if !self.in_check() {
                Draw(Stalemate)
            } else if self.side == Colour::White {
                BlackWin(WinType::Mate)
            } else {
                WhiteWin(WinType::Mate)
            });
        }
        if self.has_insufficient_material() {
            return Some(Draw(InsufficientMaterial));
        }
        if self.fifty_move_counter >= 100 {
            return Some(Draw(FiftyMoves));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    BlackWin(WinType),
    Draw(DrawType),
    WhiteWin(WinType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinType {
    Mate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawType {
    FiftyMoves,
    Stalemate,
    InsufficientMaterial,
}

impl From<Fen> for Board {
    fn from(fen: Fen) -> Self {
        Self {
            mailbox: fen.board,
            side: fen.turn,
            ep_sq: fen.ep,
            castling: fen.castling,
            fifty_move_counter: fen.halfmove,
            fullmove: fen.fullmove,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        let mut mailbox = [None; 64];
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, pt) in File::all().zip(back_rank) {
            mailbox[file.with(Rank::One)] = Some(Piece::new(Colour::White, pt));
            mailbox[file.with(Rank::Two)] = Some(Piece::WP);
            mailbox[file.with(Rank::Seven)] = Some(Piece::BP);
            mailbox[file.with(Rank::Eight)] = Some(Piece::new(Colour::Black, pt));
        }
        Self {
            mailbox,
            side: Colour::White,
            ep_sq: None,
            castling: CastlingRights::ALL,
            fifty_move_counter: 0,
            fullmove: 1,
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.fen())
    }
}

impl fmt::UpperHex for Board {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        for rank in Rank::all().rev() {
            write!(f, "{} ", rank.char())?;
            for file in File::all() {
                if let Some(piece) = self.mailbox[file.with(rank)] {
                    write!(f, "{piece} ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "  a b c d e f g h")?;
        write!(f, "FEN: {self}")?;

        Ok(())
    }
}
