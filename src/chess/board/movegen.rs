use std::{
    fmt::{Display, Formatter},
    ops::Deref,
};

use arrayvec::ArrayVec;

use crate::chess::{
    board::{
        Board,
        attacks::{BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS},
    },
    chessmove::Move,
    piece::{Piece, PieceType},
    types::{CastlingRights, File, Rank, Square, Wing},
};

/// Capacity of a pseudo-legal move list. Reachable positions top out at 218
/// legal moves, and pseudo-legal lists for composed positions run longer.
pub const MAX_POSITION_MOVES: usize = 256;

#[derive(Clone, Debug, Default)]
pub struct MoveList {
    inner: ArrayVec<Move, MAX_POSITION_MOVES>,
}

impl MoveList {
    pub fn new() -> Self {
        Self { inner: ArrayVec::new() }
    }

    fn push(&mut self, m: Move) {
        self.inner.push(m);
    }
}

impl Deref for MoveList {
    type Target = [Move];

    fn deref(&self) -> &[Move] {
        &self.inner
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl Display for MoveList {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "MoveList: ({}) [", self.inner.len())?;
        for (i, m) in self.inner.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{m}")?;
        }
        write!(f, "]")
    }
}

impl Board {
    /// Fills `move_list` with every pseudo-legal move for the side to move.
    /// King safety is not considered here, see [`Board::legal_moves`].
    pub fn generate_moves(&self, move_list: &mut MoveList) {
        let us = self.side;
        for from in Square::all() {
            let Some(piece) = self.mailbox[from] else { continue };
            if piece.colour() != us {
                continue;
            }
            match piece.piece_type() {
                PieceType::Pawn => self.generate_pawn_moves(from, move_list),
                PieceType::Knight => self.generate_leaper_moves(from, &KNIGHT_OFFSETS, move_list),
                PieceType::King => self.generate_leaper_moves(from, &KING_OFFSETS, move_list),
                PieceType::Bishop => self.generate_slider_moves(from, &BISHOP_DIRECTIONS, move_list),
                PieceType::Rook => self.generate_slider_moves(from, &ROOK_DIRECTIONS, move_list),
                PieceType::Queen => {
                    self.generate_slider_moves(from, &BISHOP_DIRECTIONS, move_list);
                    self.generate_slider_moves(from, &ROOK_DIRECTIONS, move_list);
                }
            }
        }
        self.generate_castling_moves(move_list);
    }

    fn is_enemy(&self, sq: Square) -> bool {
        self.mailbox[sq].is_some_and(|p| p.colour() != self.side)
    }

    fn push_pawn_move(&self, from: Square, to: Square, move_list: &mut MoveList) {
        if to.relative_rank(self.side) == Rank::Eight {
            for promo in PieceType::PROMOTIONS {
                move_list.push(Move::new_with_promo(from, to, promo));
            }
        } else {
            move_list.push(Move::new(from, to));
        }
    }

    fn generate_pawn_moves(&self, from: Square, move_list: &mut MoveList) {
        let forward = self.side.forward();

        if let Some(one) = from.offset(0, forward)
            && self.mailbox[one].is_none()
        {
            self.push_pawn_move(from, one, move_list);
            if from.relative_rank(self.side) == Rank::Two
                && let Some(two) = one.offset(0, forward)
                && self.mailbox[two].is_none()
            {
                move_list.push(Move::new(from, two));
            }
        }

        for df in [-1, 1] {
            if let Some(to) = from.offset(df, forward)
                && (self.is_enemy(to) || self.is_ep(Move::new(from, to)))
            {
                self.push_pawn_move(from, to, move_list);
            }
        }
    }

    fn generate_leaper_moves(&self, from: Square, offsets: &[(i8, i8)], move_list: &mut MoveList) {
        for &(df, dr) in offsets {
            if let Some(to) = from.offset(df, dr)
                && self.mailbox[to].is_none_or(|p| p.colour() != self.side)
            {
                move_list.push(Move::new(from, to));
            }
        }
    }

    fn generate_slider_moves(&self, from: Square, directions: &[(i8, i8)], move_list: &mut MoveList) {
        for &(df, dr) in directions {
            let mut cursor = from;
            while let Some(to) = cursor.offset(df, dr) {
                match self.mailbox[to] {
                    None => move_list.push(Move::new(from, to)),
                    Some(p) => {
                        if p.colour() != self.side {
                            move_list.push(Move::new(from, to));
                        }
                        break;
                    }
                }
                cursor = to;
            }
        }
    }

    fn generate_castling_moves(&self, move_list: &mut MoveList) {
        let us = self.side;
        let king_home = Square::E1.relative_to(us);
        if self.mailbox[king_home] != Some(Piece::new(us, PieceType::King)) {
            return;
        }

        for wing in Wing::all() {
            let Some(rook_sq) = self.castling.rook(us, wing) else { continue };
            debug_assert_eq!(rook_sq, CastlingRights::home(us, wing));
            if self.mailbox[rook_sq] != Some(Piece::new(us, PieceType::Rook)) {
                continue;
            }

            let (lo, hi) = if rook_sq < king_home { (rook_sq, king_home) } else { (king_home, rook_sq) };
            let path_clear = Square::all()
                .filter(|&sq| sq > lo && sq < hi)
                .all(|sq| self.mailbox[sq].is_none());
            if !path_clear {
                continue;
            }

            let king_files: [File; 3] = match wing {
                Wing::King => [File::E, File::F, File::G],
                Wing::Queen => [File::E, File::D, File::C],
            };
            let rank = king_home.rank();
            if king_files.into_iter().any(|file| self.is_attacked(file.with(rank), !us)) {
                continue;
            }

            move_list.push(Move::new(king_home, rook_sq));
        }
    }

    /// Does `m` leave the mover's own king safe? `m` must be pseudo-legal.
    pub fn is_legal(&self, m: Move) -> bool {
        let us = self.side;
        let next = self.make_move(m);
        next.king_sq(us).is_none_or(|king| !next.is_attacked(king, !us))
    }

    pub fn legal_moves(&self) -> MoveList {
        let mut pseudo = MoveList::new();
        self.generate_moves(&mut pseudo);
        let mut legal = MoveList::new();
        for &m in &pseudo {
            if self.is_legal(m) {
                legal.push(m);
            }
        }
        legal
    }

    pub fn has_legal_moves(&self) -> bool {
        let mut pseudo = MoveList::new();
        self.generate_moves(&mut pseudo);
        pseudo.iter().any(|&m| self.is_legal(m))
    }
}
