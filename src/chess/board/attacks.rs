use arrayvec::ArrayVec;

use crate::chess::{
    board::Board,
    piece::{Colour, Piece, PieceType},
    types::Square,
};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] =
    [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
pub const KING_OFFSETS: [(i8, i8); 8] =
    [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// One side can never have more than sixteen pieces.
pub type Attackers = ArrayVec<Square, 16>;

impl Board {
    /// Is `sq` attacked by any piece belonging to `by`?
    pub fn is_attacked(&self, sq: Square, by: Colour) -> bool {
        !self.scan_attackers(sq, by, true).is_empty()
    }

    /// Every square holding a piece of `by` that attacks `sq`.
    pub fn attackers(&self, sq: Square, by: Colour) -> Attackers {
        self.scan_attackers(sq, by, false)
    }

    fn scan_attackers(&self, sq: Square, by: Colour, first_only: bool) -> Attackers {
        let mut found = Attackers::new();

        // a pawn of `by` attacks diagonally forward, so look one rank behind
        for df in [-1, 1] {
            if let Some(from) = sq.offset(df, -by.forward())
                && self.mailbox[from] == Some(Piece::new(by, PieceType::Pawn))
            {
                found.push(from);
                if first_only {
                    return found;
                }
            }
        }

        for (offsets, piece_type) in
            [(&KNIGHT_OFFSETS, PieceType::Knight), (&KING_OFFSETS, PieceType::King)]
        {
            let target = Some(Piece::new(by, piece_type));
            for &(df, dr) in offsets {
                if let Some(from) = sq.offset(df, dr)
                    && self.mailbox[from] == target
                {
                    found.push(from);
                    if first_only {
                        return found;
                    }
                }
            }
        }

        for (directions, slider) in
            [(&BISHOP_DIRECTIONS, PieceType::Bishop), (&ROOK_DIRECTIONS, PieceType::Rook)]
        {
            for &(df, dr) in directions {
                if let Some(from) = self.first_blocker(sq, df, dr)
                    && let Some(piece) = self.mailbox[from]
                    && piece.colour() == by
                    && matches!(piece.piece_type(), pt if pt == slider || pt == PieceType::Queen)
                {
                    found.push(from);
                    if first_only {
                        return found;
                    }
                }
            }
        }

        found
    }

    /// Walks from `sq` in direction (`df`, `dr`) and returns the first occupied square.
    pub(super) fn first_blocker(&self, sq: Square, df: i8, dr: i8) -> Option<Square> {
        let mut cursor = sq;
        while let Some(next) = cursor.offset(df, dr) {
            if self.mailbox[next].is_some() {
                return Some(next);
            }
            cursor = next;
        }
        None
    }
}
