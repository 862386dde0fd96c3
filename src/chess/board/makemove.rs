use crate::chess::{
    board::Board,
    chessmove::Move,
    piece::{Colour, Piece, PieceType},
    types::{File, Rank, Square},
};

impl Board {
    /// Is `m` a castling move, i.e. the side to move's king stepping onto its own rook?
    pub fn is_castle(&self, m: Move) -> bool {
        matches!(
            (self.mailbox[m.from()], self.mailbox[m.to()]),
            (Some(king), Some(rook))
                if king.piece_type() == PieceType::King
                    && rook == Piece::new(king.colour(), PieceType::Rook)
        )
    }

    /// The piece that `m` removes from the board, if any.
    pub fn captured_piece(&self, m: Move) -> Option<Piece> {
        if self.is_castle(m) {
            return None;
        }
        let moved = self.mailbox[m.from()]?;
        if let Some(victim) = self.mailbox[m.to()] {
            return Some(victim);
        }
        if moved.piece_type() == PieceType::Pawn && self.is_ep(m) {
            return self.mailbox[Square::from_rank_file(m.from().rank(), m.to().file())];
        }
        None
    }

    pub fn is_capture(&self, m: Move) -> bool {
        self.captured_piece(m).is_some()
    }

    /// Is `m` a pawn moving diagonally onto the en passant square, with an
    /// enemy pawn standing on the square it passes?
    pub fn is_ep(&self, m: Move) -> bool {
        if self.ep_sq != Some(m.to()) || m.from().file() == m.to().file() {
            return false;
        }
        let passed = Square::from_rank_file(m.from().rank(), m.to().file());
        matches!(
            (self.mailbox[m.from()], self.mailbox[passed]),
            (Some(pawn), Some(victim))
                if pawn.piece_type() == PieceType::Pawn
                    && victim == Piece::new(!pawn.colour(), PieceType::Pawn)
        )
    }

    /// Returns the board reached by playing `m`. `self` is left untouched.
    ///
    /// `m` is trusted to be pseudo-legal; use [`Board::is_legal`] or
    /// [`Board::legal_moves`] to screen moves first.
    pub fn make_move(&self, m: Move) -> Self {
        if m.is_null() {
            return self.make_null_move();
        }
        let mut next = *self;
        let us = self.side;
        let (from, to) = (m.from(), m.to());
        let Some(piece) = self.mailbox[from] else {
            debug_assert!(self.mailbox[from].is_some(), "no piece to move on {from}");
            return next;
        };
        let captured = self.captured_piece(m);

        next.ep_sq = None;

        if self.is_castle(m) {
            let rank = from.rank();
            let (king_file, rook_file) =
                if to.file() > from.file() { (File::G, File::F) } else { (File::C, File::D) };
            next.mailbox[from] = None;
            next.mailbox[to] = None;
            next.mailbox[king_file.with(rank)] = Some(piece);
            next.mailbox[rook_file.with(rank)] = Some(Piece::new(us, PieceType::Rook));
            next.castling.clear(us);
        } else {
            let mut placed = piece;
            if piece.piece_type() == PieceType::Pawn {
                if from.rank().abs_diff(to.rank()) == 2 {
                    next.ep_sq = from.offset(0, us.forward());
                } else if self.is_ep(m) {
                    next.mailbox[Square::from_rank_file(from.rank(), to.file())] = None;
                }
                if to.relative_rank(us) == Rank::Eight {
                    placed = Piece::new(us, m.promotion().unwrap_or(PieceType::Queen));
                }
            }
            next.mailbox[from] = None;
            next.mailbox[to] = Some(placed);
        }

        next.castling.remove(from);
        next.castling.remove(to);
        if piece.piece_type() == PieceType::King {
            next.castling.clear(us);
        }

        if piece.piece_type() == PieceType::Pawn || captured.is_some() {
            next.fifty_move_counter = 0;
        } else {
            next.fifty_move_counter += 1;
        }

        next.side = !us;
        if next.side == Colour::White {
            next.fullmove += 1;
        }

        next
    }

    /// Passes the turn: flips the side to move and forgets the en passant square.
    pub fn make_null_move(&self) -> Self {
        let mut next = *self;
        next.side = !self.side;
        next.ep_sq = None;
        next
    }
}
