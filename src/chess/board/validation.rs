use crate::{
    chess::{
        board::Board,
        piece::{Colour, Piece, PieceType},
        types::{CastlingRights, Rank, Square, Wing},
    },
    errors::PositionValidityError,
};

impl Board {
    /// Consistency check for boards built through FEN parsing and move
    /// application. Positions outside those paths may fail it.
    pub fn check_validity(&self) -> Result<(), PositionValidityError> {
        // exactly one king per side
        for colour in Colour::all() {
            let king = Some(Piece::new(colour, PieceType::King));
            let count = self.mailbox.iter().filter(|&&p| p == king).count();
            if count != 1 {
                return Err(PositionValidityError::KingCount { colour, count });
            }
        }

        for sq in Square::all() {
            if matches!(sq.rank(), Rank::One | Rank::Eight)
                && self.mailbox[sq].is_some_and(|p| p.piece_type() == PieceType::Pawn)
            {
                return Err(PositionValidityError::PawnOnBackRank(sq));
            }
        }

        if let Some(ep) = self.ep_sq {
            let expected = match self.side {
                Colour::White => Rank::Six,
                Colour::Black => Rank::Three,
            };
            if !matches!(ep.rank(), Rank::Three | Rank::Six) {
                return Err(PositionValidityError::MisplacedEnPassant(ep));
            }
            if ep.rank() != expected {
                return Err(PositionValidityError::EnPassantWrongSide { sq: ep, side: self.side });
            }
        }

        for colour in Colour::all() {
            for wing in Wing::all() {
                if let Some(rook) = self.castling.rook(colour, wing)
                    && rook != CastlingRights::home(colour, wing)
                {
                    return Err(PositionValidityError::BadCastlingSquare(rook));
                }
            }
        }

        if let Some(king) = self.king_sq(!self.side)
            && self.is_attacked(king, self.side)
        {
            return Err(PositionValidityError::OpponentInCheck);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        chess::{board::Board, piece::Colour, types::Square},
        errors::PositionValidityError,
    };

    #[test]
    fn standard_positions_are_valid() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        ] {
            assert_eq!(Board::from_fen(fen).unwrap().check_validity(), Ok(()), "{fen}");
        }
    }

    #[test]
    fn corruption_is_reported() {
        let two_kings = Board::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1").unwrap();
        assert_eq!(
            two_kings.check_validity(),
            Err(PositionValidityError::KingCount { colour: Colour::White, count: 2 })
        );
        let no_kings = Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert!(matches!(no_kings.check_validity(), Err(PositionValidityError::KingCount { .. })));
        let pawn = Board::from_fen("4k2P/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn.check_validity(), Err(PositionValidityError::PawnOnBackRank(Square::H8)));
        let ep = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - e3 0 1").unwrap();
        assert!(matches!(ep.check_validity(), Err(PositionValidityError::EnPassantWrongSide { .. })));
        let ep = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - e4 0 1").unwrap();
        assert_eq!(ep.check_validity(), Err(PositionValidityError::MisplacedEnPassant(Square::E4)));
        let exposed = Board::from_fen("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        assert_eq!(exposed.check_validity(), Err(PositionValidityError::OpponentInCheck));
    }
}
