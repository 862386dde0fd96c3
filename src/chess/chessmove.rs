use std::fmt::{Debug, Display, Formatter};

use crate::chess::{piece::PieceType, types::Square};

/// A move as a (from, to, promotion) triple.
///
/// Castling is written as the king capturing its own rook, so `to` is the
/// rook's origin square rather than the king's destination. Only the board
/// knows which moves are castles; the move itself carries no flags.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceType>,
}

impl Move {
    pub const NULL: Self = Self { from: Square::A1, to: Square::A1, promotion: None };

    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to, promotion: None }
    }

    pub fn new_with_promo(from: Square, to: Square, promotion: PieceType) -> Self {
        debug_assert!(promotion.legal_promo(), "cannot promote to {promotion:?}");
        Self { from, to, promotion: Some(promotion) }
    }

    pub const fn from(self) -> Square {
        self.from
    }

    pub const fn to(self) -> Square {
        self.to
    }

    pub const fn promotion(self) -> Option<PieceType> {
        self.promotion
    }

    pub const fn is_promo(self) -> bool {
        self.promotion.is_some()
    }

    pub const fn is_null(self) -> bool {
        matches!(self.from, Square::A1) && matches!(self.to, Square::A1)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }

        write!(f, "{}{}", self.from, self.to)?;
        if let Some(pchar) = self.promotion.and_then(PieceType::promo_char) {
            write!(f, "{pchar}")?;
        }

        Ok(())
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "move from {} ({:?}) to {} ({:?}), promo {}",
            self.from,
            self.from,
            self.to,
            self.to,
            self.promotion.and_then(PieceType::promo_char).unwrap_or('X'),
        )
    }
}
