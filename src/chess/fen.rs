use std::fmt::{self, Display, Formatter};

use arrayvec::ArrayVec;

use crate::{
    chess::{
        piece::{Colour, Piece},
        types::{CastlingRights, File, OptSquare, Rank, Square, Wing},
    },
    errors::FenParseError,
};

/// A parsed FEN record.
///
/// Parsing is strict: the six fields must be separated by single spaces and
/// spelled exactly the way [`Display`] writes them back, so every accepted
/// string survives a parse/serialise round trip byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub board: [Option<Piece>; 64],
    pub turn: Colour,
    pub castling: CastlingRights,
    pub ep: Option<Square>,
    pub halfmove: u32,
    pub fullmove: u32,
}

impl Fen {
    pub fn parse(fen: &str) -> Result<Self, FenParseError> {
        let mut fields = ArrayVec::<&str, 6>::new();
        let mut parts = fen.split(' ');
        while let Some(part) = parts.next() {
            if fields.try_push(part).is_err() {
                return Err(FenParseError::FieldCount(6 + 1 + parts.count()));
            }
        }
        if fields.len() != 6 || fields.iter().any(|f| f.is_empty()) {
            return Err(FenParseError::FieldCount(fields.iter().filter(|f| !f.is_empty()).count()));
        }

        let board = Self::parse_board(fields[0])?;
        let turn = Self::parse_turn(fields[1])?;
        let castling = Self::parse_castling(fields[2])?;
        let ep = Self::parse_ep(fields[3])?;
        let halfmove = Self::parse_counter(fields[4])
            .ok_or_else(|| FenParseError::InvalidHalfmoveClock(fields[4].to_string()))?;
        let fullmove = Self::parse_counter(fields[5])
            .ok_or_else(|| FenParseError::InvalidFullmoveNumber(fields[5].to_string()))?;

        Ok(Self { board, turn, castling, ep, halfmove, fullmove })
    }

    fn parse_board(board_str: &str) -> Result<[Option<Piece>; 64], FenParseError> {
        let mut board = [None; 64];

        let mut ranks = ArrayVec::<&str, 8>::new();
        let mut board_parts = board_str.split('/');
        while let Some(rank) = board_parts.next() {
            if ranks.try_push(rank).is_err() {
                // 8 successfully parse, plus one now, plus the rest.
                return Err(FenParseError::BoardSegments(8 + 1 + board_parts.count()));
            }
        }
        if ranks.len() != 8 {
            return Err(FenParseError::BoardSegments(ranks.len()));
        }

        // first segment is the eighth rank
        for (rank, rank_str) in Rank::all().rev().zip(ranks) {
            let mut files = 0u8;
            let mut prev_was_digit = false;

            for c in rank_str.chars() {
                if let Some(count) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    if prev_was_digit {
                        return Err(FenParseError::AdjacentDigits { rank: rank_str.to_string() });
                    }
                    prev_was_digit = true;
                    #[allow(clippy::cast_possible_truncation)]
                    let count = count as u8;
                    files += count;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenParseError::UnexpectedCharacter(c))?;
                    prev_was_digit = false;
                    let file = File::from_index(files)
                        .ok_or_else(|| FenParseError::RankOverflow { rank: rank_str.to_string() })?;
                    board[Square::from_rank_file(rank, file)] = Some(piece);
                    files += 1;
                }
                if files > 8 {
                    return Err(FenParseError::RankOverflow { rank: rank_str.to_string() });
                }
            }

            if files != 8 {
                return Err(FenParseError::RankUnderflow { rank: rank_str.to_string(), files });
            }
        }

        Ok(board)
    }

    fn parse_turn(s: &str) -> Result<Colour, FenParseError> {
        match s {
            "w" => Ok(Colour::White),
            "b" => Ok(Colour::Black),
            _ => Err(FenParseError::InvalidSide(s.to_string())),
        }
    }

    fn parse_castling(s: &str) -> Result<CastlingRights, FenParseError> {
        const ORDER: [(char, Colour, Wing); 4] = [
            ('K', Colour::White, Wing::King),
            ('Q', Colour::White, Wing::Queen),
            ('k', Colour::Black, Wing::King),
            ('q', Colour::Black, Wing::Queen),
        ];

        let mut rights = CastlingRights::NONE;
        if s == "-" {
            return Ok(rights);
        }

        // letters must appear in KQkq order, each at most once
        let mut next = 0;
        for c in s.chars() {
            let idx = ORDER[next..]
                .iter()
                .position(|&(letter, _, _)| letter == c)
                .ok_or_else(|| FenParseError::InvalidCastling(s.to_string()))?;
            let (_, side, wing) = ORDER[next + idx];
            rights.grant(side, wing);
            next += idx + 1;
        }

        Ok(rights)
    }

    fn parse_ep(s: &str) -> Result<Option<Square>, FenParseError> {
        if s == "-" {
            return Ok(None);
        }
        s.parse::<Square>().map(Some).map_err(|_| FenParseError::InvalidEnPassant(s.to_string()))
    }

    /// Decimal digits only, and no leading zero unless the value is zero.
    fn parse_counter(s: &str) -> Option<u32> {
        if !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0')) {
            return None;
        }
        s.parse().ok()
    }
}

impl Display for Fen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rank in Rank::all().rev() {
            let mut counter = 0;
            for file in File::all() {
                if let Some(piece) = self.board[Square::from_rank_file(rank, file)] {
                    if counter != 0 {
                        write!(f, "{counter}")?;
                    }
                    counter = 0;
                    write!(f, "{piece}")?;
                } else {
                    counter += 1;
                }
            }
            if counter != 0 {
                write!(f, "{counter}")?;
            }
            if rank != Rank::One {
                write!(f, "/")?;
            }
        }

        write!(f, " {} ", self.turn.fen_char())?;
        if self.castling.is_empty() {
            write!(f, "-")?;
        } else {
            for (_, ch) in [
                self.castling.kingside(Colour::White),
                self.castling.queenside(Colour::White),
                self.castling.kingside(Colour::Black),
                self.castling.queenside(Colour::Black),
            ]
            .into_iter()
            .zip("KQkq".chars())
            .filter(|(m, _)| m.is_some())
            {
                write!(f, "{ch}")?;
            }
        }
        write!(f, " {} {} {}", OptSquare(self.ep), self.halfmove, self.fullmove)
    }
}
