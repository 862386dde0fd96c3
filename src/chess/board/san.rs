use std::fmt::Display;

use crate::{
    chess::{
        board::Board,
        chessmove::Move,
        piece::PieceType,
        types::{CheckState, File, Rank, Square},
    },
    errors::MoveParseError,
};

#[derive(Clone, Copy)]
pub struct SanThunk<'a> {
    board: &'a Board,
    m: Move,
}

impl Display for SanThunk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { board, m } = *self;
        let check_char = match board.gives(m) {
            CheckState::None => "",
            CheckState::Check => "+",
            CheckState::Checkmate => "#",
        };
        if board.is_castle(m) {
            let castle = if m.to().file() > m.from().file() { "O-O" } else { "O-O-O" };
            return write!(f, "{castle}{check_char}");
        }

        let Some(moved_piece) = board.piece_at(m.from()) else {
            return Err(std::fmt::Error);
        };
        let piece_type = moved_piece.piece_type();
        let is_capture = board.is_capture(m);

        if let Some(letter) = piece_type.san_char() {
            write!(f, "{letter}")?;
            // other pieces of the same kind that could also legally land here
            let rivals = board
                .legal_moves()
                .iter()
                .filter(|r| r.to() == m.to() && r.from() != m.from())
                .filter(|r| board.piece_at(r.from()) == Some(moved_piece))
                .filter(|r| !board.is_castle(**r))
                .map(|r| r.from())
                .collect::<Vec<_>>();
            if !rivals.is_empty() {
                let file_unique = rivals.iter().all(|sq| sq.file() != m.from().file());
                let rank_unique = rivals.iter().all(|sq| sq.rank() != m.from().rank());
                if file_unique {
                    write!(f, "{}", m.from().file().char())?;
                } else if rank_unique {
                    write!(f, "{}", m.from().rank().char())?;
                } else {
                    write!(f, "{}", m.from())?;
                }
            }
        } else if is_capture {
            write!(f, "{}", m.from().file().char())?;
        }

        let capture_sigil = if is_capture { "x" } else { "" };
        write!(f, "{capture_sigil}{}", m.to())?;
        if let Some(promo) = m.promotion().and_then(PieceType::san_char) {
            write!(f, "={promo}")?;
        }
        write!(f, "{check_char}")
    }
}

impl Board {
    /// Renders a legal move in Standard Algebraic Notation. Returns `None`
    /// for moves that are not legal in this position.
    pub fn san(&self, m: Move) -> Option<SanThunk<'_>> {
        if !self.legal_moves().contains(&m) {
            return None;
        }

        Some(SanThunk { board: self, m })
    }

    /// The square a castling king lands on.
    fn castle_destination(m: Move) -> Square {
        let file = if m.to().file() > m.from().file() { File::G } else { File::C };
        file.with(m.from().rank())
    }

    /// Renders a move in coordinate notation. Castling is written as the
    /// king's two-square step (`e1g1`), not as the internal king-takes-rook.
    pub fn uci(&self, m: Move) -> String {
        if self.is_castle(m) {
            format!("{}{}", m.from(), Self::castle_destination(m))
        } else {
            m.to_string()
        }
    }

    /// Resolves move text against the legal moves of this position.
    ///
    /// Coordinate notation is tried first (`e2e4`, `e7e8q`, castling as either
    /// `e1g1` or `e1h1`), then SAN. SAN parsing is lenient: capture markers,
    /// check and mate suffixes, `=` before a promotion piece, and `0-0` style
    /// castling are all optional or accepted.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let text = text.trim();
        if let Some(m) = self.parse_uci(text) {
            return Ok(m);
        }
        self.parse_san(text).inspect_err(|e| tracing::debug!(text, error = %e, "unparseable move"))
    }

    fn parse_uci(&self, text: &str) -> Option<Move> {
        if !matches!(text.len(), 4 | 5) || !text.is_ascii() {
            return None;
        }
        let from = text[0..2].parse::<Square>().ok()?;
        let to = text[2..4].parse::<Square>().ok()?;
        let promotion = match text.as_bytes().get(4) {
            None => None,
            Some(&c) => Some(PieceType::from_symbol(c).filter(|pt| pt.legal_promo())?),
        };

        self.legal_moves().iter().copied().find(|&m| {
            m.from() == from
                && m.promotion() == promotion
                && (m.to() == to || (self.is_castle(m) && Self::castle_destination(m) == to))
        })
    }

    pub fn parse_san(&self, san: &str) -> Result<Move, MoveParseError> {
        let no_such_move = || MoveParseError::NoSuchMove(san.to_string());

        let trim = san.trim_end_matches(['+', '#']);
        match trim {
            "O-O" | "0-0" => return self.find_castling_move(true).ok_or_else(no_such_move),
            "O-O-O" | "0-0-0" => return self.find_castling_move(false).ok_or_else(no_such_move),
            _ => (),
        }

        let bytes = trim.as_bytes();
        let Some(&first) = bytes.first() else {
            return Err(no_such_move());
        };

        let piece_type = match first {
            b'N' | b'B' | b'R' | b'Q' | b'K' => PieceType::from_symbol(first).ok_or_else(no_such_move)?,
            _ => PieceType::Pawn,
        };
        let start = usize::from(piece_type != PieceType::Pawn);

        // optional promotion suffix, with or without '='
        let mut end = bytes.len();
        let mut promotion = None;
        if end >= 2 && let Some(pt) = PieceType::from_symbol(bytes[end - 1]).filter(|pt| pt.legal_promo()) {
            if bytes[end - 2] == b'=' {
                promotion = Some(pt);
                end -= 2;
            } else if matches!(bytes[end - 2], b'1' | b'8') {
                promotion = Some(pt);
                end -= 1;
            }
        }

        if end < start + 2 {
            return Err(no_such_move());
        }
        let to = std::str::from_utf8(&bytes[end - 2..end])
            .ok()
            .and_then(|s| s.parse::<Square>().ok())
            .ok_or_else(no_such_move)?;

        let mut from_file = None;
        let mut from_rank = None;
        for &ch in &bytes[start..end - 2] {
            match ch {
                b'a'..=b'h' => from_file = File::from_index(ch - b'a'),
                b'1'..=b'8' => from_rank = Rank::from_index(ch - b'1'),
                b'x' | b':' | b'-' => (),
                _ => return Err(no_such_move()),
            }
        }

        // a pawn push stays on its file
        if piece_type == PieceType::Pawn && from_file.is_none() {
            from_file = Some(to.file());
        }

        let legal = self.legal_moves();
        let mut candidates = legal.iter().copied().filter(|&m| {
            m.to() == to
                && !self.is_castle(m)
                && m.promotion() == promotion
                && self.piece_at(m.from()).is_some_and(|p| p.piece_type() == piece_type)
                && from_file.is_none_or(|file| m.from().file() == file)
                && from_rank.is_none_or(|rank| m.from().rank() == rank)
        });

        let m = candidates.next().ok_or_else(no_such_move)?;
        if candidates.next().is_some() {
            return Err(MoveParseError::Ambiguous(san.to_string()));
        }
        Ok(m)
    }

    fn find_castling_move(&self, kingside: bool) -> Option<Move> {
        self.legal_moves()
            .iter()
            .copied()
            .find(|&m| self.is_castle(m) && (m.to().file() > m.from().file()) == kingside)
    }
}
