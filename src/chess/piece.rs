use std::{
    fmt::{Debug, Display},
    mem::size_of,
    ops::{Index, IndexMut, Not},
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Colour {
    White,
    Black,
}

const _COLOUR_ASSERT: () = assert!(size_of::<Colour>() == size_of::<Option<Colour>>());

impl Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::White => write!(f, "White"),
            Self::Black => write!(f, "Black"),
        }
    }
}

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

const _PIECE_TYPE_ASSERT: () = assert!(size_of::<PieceType>() == size_of::<Option<PieceType>>());

impl Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pawn => write!(f, "Pawn"),
            Self::Knight => write!(f, "Knight"),
            Self::Bishop => write!(f, "Bishop"),
            Self::Rook => write!(f, "Rook"),
            Self::Queen => write!(f, "Queen"),
            Self::King => write!(f, "King"),
        }
    }
}

/// A coloured piece. The low bit is the colour, the remaining bits the type.
/// Empty squares are represented as `None` wherever a `Piece` is optional.
#[rustfmt::skip]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Piece {
    WP, BP,
    WN, BN,
    WB, BB,
    WR, BR,
    WQ, BQ,
    WK, BK,
}

const _PIECE_ASSERT: () = assert!(size_of::<Piece>() == size_of::<Option<Piece>>());

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl Colour {
    pub const fn new(v: bool) -> Self {
        if v { Self::Black } else { Self::White }
    }

    pub const fn flip(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction of pawn advance, in ranks.
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    pub const fn fen_char(self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        [Self::White, Self::Black].into_iter()
    }
}

impl Not for Colour {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.flip()
    }
}

impl PieceType {
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    pub const fn new(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Pawn),
            1 => Some(Self::Knight),
            2 => Some(Self::Bishop),
            3 => Some(Self::Rook),
            4 => Some(Self::Queen),
            5 => Some(Self::King),
            _ => None,
        }
    }

    pub const fn legal_promo(self) -> bool {
        matches!(self, Self::Queen | Self::Knight | Self::Bishop | Self::Rook)
    }

    pub const fn promo_char(self) -> Option<char> {
        match self {
            Self::Queen => Some('q'),
            Self::Knight => Some('n'),
            Self::Bishop => Some('b'),
            Self::Rook => Some('r'),
            _ => None,
        }
    }

    /// The upper-case letter used for this piece in SAN, if it has one.
    pub const fn san_char(self) -> Option<char> {
        match self {
            Self::Pawn => None,
            Self::Knight => Some('N'),
            Self::Bishop => Some('B'),
            Self::Rook => Some('R'),
            Self::Queen => Some('Q'),
            Self::King => Some('K'),
        }
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        [Self::Pawn, Self::Knight, Self::Bishop, Self::Rook, Self::Queen, Self::King].into_iter()
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_symbol(c: u8) -> Option<Self> {
        const SYMBOLS: [u8; 6] = *b"PNBRQK";
        SYMBOLS
            .iter()
            .position(|&x| x == c.to_ascii_uppercase())
            .and_then(|x| Self::new(x.try_into().ok()?))
    }
}

impl Piece {
    pub const fn new(colour: Colour, piece_type: PieceType) -> Self {
        match (colour, piece_type) {
            (Colour::White, PieceType::Pawn) => Self::WP,
            (Colour::White, PieceType::Knight) => Self::WN,
            (Colour::White, PieceType::Bishop) => Self::WB,
            (Colour::White, PieceType::Rook) => Self::WR,
            (Colour::White, PieceType::Queen) => Self::WQ,
            (Colour::White, PieceType::King) => Self::WK,
            (Colour::Black, PieceType::Pawn) => Self::BP,
            (Colour::Black, PieceType::Knight) => Self::BN,
            (Colour::Black, PieceType::Bishop) => Self::BB,
            (Colour::Black, PieceType::Rook) => Self::BR,
            (Colour::Black, PieceType::Queen) => Self::BQ,
            (Colour::Black, PieceType::King) => Self::BK,
        }
    }

    pub const fn colour(self) -> Colour {
        if (self as u8) & 1 == 0 {
            Colour::White
        } else {
            Colour::Black
        }
    }

    pub const fn piece_type(self) -> PieceType {
        match self {
            Self::WP | Self::BP => PieceType::Pawn,
            Self::WN | Self::BN => PieceType::Knight,
            Self::WB | Self::BB => PieceType::Bishop,
            Self::WR | Self::BR => PieceType::Rook,
            Self::WQ | Self::BQ => PieceType::Queen,
            Self::WK | Self::BK => PieceType::King,
        }
    }

    pub const fn char(self) -> char {
        match self {
            Self::WP => 'P',
            Self::WN => 'N',
            Self::WB => 'B',
            Self::WR => 'R',
            Self::WQ => 'Q',
            Self::WK => 'K',
            Self::BP => 'p',
            Self::BN => 'n',
            Self::BB => 'b',
            Self::BR => 'r',
            Self::BQ => 'q',
            Self::BK => 'k',
        }
    }

    /// Maps a FEN letter to a piece. Anything outside `PNBRQKpnbrqk` is `None`,
    /// and it is up to the caller to report that as an error.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'P' => Some(Self::WP),
            'N' => Some(Self::WN),
            'B' => Some(Self::WB),
            'R' => Some(Self::WR),
            'Q' => Some(Self::WQ),
            'K' => Some(Self::WK),
            'p' => Some(Self::BP),
            'n' => Some(Self::BN),
            'b' => Some(Self::BB),
            'r' => Some(Self::BR),
            'q' => Some(Self::BQ),
            'k' => Some(Self::BK),
            _ => None,
        }
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        Colour::all().flat_map(|c| PieceType::all().map(move |pt| Self::new(c, pt)))
    }

    pub const fn inner(self) -> u8 {
        self as u8
    }
}

impl<T> Index<Colour> for [T; 2] {
    type Output = T;

    fn index(&self, index: Colour) -> &Self::Output {
        &self[index as usize]
    }
}

impl<T> IndexMut<Colour> for [T; 2] {
    fn index_mut(&mut self, index: Colour) -> &mut Self::Output {
        &mut self[index as usize]
    }
}

impl<T> Index<PieceType> for [T; 6] {
    type Output = T;

    fn index(&self, index: PieceType) -> &Self::Output {
        &self[index as usize]
    }
}

impl<T> IndexMut<PieceType> for [T; 6] {
    fn index_mut(&mut self, index: PieceType) -> &mut Self::Output {
        &mut self[index as usize]
    }
}
