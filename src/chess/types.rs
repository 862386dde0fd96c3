use std::{
    fmt::{self, Display},
    mem::size_of,
    ops::{Index, IndexMut},
    str::FromStr,
};

use crate::chess::piece::Colour;

#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

const _FILE_ASSERT: () = assert!(size_of::<File>() == size_of::<Option<File>>());

impl File {
    const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    pub const fn abs_diff(self, other: Self) -> u8 {
        (self as u8).abs_diff(other as u8)
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 { Some(Self::ALL[index as usize]) } else { None }
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub const fn with(self, rank: Rank) -> Square {
        Square::from_rank_file(rank, self)
    }

    pub const fn char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl<T> Index<File> for [T; 8] {
    type Output = T;

    fn index(&self, index: File) -> &Self::Output {
        &self[index as usize]
    }
}

impl<T> IndexMut<File> for [T; 8] {
    fn index_mut(&mut self, index: File) -> &mut Self::Output {
        &mut self[index as usize]
    }
}

#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

const _RANK_ASSERT: () = assert!(size_of::<Rank>() == size_of::<Option<Rank>>());

impl Rank {
    const ALL: [Self; 8] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    pub const fn abs_diff(self, other: Self) -> u8 {
        (self as u8).abs_diff(other as u8)
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 { Some(Self::ALL[index as usize]) } else { None }
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub const fn with(self, file: File) -> Square {
        Square::from_rank_file(self, file)
    }

    /// The rank as seen from `side`'s end of the board.
    pub const fn relative_to(self, side: Colour) -> Self {
        match side {
            Colour::White => self,
            Colour::Black => Self::ALL[7 - self as usize],
        }
    }

    pub const fn char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl<T> Index<Rank> for [T; 8] {
    type Output = T;

    fn index(&self, index: Rank) -> &Self::Output {
        &self[index as usize]
    }
}

impl<T> IndexMut<Rank> for [T; 8] {
    fn index_mut(&mut self, index: Rank) -> &mut Self::Output {
        &mut self[index as usize]
    }
}

#[rustfmt::skip]
#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(u8)]
pub enum Square {
    #[default]
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

const _SQUARE_ASSERT: () = assert!(size_of::<Square>() == size_of::<Option<Square>>());

impl<T> Index<Square> for [T; 64] {
    type Output = T;

    fn index(&self, index: Square) -> &Self::Output {
        &self[index as usize]
    }
}

impl<T> IndexMut<Square> for [T; 64] {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index as usize]
    }
}

static SQUARE_NAMES: [&str; 64] = [
    "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1", "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2",
    "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3", "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4",
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5", "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6",
    "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7", "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8",
];

#[rustfmt::skip]
const ALL_SQUARES: [Square; 64] = {
    use Square::*;
    [
        A1, B1, C1, D1, E1, F1, G1, H1,
        A2, B2, C2, D2, E2, F2, G2, H2,
        A3, B3, C3, D3, E3, F3, G3, H3,
        A4, B4, C4, D4, E4, F4, G4, H4,
        A5, B5, C5, D5, E5, F5, G5, H5,
        A6, B6, C6, D6, E6, F6, G6, H6,
        A7, B7, C7, D7, E7, F7, G7, H7,
        A8, B8, C8, D8, E8, F8, G8, H8,
    ]
};

impl Square {
    pub const fn from_rank_file(rank: Rank, file: File) -> Self {
        ALL_SQUARES[rank as usize * 8 + file as usize]
    }

    pub const fn new(inner: u8) -> Option<Self> {
        if inner < 64 { Some(ALL_SQUARES[inner as usize]) } else { None }
    }

    /// Builds a square from signed coordinates, or `None` if either falls off the board.
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        #![allow(clippy::cast_sign_loss)]
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            return None;
        }
        Some(ALL_SQUARES[(rank * 8 + file) as usize])
    }

    /// The square `df` files and `dr` ranks away, if it is on the board.
    pub const fn offset(self, df: i8, dr: i8) -> Option<Self> {
        #![allow(clippy::cast_possible_wrap)]
        Self::from_coords(self.file() as i8 + df, self.rank() as i8 + dr)
    }

    pub const fn flip_rank(self) -> Self {
        ALL_SQUARES[self as usize ^ 0b111_000]
    }

    pub const fn relative_to(self, side: Colour) -> Self {
        if matches!(side, Colour::White) { self } else { self.flip_rank() }
    }

    /// The file that this square is on.
    pub const fn file(self) -> File {
        File::ALL[self as usize % 8]
    }

    /// The rank that this square is on.
    pub const fn rank(self) -> Rank {
        Rank::ALL[self as usize / 8]
    }

    /// The rank of this square from `side`'s point of view.
    pub const fn relative_rank(self, side: Colour) -> Rank {
        self.rank().relative_to(side)
    }

    pub const fn inner(self) -> u8 {
        self as u8
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        ALL_SQUARES.into_iter()
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SQUARE_NAMES[*self])
    }
}

impl FromStr for Square {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SQUARE_NAMES
            .iter()
            .position(|&name| name == s)
            .and_then(|index| -> Option<u8> { index.try_into().ok() })
            .and_then(Self::new)
            .ok_or("Invalid square name")
    }
}

/// Renders an optional square the way FEN does, with `-` for "none".
pub struct OptSquare(pub Option<Square>);

impl Display for OptSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(sq) => write!(f, "{sq}"),
            None => write!(f, "-"),
        }
    }
}

/// A piece together with the square it stands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GamePiece {
    pub piece: crate::chess::piece::Piece,
    pub square: Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wing {
    King,
    Queen,
}

impl Wing {
    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        [Self::King, Self::Queen].into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckState {
    None,
    Check,
    Checkmate,
}

/// Castling rights, stored as the origin square of each castling rook.
///
/// A right is held while its entry is the canonical rook home square and is
/// lost for good once cleared; nothing ever sets an entry back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    // [ white-kingside, white-queenside, black-kingside, black-queenside ]
    rooks: [Option<Square>; 4],
}

impl CastlingRights {
    pub const NONE: Self = Self { rooks: [None; 4] };
    pub const ALL: Self = Self {
        rooks: [Some(Square::H1), Some(Square::A1), Some(Square::H8), Some(Square::A8)],
    };

    const fn slot(side: Colour, wing: Wing) -> usize {
        side as usize * 2
            + match wing {
                Wing::King => 0,
                Wing::Queen => 1,
            }
    }

    /// The home square of the rook that castles on `wing` for `side`.
    pub const fn home(side: Colour, wing: Wing) -> Square {
        match (side, wing) {
            (Colour::White, Wing::King) => Square::H1,
            (Colour::White, Wing::Queen) => Square::A1,
            (Colour::Black, Wing::King) => Square::H8,
            (Colour::Black, Wing::Queen) => Square::A8,
        }
    }

    pub const fn rook(self, side: Colour, wing: Wing) -> Option<Square> {
        self.rooks[Self::slot(side, wing)]
    }

    pub const fn kingside(self, side: Colour) -> Option<Square> {
        self.rook(side, Wing::King)
    }

    pub const fn queenside(self, side: Colour) -> Option<Square> {
        self.rook(side, Wing::Queen)
    }

    pub fn grant(&mut self, side: Colour, wing: Wing) {
        self.rooks[Self::slot(side, wing)] = Some(Self::home(side, wing));
    }

    pub fn clear(&mut self, side: Colour) {
        self.rooks[Self::slot(side, Wing::King)] = None;
        self.rooks[Self::slot(side, Wing::Queen)] = None;
    }

    /// Drops any right whose rook starts on `sq`.
    pub fn remove(&mut self, sq: Square) {
        for slot in &mut self.rooks {
            if *slot == Some(sq) {
                *slot = None;
            }
        }
    }

    pub fn is_empty(self) -> bool {
        self.rooks.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_coordinates() {
        assert_eq!(Square::from_coords(0, 0), Some(Square::A1));
        assert_eq!(Square::from_coords(1, 1), Some(Square::B2));
        assert_eq!(Square::from_coords(4, 4), Some(Square::E5));
        assert_eq!(Square::from_coords(7, 7), Some(Square::H8));
        assert_eq!(Square::from_coords(-1, 0), None);
        assert_eq!(Square::from_coords(0, 8), None);
        assert_eq!(Square::from_coords(8, 3), None);
        assert_eq!(Square::A2.inner(), 8);
        assert_eq!(Square::B8.inner(), 57);
        assert_eq!(Square::C3.file(), File::C);
        assert_eq!(Square::C3.rank(), Rank::Three);
    }

    #[test]
    fn square_offsets_do_not_wrap() {
        assert_eq!(Square::H4.offset(1, 0), None);
        assert_eq!(Square::A4.offset(-1, 1), None);
        assert_eq!(Square::G1.offset(-1, 2), Some(Square::F3));
        assert_eq!(Square::E8.offset(0, 1), None);
    }

    #[test]
    fn square_relative_rank() {
        assert_eq!(Square::A1.relative_rank(Colour::White), Rank::One);
        assert_eq!(Square::A1.relative_rank(Colour::Black), Rank::Eight);
        assert_eq!(Square::D4.relative_rank(Colour::Black), Rank::Five);
        assert_eq!(Square::G7.relative_rank(Colour::Black), Rank::Two);
        assert_eq!(Square::A1.relative_to(Colour::Black), Square::A8);
    }

    #[test]
    fn square_names() {
        assert_eq!(Square::A1.to_string(), "a1");
        assert_eq!(Square::H8.to_string(), "h8");
        assert_eq!("e5".parse::<Square>(), Ok(Square::E5));
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert_eq!(OptSquare(None).to_string(), "-");
        assert_eq!(OptSquare(Some(Square::C6)).to_string(), "c6");
    }

    #[test]
    fn castling_rights_are_rook_squares() {
        let mut rights = CastlingRights::NONE;
        assert!(rights.is_empty());
        rights.grant(Colour::White, Wing::King);
        rights.grant(Colour::Black, Wing::Queen);
        assert_eq!(rights.kingside(Colour::White), Some(Square::H1));
        assert_eq!(rights.queenside(Colour::White), None);
        assert_eq!(rights.queenside(Colour::Black), Some(Square::A8));
        assert_eq!(rights.rook(Colour::Black, Wing::Queen), Some(Square::A8));
        assert_eq!(rights.rook(Colour::White, Wing::Queen), None);
    }

    #[test]
    fn castling_rights_removal() {
        let mut rights = CastlingRights::ALL;
        rights.remove(Square::H1);
        assert_eq!(rights.kingside(Colour::White), None);
        assert_eq!(rights.queenside(Colour::White), Some(Square::A1));
        rights.remove(Square::E4);
        assert_eq!(rights.queenside(Colour::White), Some(Square::A1));
        rights.clear(Colour::Black);
        assert_eq!(rights.kingside(Colour::Black), None);
        assert_eq!(rights.queenside(Colour::Black), None);
        assert_eq!(rights.queenside(Colour::White), Some(Square::A1));
    }
}
