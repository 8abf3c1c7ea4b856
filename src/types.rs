use std::cmp::Ordering;
use std::fmt;

use crate::error::{ChessError, Result};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_is_white(is_white: bool) -> Color {
        if is_white {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn is_white(&self) -> bool {
        *self == Color::White
    }

    pub fn other_color(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

/// How a piece type moves, as far as the rule layer is concerned.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum MovementFamily {
    /// Scans outward along fixed directions until blocked.
    Sliding,
    /// Jumps to a fixed set of offsets.
    SingleStep,
    /// Moves depend on state (pawns).
    Special,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
    /// A fairy piece. It only moves if a generative rule for it is registered.
    Custom { symbol: char, family: MovementFamily },
}

impl PieceType {
    /// Board notation has no way to tell a custom piece from a standard one, so the six
    /// standard letters, digits and `/` are refused.
    pub fn custom(symbol: char, family: MovementFamily) -> Result<PieceType> {
        if PieceType::from_symbol(symbol).is_some() || symbol.is_ascii_digit() || symbol == '/' {
            return Err(ChessError::ReservedSymbol(symbol));
        }
        Ok(PieceType::Custom {
            symbol: symbol.to_ascii_lowercase(),
            family,
        })
    }

    /// Parses one of the six standard symbols, ignoring case.
    pub fn from_symbol(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceType::King),
            'q' => Some(PieceType::Queen),
            'r' => Some(PieceType::Rook),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            'p' => Some(PieceType::Pawn),
            _ => None,
        }
    }

    /// Lowercase display symbol.
    pub fn symbol(&self) -> char {
        match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
            Self::Custom { symbol, .. } => *symbol,
        }
    }

    pub fn family(&self) -> MovementFamily {
        match self {
            Self::Queen | Self::Rook | Self::Bishop => MovementFamily::Sliding,
            Self::King | Self::Knight => MovementFamily::SingleStep,
            Self::Pawn => MovementFamily::Special,
            Self::Custom { family, .. } => *family,
        }
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        self.family() == MovementFamily::Sliding
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::King => "king",
            Self::Queen => "queen",
            Self::Rook => "rook",
            Self::Bishop => "bishop",
            Self::Knight => "knight",
            Self::Pawn => "pawn",
            Self::Custom { .. } => "custom piece",
        }
    }
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ChessPiece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl ChessPiece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    pub fn white(piece_type: PieceType) -> Self {
        Self::new(piece_type, Color::White)
    }

    pub fn black(piece_type: PieceType) -> Self {
        Self::new(piece_type, Color::Black)
    }

    /// Standard pieces only: uppercase is white, lowercase is black.
    pub fn from_symbol(c: char) -> Option<ChessPiece> {
        PieceType::from_symbol(c).map(|piece_type| ChessPiece {
            piece_type,
            color: Color::from_case(c),
        })
    }

    pub fn is_white(&self) -> bool {
        self.color.is_white()
    }

    pub fn to_symbol(&self) -> char {
        let base = self.piece_type.symbol();
        if self.is_white() {
            base.to_ascii_uppercase()
        } else {
            base
        }
    }
}

/// A board coordinate. `x` is the column (file), `y` the row (rank), both from 0.
///
/// Squares carry no bounds of their own; `Bounds::contains` decides whether one is on the board.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Square {
    pub x: i32,
    pub y: i32,
}

impl Square {
    pub const fn new(x: i32, y: i32) -> Square {
        Square { x, y }
    }

    pub fn offset(&self, delta: Square) -> Square {
        Square {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    pub fn from_algebraic(s: &str) -> Result<Square> {
        let mut chars = s.chars();
        let file_char = chars
            .next()
            .filter(|c| c.is_ascii_lowercase())
            .ok_or_else(|| ChessError::InvalidSquare(s.to_string()))?;
        let rank: i32 = chars
            .as_str()
            .parse()
            .map_err(|_| ChessError::InvalidSquare(s.to_string()))?;
        if rank < 1 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }

        Ok(Square {
            x: file_char as i32 - 'a' as i32,
            y: rank - 1,
        })
    }

    pub fn to_algebraic(&self) -> String {
        self.to_string()
    }
}

// Row-major, matching the dense board's index order.
impl Ord for Square {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Square {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (0..26).contains(&self.x) && self.y >= 0 {
            write!(f, "{}{}", (b'a' + self.x as u8) as char, self.y + 1)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

/// Board shape: `rows` ranks of `columns` files.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Bounds {
    rows: usize,
    columns: usize,
}

impl Bounds {
    pub const STANDARD: Bounds = Bounds {
        rows: 8,
        columns: 8,
    };

    pub fn new(rows: usize, columns: usize) -> Result<Bounds> {
        if rows < 1 {
            return Err(ChessError::InvalidRows);
        }
        if columns < 1 {
            return Err(ChessError::InvalidColumns);
        }
        // every square must stay addressable as an i32 coordinate
        for dimension in [rows, columns] {
            if dimension > i32::MAX as usize {
                return Err(ChessError::BoundsTooLarge(dimension));
            }
        }
        Ok(Bounds { rows, columns })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn area(&self) -> usize {
        self.rows * self.columns
    }

    /// Accepts a `Square` or an `Option<Square>`; `None` is never on the board.
    pub fn contains<S: Into<Option<Square>>>(&self, square: S) -> bool {
        match square.into() {
            Some(sq) => {
                sq.x >= 0 && sq.y >= 0 && (sq.x as usize) < self.columns && (sq.y as usize) < self.rows
            }
            None => false,
        }
    }

    pub fn index_of(&self, square: Square) -> Result<usize> {
        if !self.contains(square) {
            return Err(ChessError::OutOfBounds(square));
        }
        Ok(square.x as usize + square.y as usize * self.columns)
    }

    pub fn square_at(&self, index: usize) -> Square {
        Square {
            x: (index % self.columns) as i32,
            y: (index / self.columns) as i32,
        }
    }

    /// Every square on the board, in index order.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let bounds = *self;
        (0..bounds.area()).map(move |index| bounds.square_at(index))
    }

    /// Index of the last row.
    pub fn last_row(&self) -> i32 {
        self.rows as i32 - 1
    }

    /// Index of the last column.
    pub fn last_column(&self) -> i32 {
        self.columns as i32 - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(8, 8).unwrap();
        assert!(bounds.contains(Square::new(3, 3)));
        assert!(bounds.contains(Square::new(7, 7)));
        assert!(bounds.contains(Square::new(0, 0)));
        assert!(!bounds.contains(Square::new(8, 8)));
        assert!(!bounds.contains(Square::new(8, 7)));
        assert!(!bounds.contains(Square::new(-1, 0)));
    }

    #[test]
    fn test_bounds_does_not_contain_absent_square() {
        let bounds = Bounds::new(8, 8).unwrap();
        assert!(!bounds.contains(None::<Square>));
    }

    #[test]
    fn test_bounds_rejects_empty_dimensions() {
        assert_eq!(Bounds::new(0, 8), Err(ChessError::InvalidRows));
        assert_eq!(Bounds::new(8, 0), Err(ChessError::InvalidColumns));
        assert_eq!(
            Bounds::new(8, 0).unwrap_err().to_string(),
            "columns must be at least 1"
        );
        assert_eq!(
            Bounds::new(0, 8).unwrap_err().to_string(),
            "rows must be at least 1"
        );
    }

    #[test]
    fn test_bounds_rejects_dimensions_past_i32() {
        let too_many = i32::MAX as usize + 1;
        assert_eq!(Bounds::new(too_many, 8), Err(ChessError::BoundsTooLarge(too_many)));
        assert_eq!(Bounds::new(8, 1 << 32), Err(ChessError::BoundsTooLarge(1 << 32)));
        let widest = Bounds::new(1, i32::MAX as usize).unwrap();
        assert_eq!(widest.last_column(), i32::MAX - 1);
        assert_eq!(widest.last_row(), 0);
    }

    #[test]
    fn test_bounds_non_square() {
        let bounds = Bounds::new(3, 5).unwrap();
        assert_eq!(bounds.area(), 15);
        assert!(bounds.contains(Square::new(4, 2)));
        assert!(!bounds.contains(Square::new(2, 4)));
        assert_eq!(bounds.index_of(Square::new(4, 2)).unwrap(), 14);
        assert_eq!(bounds.square_at(14), Square::new(4, 2));
        let squares: Vec<Square> = bounds.squares().collect();
        assert_eq!(squares.len(), 15);
        assert_eq!(squares[5], Square::new(0, 1));
        assert!(squares.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(
            bounds.index_of(Square::new(5, 0)),
            Err(ChessError::OutOfBounds(Square::new(5, 0)))
        );
    }

    #[test]
    fn test_square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1").unwrap(), Square::new(0, 0));
        assert_eq!(Square::from_algebraic("e4").unwrap(), Square::new(4, 3));
        assert_eq!(Square::from_algebraic("h8").unwrap(), Square::new(7, 7));
        assert_eq!(Square::from_algebraic("c12").unwrap(), Square::new(2, 11));
        assert!(Square::from_algebraic("e").is_err());
        assert!(Square::from_algebraic("E4").is_err());
        assert!(Square::from_algebraic("e0").is_err());
    }

    #[test]
    fn test_square_display() {
        assert_eq!(Square::new(4, 0).to_string(), "e1");
        assert_eq!(Square::new(-1, 2).to_string(), "(-1, 2)");
    }

    #[test]
    fn test_square_offset() {
        let e1 = Square::new(4, 0);
        assert_eq!(e1.offset(Square::new(1, 1)), Square::new(5, 1));
        assert_eq!(e1.offset(Square::new(-5, -1)), Square::new(-1, -1));
    }

    #[test]
    fn test_square_order_is_row_major() {
        let mut squares = vec![Square::new(0, 1), Square::new(7, 0), Square::new(1, 1)];
        squares.sort();
        assert_eq!(
            squares,
            vec![Square::new(7, 0), Square::new(0, 1), Square::new(1, 1)]
        );
    }

    #[test]
    fn test_piece_symbols() {
        assert_eq!(ChessPiece::white(PieceType::Knight).to_symbol(), 'N');
        assert_eq!(ChessPiece::black(PieceType::Queen).to_symbol(), 'q');
        assert_eq!(
            ChessPiece::from_symbol('k'),
            Some(ChessPiece::black(PieceType::King))
        );
        assert_eq!(
            ChessPiece::from_symbol('R'),
            Some(ChessPiece::white(PieceType::Rook))
        );
        assert_eq!(ChessPiece::from_symbol('x'), None);
    }

    #[test]
    fn test_custom_piece_type() {
        let camel = PieceType::custom('C', MovementFamily::SingleStep).unwrap();
        assert_eq!(camel.symbol(), 'c');
        assert_eq!(camel.family(), MovementFamily::SingleStep);
        assert!(!camel.is_sliding());
        assert_eq!(ChessPiece::white(camel).to_symbol(), 'C');
    }

    #[test]
    fn test_custom_symbol_cannot_shadow_notation() {
        for symbol in ['k', 'K', 'q', 'n', 'P', '3', '/'] {
            assert_eq!(
                PieceType::custom(symbol, MovementFamily::Sliding),
                Err(ChessError::ReservedSymbol(symbol))
            );
        }
        assert!(PieceType::custom('w', MovementFamily::SingleStep).is_ok());
    }

    #[test]
    fn test_is_sliding() {
        assert!(PieceType::Rook.is_sliding());
        assert!(PieceType::Bishop.is_sliding());
        assert!(PieceType::Queen.is_sliding());
        assert!(!PieceType::Knight.is_sliding());
        assert!(!PieceType::King.is_sliding());
        assert!(!PieceType::Pawn.is_sliding());
    }

    #[test]
    fn test_other_color() {
        assert_eq!(Color::White, Color::Black.other_color());
        assert_eq!(Color::Black, Color::White.other_color());
        assert_eq!(Color::from_is_white(true), Color::White);
        assert!(!Color::Black.is_white());
    }
}
