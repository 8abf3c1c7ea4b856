use crate::board::ChessBoard;
use crate::error::{ChessError, Result};
use crate::types::{Bounds, ChessPiece, Square};

/// Array-backed board: one slot per square, indexed `x + y * columns`.
///
/// Cheap `piece_at`, linear `piece_position`. The slot count always equals `bounds.area()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseBoard {
    squares: Vec<Option<ChessPiece>>,
    bounds: Bounds,
}

impl DenseBoard {
    pub fn new(squares: Vec<Option<ChessPiece>>, bounds: Bounds) -> Result<Self> {
        let expected = bounds.area();
        if squares.len() != expected {
            return Err(ChessError::BoardSizeMismatch {
                expected,
                actual: squares.len(),
            });
        }
        Ok(Self { squares, bounds })
    }

    fn with_squares(&self, squares: Vec<Option<ChessPiece>>) -> Self {
        debug_assert_eq!(squares.len(), self.bounds.area());
        Self {
            squares,
            bounds: self.bounds,
        }
    }
}

impl ChessBoard for DenseBoard {
    fn empty(bounds: Bounds) -> Self {
        Self {
            squares: vec![None; bounds.area()],
            bounds,
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn piece_at(&self, square: Square) -> Result<Option<ChessPiece>> {
        Ok(self.squares[self.bounds.index_of(square)?])
    }

    fn piece_position(&self, piece: &ChessPiece) -> Option<Square> {
        self.squares
            .iter()
            .position(|slot| slot.as_ref() == Some(piece))
            .map(|index| self.bounds.square_at(index))
    }

    fn placements(&self) -> Vec<(Square, ChessPiece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|piece| (self.bounds.square_at(index), piece)))
            .collect()
    }

    fn with_piece_at(&self, piece: ChessPiece, square: Square) -> Result<Self> {
        let index = self.bounds.index_of(square)?;
        let mut squares = self.squares.clone();
        squares[index] = Some(piece);
        Ok(self.with_squares(squares))
    }

    fn without_piece_at(&self, square: Square) -> Result<Self> {
        let index = self.bounds.index_of(square)?;
        let mut squares = self.squares.clone();
        squares[index] = None;
        Ok(self.with_squares(squares))
    }

    fn with_piece_moved(&self, from: Square, to: Square) -> Result<Self> {
        let from_index = self.bounds.index_of(from)?;
        let to_index = self.bounds.index_of(to)?;
        let mut squares = self.squares.clone();
        let piece = squares[from_index].take();
        squares[to_index] = piece;
        Ok(self.with_squares(squares))
    }

    fn with_all_pieces<I>(&self, pieces: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Square, ChessPiece)>,
    {
        let mut squares = vec![None; self.bounds.area()];
        for (square, piece) in pieces {
            squares[self.bounds.index_of(square)?] = Some(piece);
        }
        Ok(self.with_squares(squares))
    }

    fn without_pieces(&self) -> Self {
        Self::empty(self.bounds)
    }

    fn with_bounds(&self, bounds: Bounds) -> Self {
        let mut squares = vec![None; bounds.area()];
        let rows = self.bounds.rows().min(bounds.rows());
        let columns = self.bounds.columns().min(bounds.columns());
        for y in 0..rows {
            for x in 0..columns {
                squares[x + y * bounds.columns()] = self.squares[x + y * self.bounds.columns()];
            }
        }
        Self { squares, bounds }
    }
}
