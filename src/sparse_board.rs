use std::collections::{BTreeMap, BTreeSet, HashMap};

use itertools::Itertools;

use crate::board::{encode_rank, ChessBoard};
use crate::error::{ChessError, Result};
use crate::types::{Bounds, ChessPiece, Square};

/// Map-backed board for large or mostly empty variants.
///
/// `squares` and `positions` describe the same placements from both sides: every entry in one
/// has its mirror in the other. Equal pieces share one `positions` entry holding all their
/// squares, kept in row-major order so the first match agrees with `DenseBoard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseBoard {
    squares: BTreeMap<Square, ChessPiece>,
    positions: HashMap<ChessPiece, BTreeSet<Square>>,
    bounds: Bounds,
}

impl SparseBoard {
    pub fn new(squares: BTreeMap<Square, ChessPiece>, bounds: Bounds) -> Result<Self> {
        if let Some(square) = squares.keys().find(|square| !bounds.contains(**square)) {
            return Err(ChessError::OutOfBounds(*square));
        }
        Ok(Self::from_checked(squares, bounds))
    }

    fn from_checked(squares: BTreeMap<Square, ChessPiece>, bounds: Bounds) -> Self {
        let mut positions: HashMap<ChessPiece, BTreeSet<Square>> = HashMap::new();
        for (square, piece) in &squares {
            positions.entry(*piece).or_default().insert(*square);
        }
        Self {
            squares,
            positions,
            bounds,
        }
    }

    fn check(&self, square: Square) -> Result<()> {
        if self.bounds.contains(square) {
            Ok(())
        } else {
            Err(ChessError::OutOfBounds(square))
        }
    }

    fn place(&mut self, piece: ChessPiece, square: Square) {
        self.remove(square);
        self.squares.insert(square, piece);
        self.positions.entry(piece).or_default().insert(square);
    }

    fn remove(&mut self, square: Square) -> Option<ChessPiece> {
        let piece = self.squares.remove(&square)?;
        if let Some(set) = self.positions.get_mut(&piece) {
            set.remove(&square);
            if set.is_empty() {
                self.positions.remove(&piece);
            }
        }
        Some(piece)
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let forward = self
            .squares
            .iter()
            .all(|(square, piece)| self.positions.get(piece).is_some_and(|set| set.contains(square)));
        let backward = self.positions.iter().all(|(piece, set)| {
            !set.is_empty() && set.iter().all(|square| self.squares.get(square) == Some(piece))
        });
        forward && backward
    }
}

impl ChessBoard for SparseBoard {
    fn empty(bounds: Bounds) -> Self {
        Self {
            squares: BTreeMap::new(),
            positions: HashMap::new(),
            bounds,
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn piece_at(&self, square: Square) -> Result<Option<ChessPiece>> {
        self.check(square)?;
        Ok(self.squares.get(&square).copied())
    }

    fn piece_position(&self, piece: &ChessPiece) -> Option<Square> {
        self.positions
            .get(piece)
            .and_then(|set| set.iter().next().copied())
    }

    fn placements(&self) -> Vec<(Square, ChessPiece)> {
        self.squares
            .iter()
            .map(|(square, piece)| (*square, *piece))
            .collect()
    }

    fn with_piece_at(&self, piece: ChessPiece, square: Square) -> Result<Self> {
        self.check(square)?;
        let mut board = self.clone();
        board.place(piece, square);
        Ok(board)
    }

    fn without_piece_at(&self, square: Square) -> Result<Self> {
        self.check(square)?;
        let mut board = self.clone();
        board.remove(square);
        Ok(board)
    }

    fn with_piece_moved(&self, from: Square, to: Square) -> Result<Self> {
        self.check(from)?;
        self.check(to)?;
        let mut board = self.clone();
        match board.remove(from) {
            Some(piece) => board.place(piece, to),
            None => {
                board.remove(to);
            }
        }
        Ok(board)
    }

    fn with_all_pieces<I>(&self, pieces: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Square, ChessPiece)>,
    {
        Self::new(pieces.into_iter().collect(), self.bounds)
    }

    fn without_pieces(&self) -> Self {
        Self::empty(self.bounds)
    }

    fn with_bounds(&self, bounds: Bounds) -> Self {
        let squares = self
            .squares
            .iter()
            .filter(|(square, _)| bounds.contains(**square))
            .map(|(square, piece)| (*square, *piece))
            .collect();
        Self::from_checked(squares, bounds)
    }

    // Reads each rank straight out of the map, so the cost follows the rows and the pieces
    // rather than the area.
    fn to_board_notation(&self) -> String {
        let last_column = self.bounds.last_column();
        (0..=self.bounds.last_row())
            .rev()
            .map(|y| {
                let rank = self
                    .squares
                    .range(Square::new(0, y)..=Square::new(last_column, y))
                    .map(|(square, piece)| (square.x, piece.to_symbol()));
                encode_rank(self.bounds.columns(), rank)
            })
            .join("/")
    }
}
