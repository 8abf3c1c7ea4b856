//! The board abstraction shared by the dense and sparse representations.
//!
//! Boards are persistent values: every `with_*` operation returns a new board and leaves the
//! receiver untouched. Move generation and the legality filter only ever talk to this trait, so
//! either representation can sit underneath a `GameState`.

use std::fmt;

use itertools::Itertools;

use crate::error::{ChessError, Result};
use crate::types::{Bounds, ChessPiece, Color, PieceType, Square};

/// Board-only text form of the standard starting position.
pub const STANDARD_BOARD_NOTATION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

pub trait ChessBoard: Clone + fmt::Debug + PartialEq + Send + Sync + Sized + 'static {
    /// A board of the given shape with no pieces on it.
    fn empty(bounds: Bounds) -> Self;

    fn bounds(&self) -> Bounds;

    /// Fails with `OutOfBounds` when `square` is not on the board.
    fn piece_at(&self, square: Square) -> Result<Option<ChessPiece>>;

    /// Reverse lookup. With several equal pieces on the board, the first one in row-major order
    /// wins.
    fn piece_position(&self, piece: &ChessPiece) -> Option<Square>;

    /// Every occupied square with its piece, in row-major order.
    fn placements(&self) -> Vec<(Square, ChessPiece)>;

    fn with_piece_at(&self, piece: ChessPiece, square: Square) -> Result<Self>;

    fn without_piece_at(&self, square: Square) -> Result<Self>;

    /// Moves whatever stands on `from` to `to`, overwriting `to`.
    fn with_piece_moved(&self, from: Square, to: Square) -> Result<Self>;

    /// Replaces every placement on the board with `pieces`.
    fn with_all_pieces<I>(&self, pieces: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Square, ChessPiece)>;

    fn without_pieces(&self) -> Self;

    /// Keeps the pieces standing inside both the old and the new bounds and drops the rest.
    fn with_bounds(&self, bounds: Bounds) -> Self;

    fn pieces_of_color(&self, color: Color) -> Vec<ChessPiece> {
        self.placements()
            .into_iter()
            .map(|(_, piece)| piece)
            .filter(|piece| piece.color == color)
            .collect()
    }

    fn pieces_of_type_and_color(&self, piece_type: PieceType, color: Color) -> Vec<ChessPiece> {
        self.pieces_of_color(color)
            .into_iter()
            .filter(|piece| piece.piece_type == piece_type)
            .collect()
    }

    fn squares_with_type_and_color(&self, piece_type: PieceType, color: Color) -> Vec<Square> {
        self.placements()
            .into_iter()
            .filter(|(_, piece)| piece.piece_type == piece_type && piece.color == color)
            .map(|(square, _)| square)
            .collect()
    }

    fn piece_count(&self) -> usize {
        self.placements().len()
    }

    /// Ranks from the highest row down, empty runs as counts, `/` between ranks.
    fn to_board_notation(&self) -> String {
        let bounds = self.bounds();
        let placements = self.placements();
        let mut rest = placements.as_slice();
        let mut ranks = Vec::with_capacity(bounds.rows());
        for y in 0..=bounds.last_row() {
            let split = rest.iter().position(|(square, _)| square.y != y).unwrap_or(rest.len());
            let (rank, tail) = rest.split_at(split);
            ranks.push(encode_rank(
                bounds.columns(),
                rank.iter().map(|(square, piece)| (square.x, piece.to_symbol())),
            ));
            rest = tail;
        }
        ranks.iter().rev().join("/")
    }
}

/// Encodes one rank from its occupied columns, given in ascending order.
pub(crate) fn encode_rank<I>(columns: usize, occupied: I) -> String
where
    I: IntoIterator<Item = (i32, char)>,
{
    let mut encoded = String::new();
    let mut next = 0usize;
    for (x, symbol) in occupied {
        let x = x as usize;
        if x > next {
            encoded.push_str(&(x - next).to_string());
        }
        encoded.push(symbol);
        next = x + 1;
    }
    if columns > next {
        encoded.push_str(&(columns - next).to_string());
    }
    encoded
}

/// Parses the board-only text form produced by `to_board_notation`.
///
/// The number of ranks gives the rows and every rank must cover the same number of columns.
/// Empty runs may span more than one digit, so wide boards round-trip.
pub fn parse_board_notation<B: ChessBoard>(notation: &str) -> Result<B> {
    let ranks: Vec<&str> = notation.trim().split('/').collect();
    let mut rows: Vec<Vec<Option<ChessPiece>>> = Vec::with_capacity(ranks.len());

    for rank in &ranks {
        let mut row = Vec::new();
        let mut run = String::new();
        for c in rank.chars() {
            if c.is_ascii_digit() {
                run.push(c);
                continue;
            }
            flush_run(&mut run, &mut row)?;
            let piece = ChessPiece::from_symbol(c)
                .ok_or_else(|| ChessError::InvalidNotation(format!("unknown piece symbol `{c}`")))?;
            row.push(Some(piece));
        }
        flush_run(&mut run, &mut row)?;
        rows.push(row);
    }

    let columns = rows[0].len();
    if let Some(ragged) = rows.iter().position(|row| row.len() != columns) {
        return Err(ChessError::InvalidNotation(format!(
            "rank {} covers {} columns, expected {}",
            ragged + 1,
            rows[ragged].len(),
            columns
        )));
    }

    let bounds = Bounds::new(rows.len(), columns)
        .map_err(|e| ChessError::InvalidNotation(e.to_string()))?;
    let top = bounds.last_row();
    let placements = rows.into_iter().enumerate().flat_map(|(rank_idx, row)| {
        row.into_iter().enumerate().filter_map(move |(x, piece)| {
            piece.map(|piece| (Square::new(x as i32, top - rank_idx as i32), piece))
        })
    });

    B::empty(bounds).with_all_pieces(placements.collect::<Vec<_>>())
}

fn flush_run(run: &mut String, row: &mut Vec<Option<ChessPiece>>) -> Result<()> {
    if run.is_empty() {
        return Ok(());
    }
    let count: usize = run
        .parse()
        .map_err(|_| ChessError::InvalidNotation(format!("bad empty-square count `{run}`")))?;
    if count == 0 {
        return Err(ChessError::InvalidNotation("empty-square count of 0".to_string()));
    }
    row.extend(std::iter::repeat(None).take(count));
    run.clear();
    Ok(())
}

/// Renders the board with one line per rank, for terminal output.
pub fn draw_board<B: ChessBoard>(board: &B) -> String {
    let bounds = board.bounds();
    let mut string = String::new();
    for y in (0..bounds.rows() as i32).rev() {
        let rank = (0..bounds.columns() as i32)
            .map(|x| match board.piece_at(Square::new(x, y)) {
                Ok(Some(piece)) => piece.to_symbol(),
                _ => '.',
            })
            .join(" ");
        string.push_str(&rank);
        string.push('\n');
    }
    string
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense_board::DenseBoard;
    use crate::sparse_board::SparseBoard;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_notation_round_trip() {
        let dense: DenseBoard = parse_board_notation(STANDARD_BOARD_NOTATION).unwrap();
        let sparse: SparseBoard = parse_board_notation(STANDARD_BOARD_NOTATION).unwrap();
        assert_eq!(dense.to_board_notation(), STANDARD_BOARD_NOTATION);
        assert_eq!(sparse.to_board_notation(), STANDARD_BOARD_NOTATION);
        assert_eq!(dense.piece_count(), 32);
        assert_eq!(
            dense.piece_at(Square::new(4, 0)).unwrap(),
            Some(ChessPiece::white(PieceType::King))
        );
        assert_eq!(
            dense.piece_at(Square::new(3, 7)).unwrap(),
            Some(ChessPiece::black(PieceType::Queen))
        );
    }

    #[test]
    fn test_back_ranks_and_empty_runs() {
        let board: DenseBoard = parse_board_notation(STANDARD_BOARD_NOTATION).unwrap();
        let notation = board.to_board_notation();
        let ranks: Vec<&str> = notation.split('/').collect();
        assert_eq!(ranks.len(), 8);
        assert_eq!(ranks[0], "rnbqkbnr");
        assert_eq!(ranks[7], "RNBQKBNR");
        for rank in &ranks[2..6] {
            assert_eq!(*rank, "8");
        }
    }

    #[test]
    fn test_notation_mixed_runs() {
        let board = DenseBoard::empty(Bounds::STANDARD)
            .with_piece_at(ChessPiece::white(PieceType::King), Square::new(4, 0))
            .unwrap()
            .with_piece_at(ChessPiece::black(PieceType::Pawn), Square::new(0, 6))
            .unwrap()
            .with_piece_at(ChessPiece::black(PieceType::King), Square::new(7, 7))
            .unwrap();
        assert_eq!(board.to_board_notation(), "7k/p7/8/8/8/8/8/4K3");
    }

    #[test]
    fn test_wide_board_notation() {
        let board: SparseBoard = parse_board_notation("12/k10K").unwrap();
        assert_eq!(board.bounds(), Bounds::new(2, 12).unwrap());
        assert_eq!(
            board.piece_at(Square::new(11, 0)).unwrap(),
            Some(ChessPiece::white(PieceType::King))
        );
        assert_eq!(board.to_board_notation(), "12/k10K");
    }

    #[test]
    fn test_invalid_notation() {
        assert!(matches!(
            parse_board_notation::<DenseBoard>("8/8/7x"),
            Err(ChessError::InvalidNotation(_))
        ));
        assert!(matches!(
            parse_board_notation::<DenseBoard>("8/7"),
            Err(ChessError::InvalidNotation(_))
        ));
        assert!(matches!(
            parse_board_notation::<DenseBoard>(""),
            Err(ChessError::InvalidNotation(_))
        ));
        assert!(matches!(
            parse_board_notation::<DenseBoard>("0"),
            Err(ChessError::InvalidNotation(_))
        ));
    }

    #[test]
    fn test_draw_board() {
        let board: DenseBoard = parse_board_notation("2k/3/K2").unwrap();
        assert_eq!(draw_board(&board), ". . k\n. . .\nK . .\n");
    }
}
