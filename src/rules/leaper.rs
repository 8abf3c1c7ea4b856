use crate::board::ChessBoard;
use crate::error::Result;
use crate::game_state::GameState;
use crate::movelist::MoveCollection;
use crate::rules::{check_move_target, GenerativeRule};
use crate::types::{ChessPiece, PieceType, Square};

pub const KNIGHT_OFFSETS: [Square; 8] = [
    Square::new(1, 2),
    Square::new(2, 1),
    Square::new(2, -1),
    Square::new(1, -2),
    Square::new(-1, -2),
    Square::new(-2, -1),
    Square::new(-2, 1),
    Square::new(-1, 2),
];

/// A piece that jumps straight to a fixed set of offsets, ignoring whatever stands in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaperRule {
    piece_type: PieceType,
    offsets: Vec<Square>,
}

impl LeaperRule {
    pub fn new(piece_type: PieceType, offsets: Vec<Square>) -> Self {
        Self {
            piece_type,
            offsets,
        }
    }

    pub fn knight() -> Self {
        Self::new(PieceType::Knight, KNIGHT_OFFSETS.to_vec())
    }
}

impl<B: ChessBoard> GenerativeRule<B> for LeaperRule {
    fn generate_moves(&self, state: &GameState<B>) -> Result<MoveCollection> {
        generate_leaps(state, self.piece_type, &self.offsets)
    }
}

/// Quiet move onto each empty target, capture onto each enemy, nothing onto a friend or off the
/// board.
pub(crate) fn generate_leaps<B: ChessBoard>(
    state: &GameState<B>,
    piece_type: PieceType,
    offsets: &[Square],
) -> Result<MoveCollection> {
    let color = state.side_to_move();
    let piece = ChessPiece::new(piece_type, color);
    let mut moves = MoveCollection::new();
    for from in state.squares_with_type_and_color(piece_type, color) {
        for offset in offsets {
            let to = from.offset(*offset);
            if let Some(mv) = check_move_target(state, piece, to)?.into_move(piece, from, to) {
                moves.push(mv);
            }
        }
    }
    Ok(moves)
}
