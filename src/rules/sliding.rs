use once_cell::sync::Lazy;

use crate::board::ChessBoard;
use crate::error::Result;
use crate::game_state::GameState;
use crate::movelist::MoveCollection;
use crate::rules::{check_move_target, GenerativeRule, PotentialMove};
use crate::types::{ChessPiece, PieceType, Square};

pub const ROOK_DIRECTIONS: [Square; 4] = [
    Square::new(0, 1),
    Square::new(1, 0),
    Square::new(0, -1),
    Square::new(-1, 0),
];

pub const BISHOP_DIRECTIONS: [Square; 4] = [
    Square::new(1, 1),
    Square::new(1, -1),
    Square::new(-1, -1),
    Square::new(-1, 1),
];

pub static QUEEN_DIRECTIONS: Lazy<Vec<Square>> = Lazy::new(|| {
    ROOK_DIRECTIONS
        .iter()
        .chain(BISHOP_DIRECTIONS.iter())
        .copied()
        .collect()
});

/// A piece that scans outward along each direction until it leaves the board or hits something.
/// It may capture the first enemy it meets and never passes a blocker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidingRule {
    piece_type: PieceType,
    directions: Vec<Square>,
}

impl SlidingRule {
    pub fn new(piece_type: PieceType, directions: Vec<Square>) -> Self {
        debug_assert!(directions.iter().all(|d| *d != Square::new(0, 0)));
        Self {
            piece_type,
            directions,
        }
    }

    pub fn queen() -> Self {
        Self::new(PieceType::Queen, QUEEN_DIRECTIONS.clone())
    }

    pub fn rook() -> Self {
        Self::new(PieceType::Rook, ROOK_DIRECTIONS.to_vec())
    }

    pub fn bishop() -> Self {
        Self::new(PieceType::Bishop, BISHOP_DIRECTIONS.to_vec())
    }
}

impl<B: ChessBoard> GenerativeRule<B> for SlidingRule {
    fn generate_moves(&self, state: &GameState<B>) -> Result<MoveCollection> {
        let color = state.side_to_move();
        let piece = ChessPiece::new(self.piece_type, color);
        let mut moves = MoveCollection::new();

        for from in state.squares_with_type_and_color(self.piece_type, color) {
            for direction in &self.directions {
                let mut candidate = from.offset(*direction);
                loop {
                    let potential_move = check_move_target(state, piece, candidate)?;
                    if let PotentialMove::Invalid = potential_move {
                        break;
                    }
                    let keep_going = potential_move.continue_search_in_direction();
                    moves.extend(potential_move.into_move(piece, from, candidate));
                    if !keep_going {
                        break;
                    }
                    candidate = candidate.offset(*direction);
                }
            }
        }
        Ok(moves)
    }
}
