use crate::board::ChessBoard;
use crate::error::Result;
use crate::game_state::GameState;
use crate::movelist::MoveCollection;
use crate::rules::leaper::generate_leaps;
use crate::rules::GenerativeRule;
use crate::types::{PieceType, Square};

pub const KING_OFFSETS: [Square; 8] = [
    Square::new(0, 1),
    Square::new(1, 1),
    Square::new(1, 0),
    Square::new(1, -1),
    Square::new(0, -1),
    Square::new(-1, -1),
    Square::new(-1, 0),
    Square::new(-1, 1),
];

/// One step in any of the eight directions. Castling lives in its own rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KingRule;

impl<B: ChessBoard> GenerativeRule<B> for KingRule {
    fn generate_moves(&self, state: &GameState<B>) -> Result<MoveCollection> {
        generate_leaps(state, PieceType::King, &KING_OFFSETS)
    }
}
