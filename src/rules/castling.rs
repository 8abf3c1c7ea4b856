use crate::board::ChessBoard;
use crate::error::Result;
use crate::game_state::{home_row, GameState};
use crate::movelist::MoveCollection;
use crate::moves::{Move, MoveComponent};
use crate::rules::GenerativeRule;
use crate::types::{ChessPiece, PieceType, Square};

/// Castling on any board width: the king walks two columns toward a corner rook, which lands on
/// the square the king crossed.
///
/// This rule only looks at rights, placement and empty squares. Whether the king passes through
/// an attacked square is for `CheckRule` to decide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingRule;

impl<B: ChessBoard> GenerativeRule<B> for CastlingRule {
    fn generate_moves(&self, state: &GameState<B>) -> Result<MoveCollection> {
        let color = state.side_to_move();
        let rights = state.castling_rights();
        let mut moves = MoveCollection::new();
        if !rights.kingside(color) && !rights.queenside(color) {
            return Ok(moves);
        }

        let bounds = state.board().bounds();
        let row = home_row(color, bounds.last_row());
        let king = ChessPiece::new(PieceType::King, color);
        let rook = ChessPiece::new(PieceType::Rook, color);

        for from in state.squares_with_type_and_color(PieceType::King, color) {
            if from.y != row {
                continue;
            }
            for (allowed, corner_x) in [
                (rights.kingside(color), bounds.last_column()),
                (rights.queenside(color), 0),
            ] {
                if !allowed {
                    continue;
                }
                let rook_from = Square::new(corner_x, row);
                if state.piece_at(rook_from)? != Some(rook) {
                    continue;
                }
                // the king needs two squares to walk plus the rook's own square
                let distance = (corner_x - from.x).abs();
                if distance < 3 {
                    continue;
                }
                let step = (corner_x - from.x).signum();
                let mut between_empty = true;
                for x in (1..distance).map(|i| from.x + i * step) {
                    if state.piece_at(Square::new(x, row))?.is_some() {
                        between_empty = false;
                        break;
                    }
                }
                if !between_empty {
                    continue;
                }

                let to = Square::new(from.x + 2 * step, row);
                let rook_to = Square::new(from.x + step, row);
                moves.push(Move::with_components(
                    king,
                    from,
                    to,
                    vec![MoveComponent::Castling {
                        rook,
                        rook_from,
                        rook_to,
                    }],
                ));
            }
        }
        Ok(moves)
    }
}
