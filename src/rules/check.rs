use tracing::trace;

use crate::board::ChessBoard;
use crate::error::Result;
use crate::game_state::GameState;
use crate::movelist::MoveCollection;
use crate::moves::{ComponentKind, Move};
use crate::rules::{MoveGenerator, RestrictiveRule};
use crate::types::{ChessPiece, Color, PieceType, Square};

/// Drops every move that leaves one of the mover's kings attacked, and castling moves whose king
/// starts on or walks across an attacked square.
///
/// Each candidate is played on the state, the opponent's replies are generated with `attacks`,
/// and the move is taken back before the next one. Positions without a king of the mover's color
/// keep all their moves.
pub struct CheckRule<B: ChessBoard> {
    attacks: Box<dyn MoveGenerator<B>>,
}

impl<B: ChessBoard> CheckRule<B> {
    /// `attacks` must produce the pseudo-legal moves of whichever side is to move.
    pub fn new<G: MoveGenerator<B> + 'static>(attacks: G) -> Self {
        Self {
            attacks: Box::new(attacks),
        }
    }

    fn is_legal(&self, mv: &Move, state: &mut GameState<B>, mover: Color) -> Result<bool> {
        if mv.has_component(ComponentKind::Castling) && !self.castling_path_is_safe(mv, state)? {
            return Ok(false);
        }

        state.make_move(mv)?;
        let attacked = self.king_attacked(state, mover);
        state.unmake_last_move()?;
        Ok(!attacked?)
    }

    fn king_attacked(&self, state: &mut GameState<B>, color: Color) -> Result<bool> {
        let kings = state.squares_with_type_and_color(PieceType::King, color);
        if kings.is_empty() {
            return Ok(false);
        }
        let replies = self.attacks.generate_moves(state)?;
        Ok(kings.into_iter().any(|king| replies.contains_move_to(king)))
    }

    /// The king may not castle out of check or through an attacked square. Landing on one is
    /// caught by the regular simulation.
    fn castling_path_is_safe(&self, mv: &Move, state: &GameState<B>) -> Result<bool> {
        let board = state.board();
        if is_square_attacked(self.attacks.as_ref(), board, mv.piece, mv.from)? {
            return Ok(false);
        }
        let step = (mv.to.x - mv.from.x).signum();
        let crossed = Square::new(mv.from.x + step, mv.from.y);
        let without_king = board.without_piece_at(mv.from)?;
        Ok(!is_square_attacked(
            self.attacks.as_ref(),
            &without_king,
            mv.piece,
            crossed,
        )?)
    }
}

impl<B: ChessBoard> RestrictiveRule<B> for CheckRule<B> {
    fn filter_moves(&self, moves: &mut MoveCollection, state: &mut GameState<B>) -> Result<()> {
        let mover = state.side_to_move();
        let candidates = std::mem::take(moves);
        for mv in candidates {
            if self.is_legal(&mv, state, mover)? {
                moves.push(mv);
            } else {
                trace!(mv = %mv, "rejected, king left attacked");
            }
        }
        Ok(())
    }
}

/// Would `piece` be attacked standing on `square` of `board`?
///
/// The piece is placed on the square first, so pawn captures and the like see a target there.
pub fn is_square_attacked<B: ChessBoard>(
    attacks: &dyn MoveGenerator<B>,
    board: &B,
    piece: ChessPiece,
    square: Square,
) -> Result<bool> {
    let mut probe = GameState::new(board.with_piece_at(piece, square)?, piece.color.other_color());
    Ok(attacks.generate_moves(&mut probe)?.contains_move_to(square))
}
