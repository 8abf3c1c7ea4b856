use crate::board::ChessBoard;
use crate::error::Result;
use crate::game_state::GameState;
use crate::movelist::MoveCollection;
use crate::moves::{Move, MoveComponent};
use crate::rules::GenerativeRule;
use crate::types::{Bounds, ChessPiece, Color, PieceType, Square, PIECES_CAN_PROMOTE_TO};

/// Pushes, double pushes from the start row, diagonal captures, en passant and promotion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PawnRule;

/// Row delta of a pawn step for `color`.
pub fn pawn_direction(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

fn start_row(color: Color, bounds: Bounds) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => bounds.last_row() - 1,
    }
}

fn promotion_row(color: Color, bounds: Bounds) -> i32 {
    match color {
        Color::White => bounds.last_row(),
        Color::Black => 0,
    }
}

impl<B: ChessBoard> GenerativeRule<B> for PawnRule {
    fn generate_moves(&self, state: &GameState<B>) -> Result<MoveCollection> {
        let color = state.side_to_move();
        let pawn = ChessPiece::new(PieceType::Pawn, color);
        let bounds = state.board().bounds();
        let dir = pawn_direction(color);
        let mut moves = MoveCollection::new();

        for from in state.squares_with_type_and_color(PieceType::Pawn, color) {
            // forward pushes
            let one = from.offset(Square::new(0, dir));
            if bounds.contains(one) && state.piece_at(one)?.is_none() {
                push_pawn_moves(&mut moves, pawn, from, one, Vec::new(), bounds);

                let two = one.offset(Square::new(0, dir));
                if from.y == start_row(color, bounds)
                    && bounds.contains(two)
                    && state.piece_at(two)?.is_none()
                {
                    let double_push = MoveComponent::DoublePawnPush {
                        en_passant_square: one,
                    };
                    push_pawn_moves(&mut moves, pawn, from, two, vec![double_push], bounds);
                }
            }

            // diagonal captures and en passant
            for dx in [-1, 1] {
                let to = from.offset(Square::new(dx, dir));
                if !bounds.contains(to) {
                    continue;
                }
                match state.piece_at(to)? {
                    Some(target) if target.color != color => {
                        let capture = MoveComponent::Capture {
                            captured: target,
                            square: to,
                        };
                        push_pawn_moves(&mut moves, pawn, from, to, vec![capture], bounds);
                    }
                    Some(_) => {}
                    None if state.en_passant_target() == Some(to) => {
                        let victim_square = Square::new(to.x, from.y);
                        let victim = ChessPiece::new(PieceType::Pawn, color.other_color());
                        if state.piece_at(victim_square)? == Some(victim) {
                            moves.push(Move::with_components(
                                pawn,
                                from,
                                to,
                                vec![MoveComponent::EnPassant {
                                    captured: victim,
                                    square: victim_square,
                                }],
                            ));
                        }
                    }
                    None => {}
                }
            }
        }
        Ok(moves)
    }
}

/// Pushes the move, or one move per promotion choice when `to` is on the far row.
fn push_pawn_moves(
    moves: &mut MoveCollection,
    pawn: ChessPiece,
    from: Square,
    to: Square,
    components: Vec<MoveComponent>,
    bounds: Bounds,
) {
    if to.y != promotion_row(pawn.color, bounds) {
        moves.push(Move::with_components(pawn, from, to, components));
        return;
    }
    for piece_type in PIECES_CAN_PROMOTE_TO {
        let mut with_promotion = components.clone();
        with_promotion.push(MoveComponent::Promotion {
            promoted_to: ChessPiece::new(piece_type, pawn.color),
        });
        moves.push(Move::with_components(pawn, from, to, with_promotion));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense_board::DenseBoard;
    use crate::moves::ComponentKind;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_pawns_in_start_position() {
        let state: GameState = GameState::standard();
        let moves = PawnRule.generate_moves(&state).unwrap();
        assert_eq!(moves.len(), 16);
        let double = moves.moves_to(sq("e4"));
        assert_eq!(
            double.first().unwrap().component(ComponentKind::DoublePawnPush),
            Some(&MoveComponent::DoublePawnPush {
                en_passant_square: sq("e3")
            })
        );
    }

    #[test]
    fn test_black_pawns_move_down() {
        let state: GameState =
            GameState::from_notation("8/4p3/8/8/8/8/8/8", Color::Black).unwrap();
        let moves = PawnRule.generate_moves(&state).unwrap();
        assert_eq!(moves.len(), 2);
        assert!(moves.contains_move_to(sq("e6")));
        assert!(moves.contains_move_to(sq("e5")));
    }

    #[test]
    fn test_blocked_pawn() {
        // . . . . n . . .
        // . . . . P . . .
        let state: GameState =
            GameState::from_notation("8/8/8/8/4n3/4P3/8/8", Color::White).unwrap();
        assert!(PawnRule.generate_moves(&state).unwrap().is_empty());

        // double push blocked on the second square only
        let state: GameState =
            GameState::from_notation("8/8/8/8/4n3/8/4P3/8", Color::White).unwrap();
        let moves = PawnRule.generate_moves(&state).unwrap();
        assert_eq!(moves.len(), 1);
        assert!(moves.contains_move_to(sq("e3")));
    }

    #[test]
    fn test_diagonal_captures() {
        // . . . p . N . .
        // . . . . P . . .
        let state: GameState =
            GameState::from_notation("8/8/8/3p1N2/4P3/8/8/8", Color::White).unwrap();
        let moves = PawnRule.generate_moves(&state).unwrap();
        assert_eq!(moves.len(), 2);
        assert!(moves.contains_move_to(sq("e5")));
        let capture = moves.moves_to(sq("d5"));
        assert_eq!(
            capture.first().unwrap().captured(),
            Some((ChessPiece::black(PieceType::Pawn), sq("d5")))
        );
    }

    #[test]
    fn test_promotion_choices() {
        // . r . . . . . .
        // P . . . . . . .
        let state: GameState =
            GameState::from_notation("1r6/P7/8/8/8/8/8/8", Color::White).unwrap();
        let moves = PawnRule.generate_moves(&state).unwrap();
        // four quiet promotions on a8, four capturing promotions on b8
        assert_eq!(moves.len(), 8);
        let promoted: Vec<PieceType> = moves
            .moves_to(sq("a8"))
            .iter()
            .filter_map(|mv| mv.promotion())
            .map(|piece| piece.piece_type)
            .collect();
        assert_eq!(promoted, PIECES_CAN_PROMOTE_TO.to_vec());
        assert!(moves
            .moves_to(sq("b8"))
            .iter()
            .all(|mv| mv.is_capture() && mv.promotion().is_some()));
    }

    #[test]
    fn test_en_passant() {
        // . . . p P . . .  (black pawn just arrived on d5 from d7)
        let state: GameState = GameState::from_notation("8/8/8/3pP3/8/8/8/8", Color::White)
            .unwrap()
            .with_en_passant_target(Some(sq("d6")));
        let moves = PawnRule.generate_moves(&state).unwrap();
        assert_eq!(moves.len(), 2);
        let ep = moves.moves_to(sq("d6"));
        assert_eq!(
            ep.first().unwrap().component(ComponentKind::EnPassant),
            Some(&MoveComponent::EnPassant {
                captured: ChessPiece::black(PieceType::Pawn),
                square: sq("d5"),
            })
        );

        let mut played = state.clone();
        played.make_move(ep.first().unwrap()).unwrap();
        assert_eq!(played.piece_at(sq("d5")).unwrap(), None);
        assert_eq!(
            played.piece_at(sq("d6")).unwrap(),
            Some(ChessPiece::white(PieceType::Pawn))
        );
        played.unmake_last_move().unwrap();
        assert_eq!(played, state);
    }

    #[test]
    fn test_no_en_passant_without_target() {
        let state: GameState =
            GameState::from_notation("8/8/8/3pP3/8/8/8/8", Color::White).unwrap();
        assert_eq!(PawnRule.generate_moves(&state).unwrap().len(), 1);
    }

    #[test]
    fn test_pawns_on_small_board() {
        // start row is the second row for both colors on any board height
        let board = DenseBoard::empty(Bounds::new(5, 3).unwrap())
            .with_piece_at(ChessPiece::black(PieceType::Pawn), Square::new(1, 3))
            .unwrap();
        let state = GameState::new(board, Color::Black);
        let moves = PawnRule.generate_moves(&state).unwrap();
        assert_eq!(moves.len(), 2);
        assert!(moves.contains_move_to(Square::new(1, 1)));
    }
}
