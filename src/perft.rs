//! Move path enumeration, for checking the rules against published node counts.

use rayon::prelude::*;

use crate::board::ChessBoard;
use crate::error::Result;
use crate::game_state::GameState;
use crate::moves::Move;
use crate::rules::MoveGenerator;

/// Number of leaf positions `depth` plies below `state`.
///
/// Walks the tree with make/unmake on the one state, which ends up exactly as it started.
pub fn perft<B, G>(state: &mut GameState<B>, rules: &G, depth: u8) -> Result<u64>
where
    B: ChessBoard,
    G: MoveGenerator<B> + ?Sized,
{
    if depth == 0 {
        return Ok(1);
    }

    let moves = rules.generate_moves(state)?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0;
    for mv in &moves {
        state.make_move(mv)?;
        let sub_nodes = perft(state, rules, depth - 1);
        state.unmake_last_move()?;
        nodes += sub_nodes?;
    }
    Ok(nodes)
}

/// Node count below each root move, in generation order.
pub fn perft_divide<B, G>(state: &mut GameState<B>, rules: &G, depth: u8) -> Result<Vec<(Move, u64)>>
where
    B: ChessBoard,
    G: MoveGenerator<B> + ?Sized,
{
    let moves = rules.generate_moves(state)?;
    let mut divided = Vec::with_capacity(moves.len());
    for mv in moves {
        state.make_move(&mv)?;
        let nodes = perft(state, rules, depth.saturating_sub(1));
        state.unmake_last_move()?;
        divided.push((mv, nodes?));
    }
    Ok(divided)
}

/// Same count as `perft`, with each root move searched on its own copy of the state across the
/// rayon pool.
pub fn perft_parallel<B, G>(state: &GameState<B>, rules: &G, depth: u8) -> Result<u64>
where
    B: ChessBoard,
    G: MoveGenerator<B> + ?Sized,
{
    if depth <= 1 {
        let mut state = state.clone();
        return perft(&mut state, rules, depth);
    }

    let mut root = state.clone();
    let moves = rules.generate_moves(&mut root)?.into_vec();
    moves
        .par_iter()
        .map(|mv| {
            let mut line = state.clone();
            line.make_move(mv)?;
            perft(&mut line, rules, depth - 1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense_board::DenseBoard;
    use crate::game_state::CastlingRights;
    use crate::rules::RuleSet;
    use crate::sparse_board::SparseBoard;
    use crate::types::{Bounds, ChessPiece, Color, PieceType, Square};
    use pretty_assertions::assert_eq;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R";

    fn kiwipete() -> GameState {
        GameState::from_notation(KIWIPETE, Color::White)
            .unwrap()
            .with_castling_rights(CastlingRights::ALL)
    }

    /// https://www.chessprogramming.org/Perft_Results, initial position
    #[test]
    fn perft_start() {
        let rules = RuleSet::standard();
        let mut state: GameState = GameState::standard();
        let expected = [1, 20, 400, 8902];
        for (depth, expected_nodes) in expected.iter().enumerate() {
            assert_eq!(perft(&mut state, &rules, depth as u8).unwrap(), *expected_nodes);
        }
        assert_eq!(state, GameState::standard());
    }

    #[test]
    fn perft_start_sparse() {
        let rules = RuleSet::standard();
        let mut state: GameState<SparseBoard> = GameState::standard();
        assert_eq!(perft(&mut state, &rules, 3).unwrap(), 8902);
    }

    /// "Kiwipete": castling, en passant and promotions all show up within two plies.
    #[test]
    fn perft_kiwipete() {
        let rules = RuleSet::standard();
        let mut state = kiwipete();
        assert_eq!(perft(&mut state, &rules, 1).unwrap(), 48);
        assert_eq!(perft(&mut state, &rules, 2).unwrap(), 2039);
        assert_eq!(state, kiwipete());
    }

    /// Position 3: en passant discovered checks along the fifth rank.
    #[test]
    fn perft_pos_3() {
        let rules = RuleSet::standard();
        let mut state: GameState =
            GameState::from_notation("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8", Color::White).unwrap();
        let expected = [1, 14, 191, 2812];
        for (depth, expected_nodes) in expected.iter().enumerate() {
            assert_eq!(perft(&mut state, &rules, depth as u8).unwrap(), *expected_nodes);
        }
    }

    /// Position 5: promotion with capture on the first ply.
    #[test]
    fn perft_pos_5() {
        let rules = RuleSet::standard();
        let mut state: GameState =
            GameState::from_notation("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R", Color::White)
                .unwrap()
                .with_castling_rights(CastlingRights::from_symbols("KQ").unwrap());
        assert_eq!(perft(&mut state, &rules, 1).unwrap(), 44);
        assert_eq!(perft(&mut state, &rules, 2).unwrap(), 1486);
    }

    #[test]
    fn perft_parallel_matches_sequential() {
        let rules = RuleSet::standard();
        let state = kiwipete();
        let mut sequential_state = state.clone();
        assert_eq!(
            perft_parallel(&state, &rules, 2).unwrap(),
            perft(&mut sequential_state, &rules, 2).unwrap()
        );
        assert_eq!(perft_parallel(&state, &rules, 1).unwrap(), 48);
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let rules = RuleSet::standard();
        let mut state: GameState = GameState::standard();
        let divided = perft_divide(&mut state, &rules, 2).unwrap();
        assert_eq!(divided.len(), 20);
        assert!(divided.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(divided.iter().map(|(_, nodes)| nodes).sum::<u64>(), 400);
    }

    #[test]
    fn perft_small_board() {
        let board = DenseBoard::empty(Bounds::new(4, 4).unwrap())
            .with_all_pieces([
                (Square::new(0, 0), ChessPiece::white(PieceType::King)),
                (Square::new(3, 3), ChessPiece::black(PieceType::King)),
            ])
            .unwrap();
        let rules = RuleSet::standard();
        let mut state = GameState::new(board, Color::White);
        // a2, b1 and b2, none of them next to the king on d4
        assert_eq!(perft(&mut state, &rules, 1).unwrap(), 3);
    }
}
