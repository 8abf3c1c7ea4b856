//! Move rules.
//!
//! Generative rules propose pseudo-legal moves for the side to move, one piece kind each.
//! Restrictive rules then drop candidates; the only one shipped is `CheckRule`, which removes
//! moves that leave the mover's king attacked. `RuleSet` chains the two stages and is what
//! drivers talk to through `MoveGenerator`.

use std::sync::Arc;

use tracing::debug;

use crate::board::ChessBoard;
use crate::dense_board::DenseBoard;
use crate::error::Result;
use crate::game_state::GameState;
use crate::movelist::MoveCollection;
use crate::moves::Move;
use crate::types::{ChessPiece, Color, PieceType, Square};

pub mod castling;
pub mod check;
pub mod king;
pub mod leaper;
pub mod pawn;
pub mod sliding;

pub use castling::CastlingRule;
pub use check::{is_square_attacked, CheckRule};
pub use king::KingRule;
pub use leaper::LeaperRule;
pub use pawn::PawnRule;
pub use sliding::SlidingRule;

/// Proposes moves for the side to move. Never consults check.
pub trait GenerativeRule<B: ChessBoard>: Send + Sync {
    fn generate_moves(&self, state: &GameState<B>) -> Result<MoveCollection>;
}

/// Removes candidates in place. May simulate moves on `state` but must hand it back unchanged.
pub trait RestrictiveRule<B: ChessBoard>: Send + Sync {
    fn filter_moves(&self, moves: &mut MoveCollection, state: &mut GameState<B>) -> Result<()>;
}

/// Entry point for anything that needs the moves of a position.
pub trait MoveGenerator<B: ChessBoard>: Send + Sync {
    fn generate_moves(&self, state: &mut GameState<B>) -> Result<MoveCollection>;
}

/// Outcome of a position for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}

/// Ordered list of generative rules. On its own it is a pseudo-legal move generator, which is
/// exactly what `CheckRule` needs to find attacks.
#[derive(Clone)]
pub struct GenerativeRules<B: ChessBoard = DenseBoard> {
    rules: Vec<Arc<dyn GenerativeRule<B>>>,
}

impl<B: ChessBoard> GenerativeRules<B> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// King, queen, rook, bishop, knight, pawn and castling.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(KingRule)
            .with_rule(SlidingRule::queen())
            .with_rule(SlidingRule::rook())
            .with_rule(SlidingRule::bishop())
            .with_rule(LeaperRule::knight())
            .with_rule(PawnRule)
            .with_rule(CastlingRule)
    }

    pub fn with_rule<R: GenerativeRule<B> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Union of every rule's moves, in registration order.
    pub fn pseudo_legal_moves(&self, state: &GameState<B>) -> Result<MoveCollection> {
        let mut moves = MoveCollection::new();
        for rule in &self.rules {
            moves.extend(rule.generate_moves(state)?);
        }
        Ok(moves)
    }
}

impl<B: ChessBoard> Default for GenerativeRules<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ChessBoard> MoveGenerator<B> for GenerativeRules<B> {
    fn generate_moves(&self, state: &mut GameState<B>) -> Result<MoveCollection> {
        self.pseudo_legal_moves(state)
    }
}

/// Generative rules followed by restrictive rules: the legal moves of a position.
///
/// The check filter is always present and always sees every generative rule, including ones
/// registered later with `with_generative`, so custom pieces give check like any other.
pub struct RuleSet<B: ChessBoard = DenseBoard> {
    generative: GenerativeRules<B>,
    check: CheckRule<B>,
    restrictive: Vec<Box<dyn RestrictiveRule<B>>>,
}

impl<B: ChessBoard> RuleSet<B> {
    pub fn new(generative: GenerativeRules<B>) -> Self {
        Self {
            check: CheckRule::new(generative.clone()),
            generative,
            restrictive: Vec::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new(GenerativeRules::standard())
    }

    /// Registers an extra generative rule, e.g. for a custom piece type.
    pub fn with_generative<R: GenerativeRule<B> + 'static>(self, rule: R) -> Self {
        let generative = self.generative.with_rule(rule);
        Self {
            check: CheckRule::new(generative.clone()),
            generative,
            restrictive: self.restrictive,
        }
    }

    /// Registers an extra restrictive rule. It runs after the check filter.
    pub fn with_restrictive<R: RestrictiveRule<B> + 'static>(mut self, rule: R) -> Self {
        self.restrictive.push(Box::new(rule));
        self
    }

    pub fn generative(&self) -> &GenerativeRules<B> {
        &self.generative
    }

    /// Moves the rules propose before any filtering.
    pub fn pseudo_legal_moves(&self, state: &GameState<B>) -> Result<MoveCollection> {
        self.generative.pseudo_legal_moves(state)
    }

    /// Is any king of `color` attacked in the current position?
    pub fn is_in_check(&self, state: &GameState<B>, color: Color) -> Result<bool> {
        let probe = GameState::new(state.board().clone(), color.other_color());
        let attacks = self.generative.pseudo_legal_moves(&probe)?;
        Ok(state
            .squares_with_type_and_color(PieceType::King, color)
            .into_iter()
            .any(|king| attacks.contains_move_to(king)))
    }

    pub fn status(&self, state: &mut GameState<B>) -> Result<GameStatus> {
        let side = state.side_to_move();
        let has_moves = !self.generate_moves(state)?.is_empty();
        let in_check = self.is_in_check(state, side)?;
        Ok(match (has_moves, in_check) {
            (true, false) => GameStatus::Ongoing,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::Checkmate {
                winner: side.other_color(),
            },
            (false, false) => GameStatus::Stalemate,
        })
    }
}

impl<B: ChessBoard> MoveGenerator<B> for RuleSet<B> {
    fn generate_moves(&self, state: &mut GameState<B>) -> Result<MoveCollection> {
        let mut moves = self.generative.pseudo_legal_moves(state)?;
        let pseudo_legal = moves.len();
        self.check.filter_moves(&mut moves, state)?;
        for rule in &self.restrictive {
            rule.filter_moves(&mut moves, state)?;
        }
        debug!(
            side = state.side_to_move().to_human(),
            pseudo_legal,
            legal = moves.len(),
            "generated moves"
        );
        Ok(moves)
    }
}

/// Potential move, either valid, in which case it carries the enemy piece it would capture, or
/// invalid (off the board or onto a friendly piece).
pub(crate) enum PotentialMove {
    Valid(Option<ChessPiece>),
    Invalid,
}

impl PotentialMove {
    pub(crate) fn continue_search_in_direction(&self) -> bool {
        matches!(self, PotentialMove::Valid(None))
    }

    pub(crate) fn into_move(self, piece: ChessPiece, from: Square, to: Square) -> Option<Move> {
        match self {
            PotentialMove::Invalid => None,
            PotentialMove::Valid(None) => Some(Move::new(piece, from, to)),
            PotentialMove::Valid(Some(captured)) => Some(Move::capture(piece, from, to, captured)),
        }
    }
}

/// Can `piece` land on `candidate`?
pub(crate) fn check_move_target<B: ChessBoard>(
    state: &GameState<B>,
    piece: ChessPiece,
    candidate: Square,
) -> Result<PotentialMove> {
    if !state.board().bounds().contains(candidate) {
        return Ok(PotentialMove::Invalid);
    }
    Ok(match state.piece_at(candidate)? {
        Some(other) if other.color == piece.color => PotentialMove::Invalid,
        other => PotentialMove::Valid(other),
    })
}
