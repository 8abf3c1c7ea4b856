//! Move collection handed from the rules to players and drivers.
//!
//! Players look moves up by origin or destination square (highlighting, click handling) without
//! touching the storage. Order is the order the rules generated the moves in.

use crate::moves::Move;
use crate::types::Square;

/// Typical upper bound of legal moves in a chess position, used as initial capacity.
pub const MAX_MOVES: usize = 218;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveCollection {
    moves: Vec<Move>,
}

impl MoveCollection {
    pub fn new() -> Self {
        Self {
            moves: Vec::with_capacity(MAX_MOVES),
        }
    }

    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn first(&self) -> Option<&Move> {
        self.moves.first()
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.moves.contains(mv)
    }

    pub fn contains_move_to(&self, square: Square) -> bool {
        self.moves.iter().any(|mv| mv.to == square)
    }

    pub fn contains_move_from(&self, square: Square) -> bool {
        self.moves.iter().any(|mv| mv.from == square)
    }

    /// Moves starting on `square`.
    pub fn moves_from(&self, square: Square) -> MoveCollection {
        self.moves.iter().filter(|mv| mv.from == square).cloned().collect()
    }

    /// Moves ending on `square`.
    pub fn moves_to(&self, square: Square) -> MoveCollection {
        self.moves.iter().filter(|mv| mv.to == square).cloned().collect()
    }

    /// In-place filter: keep only moves for which the predicate returns true.
    pub fn retain<F: FnMut(&Move) -> bool>(&mut self, f: F) {
        self.moves.retain(f);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn into_vec(self) -> Vec<Move> {
        self.moves
    }
}

impl FromIterator<Move> for MoveCollection {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl Extend<Move> for MoveCollection {
    fn extend<I: IntoIterator<Item = Move>>(&mut self, iter: I) {
        self.moves.extend(iter);
    }
}

impl IntoIterator for MoveCollection {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveCollection {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
