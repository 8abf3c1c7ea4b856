//! Moves and the auxiliary effects they carry.
//!
//! A `Move` is the base displacement of one piece plus an ordered list of `MoveComponent`s.
//! The owning `GameState` applies the displacement itself; each component then adds its own
//! board effect, and knows how to take it back again.

use std::fmt;

use crate::board::ChessBoard;
use crate::error::Result;
use crate::types::{ChessPiece, Square};

/// Tag used to look components up on a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Capture,
    EnPassant,
    Promotion,
    Castling,
    DoublePawnPush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveComponent {
    /// Takes `captured` off `square`. Usually `square` is the destination, which the base
    /// displacement already overwrites.
    Capture { captured: ChessPiece, square: Square },
    /// Takes the pawn that just double-pushed off `square`, beside the destination.
    EnPassant { captured: ChessPiece, square: Square },
    /// Replaces the mover on the destination.
    Promotion { promoted_to: ChessPiece },
    /// Displaces the paired rook.
    Castling {
        rook: ChessPiece,
        rook_from: Square,
        rook_to: Square,
    },
    /// A pawn advanced two rows; `en_passant_square` is the row it skipped.
    DoublePawnPush { en_passant_square: Square },
}

impl MoveComponent {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Capture { .. } => ComponentKind::Capture,
            Self::EnPassant { .. } => ComponentKind::EnPassant,
            Self::Promotion { .. } => ComponentKind::Promotion,
            Self::Castling { .. } => ComponentKind::Castling,
            Self::DoublePawnPush { .. } => ComponentKind::DoublePawnPush,
        }
    }

    /// Applies this component to a board on which the base displacement of `mv` has already
    /// happened.
    pub fn apply<B: ChessBoard>(&self, board: &B, mv: &Move) -> Result<B> {
        match *self {
            Self::Capture { square, .. } | Self::EnPassant { square, .. } => {
                if square == mv.to {
                    Ok(board.clone())
                } else {
                    board.without_piece_at(square)
                }
            }
            Self::Promotion { promoted_to } => board.with_piece_at(promoted_to, mv.to),
            Self::Castling {
                rook_from, rook_to, ..
            } => board.with_piece_moved(rook_from, rook_to),
            Self::DoublePawnPush { .. } => Ok(board.clone()),
        }
    }

    /// Exact inverse of `apply`: given the board right after `apply`, returns the board right
    /// before it.
    pub fn undo<B: ChessBoard>(&self, board: &B, mv: &Move) -> Result<B> {
        match *self {
            Self::Capture { captured, square } | Self::EnPassant { captured, square } => {
                if square == mv.to {
                    // the base undo puts the displaced piece back
                    Ok(board.clone())
                } else {
                    board.with_piece_at(captured, square)
                }
            }
            Self::Promotion { .. } => board.with_piece_at(mv.piece, mv.to),
            Self::Castling {
                rook_from, rook_to, ..
            } => board.with_piece_moved(rook_to, rook_from),
            Self::DoublePawnPush { .. } => Ok(board.clone()),
        }
    }
}

impl fmt::Display for MoveComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capture { captured, square } => write!(
                f,
                "capturing {} {} at {}",
                captured.color.to_human(),
                captured.piece_type.to_human(),
                square
            ),
            Self::EnPassant { square, .. } => write!(f, "capturing en passant at {}", square),
            Self::Promotion { promoted_to } => {
                write!(f, "promoting to {}", promoted_to.piece_type.to_human())
            }
            Self::Castling { rook_from, rook_to, .. } => {
                write!(f, "castling with rook {} to {}", rook_from, rook_to)
            }
            Self::DoublePawnPush { .. } => write!(f, "double push"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: ChessPiece,
    pub from: Square,
    pub to: Square,
    components: Vec<MoveComponent>,
}

impl Move {
    pub fn new(piece: ChessPiece, from: Square, to: Square) -> Self {
        Self::with_components(piece, from, to, Vec::new())
    }

    pub fn with_components(
        piece: ChessPiece,
        from: Square,
        to: Square,
        components: Vec<MoveComponent>,
    ) -> Self {
        debug_assert!(
            components
                .iter()
                .enumerate()
                .all(|(i, c)| components[i + 1..].iter().all(|o| o.kind() != c.kind())),
            "at most one component of each kind"
        );
        Self {
            piece,
            from,
            to,
            components,
        }
    }

    /// A move onto an enemy piece standing on `to`.
    pub fn capture(piece: ChessPiece, from: Square, to: Square, captured: ChessPiece) -> Self {
        Self::with_components(
            piece,
            from,
            to,
            vec![MoveComponent::Capture {
                captured,
                square: to,
            }],
        )
    }

    pub fn components(&self) -> &[MoveComponent] {
        &self.components
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|c| c.kind() == kind)
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&MoveComponent> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    pub fn is_capture(&self) -> bool {
        self.has_component(ComponentKind::Capture) || self.has_component(ComponentKind::EnPassant)
    }

    /// The captured piece and the square it stood on, if any.
    pub fn captured(&self) -> Option<(ChessPiece, Square)> {
        self.components.iter().find_map(|c| match *c {
            MoveComponent::Capture { captured, square }
            | MoveComponent::EnPassant { captured, square } => Some((captured, square)),
            _ => None,
        })
    }

    pub fn promotion(&self) -> Option<ChessPiece> {
        match self.component(ComponentKind::Promotion) {
            Some(MoveComponent::Promotion { promoted_to }) => Some(*promoted_to),
            _ => None,
        }
    }

    /// Long algebraic form: `e2e4`, `e7e8q`.
    pub fn to_algebraic(&self) -> String {
        match self.promotion() {
            Some(promoted_to) => format!(
                "{}{}{}",
                self.from,
                self.to,
                promoted_to.piece_type.symbol()
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }

    pub fn to_human(&self) -> String {
        let mut human = format!(
            "{} moves {} from {} to {}",
            self.piece.color.to_human(),
            self.piece.piece_type.to_human(),
            self.from,
            self.to
        );
        for component in &self.components {
            if !matches!(component, MoveComponent::DoublePawnPush { .. }) {
                human.push(' ');
                human.push_str(&component.to_string());
            }
        }
        human
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}
