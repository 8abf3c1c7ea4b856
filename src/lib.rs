pub mod board;
pub mod dense_board;
pub mod error;
pub mod game_state;
pub mod movelist;
pub mod moves;
pub mod perft;
pub mod rules;
pub mod sparse_board;
pub mod types;

pub use board::{draw_board, parse_board_notation, ChessBoard, STANDARD_BOARD_NOTATION};
pub use dense_board::DenseBoard;
pub use error::{ChessError, Result};
pub use game_state::{CastlingRights, GameState, HistoryFrame};
pub use movelist::MoveCollection;
pub use moves::{ComponentKind, Move, MoveComponent};
pub use rules::{
    GameStatus, GenerativeRule, GenerativeRules, MoveGenerator, RestrictiveRule, RuleSet,
};
pub use sparse_board::SparseBoard;
pub use types::{Bounds, ChessPiece, Color, MovementFamily, PieceType, Square};
