use tracing::trace;

use crate::board::{parse_board_notation, ChessBoard, STANDARD_BOARD_NOTATION};
use crate::dense_board::DenseBoard;
use crate::error::{ChessError, Result};
use crate::moves::{Move, MoveComponent};
use crate::types::{ChessPiece, Color, PieceType, Square};

/// Which castling moves are still available. Cleared when the king or the matching corner rook
/// moves, or when something lands on that corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    /// Parses the usual `KQkq` field, `-` for none.
    pub fn from_symbols(symbols: &str) -> Result<CastlingRights> {
        let mut rights = CastlingRights::NONE;
        if symbols == "-" {
            return Ok(rights);
        }
        for c in symbols.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                other => {
                    return Err(ChessError::InvalidNotation(format!(
                        "unknown castling right `{other}`"
                    )))
                }
            }
        }
        Ok(rights)
    }

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn clear(&mut self, color: Color, kingside: bool) {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside = false,
            (Color::White, false) => self.white_queenside = false,
            (Color::Black, true) => self.black_kingside = false,
            (Color::Black, false) => self.black_queenside = false,
        }
    }
}

/// Everything needed to take one move back exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFrame {
    pub mv: Move,
    /// What stood on the destination before the base displacement overwrote it.
    pub displaced: Option<ChessPiece>,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
}

/// The one mutable container of the engine: a board, the side to move, the special-move rights
/// and a stack of applied moves.
///
/// `make_move` pushes a frame and `unmake_last_move` pops it; nothing else changes the state. Not
/// meant to be shared between threads: clone it for each independent line of analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState<B: ChessBoard = DenseBoard> {
    board: B,
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    history: Vec<HistoryFrame>,
}

impl<B: ChessBoard> GameState<B> {
    /// A state with no castling rights, no en passant target and no history.
    pub fn new(board: B, side_to_move: Color) -> Self {
        Self {
            board,
            side_to_move,
            castling_rights: CastlingRights::NONE,
            en_passant_target: None,
            history: Vec::new(),
        }
    }

    /// The standard starting position, white to move, all castling rights.
    pub fn standard() -> Self {
        let board = parse_board_notation(STANDARD_BOARD_NOTATION)
            .expect("the standard board notation is well formed");
        Self::new(board, Color::White).with_castling_rights(CastlingRights::ALL)
    }

    pub fn from_notation(notation: &str, side_to_move: Color) -> Result<Self> {
        Ok(Self::new(parse_board_notation(notation)?, side_to_move))
    }

    pub fn with_castling_rights(mut self, castling_rights: CastlingRights) -> Self {
        self.castling_rights = castling_rights;
        self
    }

    pub fn with_en_passant_target(mut self, target: Option<Square>) -> Self {
        self.en_passant_target = target;
        self
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn is_white_turn(&self) -> bool {
        self.side_to_move.is_white()
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn piece_at(&self, square: Square) -> Result<Option<ChessPiece>> {
        self.board.piece_at(square)
    }

    pub fn squares_with_type_and_color(&self, piece_type: PieceType, color: Color) -> Vec<Square> {
        self.board.squares_with_type_and_color(piece_type, color)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().map(|frame| &frame.mv)
    }

    pub fn history(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|frame| &frame.mv)
    }

    /// Applies `mv`: the base displacement, then every component in order. The side to move
    /// flips and a history frame is pushed. On error the state is left untouched.
    pub fn make_move(&mut self, mv: &Move) -> Result<()> {
        match self.board.piece_at(mv.from)? {
            None => return Err(ChessError::NoPieceAt(mv.from)),
            Some(found) if found != mv.piece => {
                return Err(ChessError::PieceMismatch {
                    square: mv.from,
                    expected: mv.piece,
                    found,
                })
            }
            Some(_) => {}
        }

        let displaced = self.board.piece_at(mv.to)?;
        let mut board = self.board.with_piece_moved(mv.from, mv.to)?;
        for component in mv.components() {
            board = component.apply(&board, mv)?;
        }

        self.history.push(HistoryFrame {
            mv: mv.clone(),
            displaced,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
        });
        self.board = board;
        self.en_passant_target = mv.components().iter().find_map(|c| match c {
            MoveComponent::DoublePawnPush { en_passant_square } => Some(*en_passant_square),
            _ => None,
        });
        self.update_castling_rights(mv);
        self.side_to_move = self.side_to_move.other_color();
        trace!(mv = %mv, depth = self.history.len(), "made move");
        Ok(())
    }

    /// Reverses the most recent move: components last to first, then the base displacement.
    /// Fails with `EmptyHistory` if nothing has been played.
    pub fn unmake_last_move(&mut self) -> Result<Move> {
        let frame = self.history.last().ok_or(ChessError::EmptyHistory)?;
        let mv = &frame.mv;

        let mut board = self.board.clone();
        for component in mv.components().iter().rev() {
            board = component.undo(&board, mv)?;
        }
        board = match frame.displaced {
            Some(piece) => board.with_piece_at(piece, mv.to)?,
            None => board.without_piece_at(mv.to)?,
        };
        board = board.with_piece_at(mv.piece, mv.from)?;

        let castling_rights = frame.castling_rights;
        let en_passant_target = frame.en_passant_target;
        let frame = self.history.pop().ok_or(ChessError::EmptyHistory)?;

        self.board = board;
        self.castling_rights = castling_rights;
        self.en_passant_target = en_passant_target;
        self.side_to_move = self.side_to_move.other_color();
        trace!(mv = %frame.mv, depth = self.history.len(), "unmade move");
        Ok(frame.mv)
    }

    fn update_castling_rights(&mut self, mv: &Move) {
        if self.castling_rights == CastlingRights::NONE {
            return;
        }
        if mv.piece.piece_type == PieceType::King {
            self.castling_rights.clear(mv.piece.color, true);
            self.castling_rights.clear(mv.piece.color, false);
        }
        let bounds = self.board.bounds();
        for color in [Color::White, Color::Black] {
            let row = home_row(color, bounds.last_row());
            for (kingside, corner) in [
                (true, Square::new(bounds.last_column(), row)),
                (false, Square::new(0, row)),
            ] {
                if mv.from == corner || mv.to == corner {
                    self.castling_rights.clear(color, kingside);
                }
            }
        }
    }
}

/// Row the pieces of `color` start on.
pub fn home_row(color: Color, last_row: i32) -> i32 {
    match color {
        Color::White => 0,
        Color::Black => last_row,
    }
}
