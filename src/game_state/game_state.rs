//! Core incremental board state representation.
//!
//! `GameState` owns the board, the side to move, castling rights, cached king
//! locations, the en-passant target and the move log. Search mutates a single
//! state in place through `make_move` / `undo_move` pairs, so undo restores
//! every field exactly as it was before the matching make.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{CastlePath, Orientation, BACK_RANK, CASTLE_SIDES};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;
use crate::utils::fen_generator::generate_board_string;
use crate::utils::fen_parser::parse_fen;

/// Outcome of the most recent `get_legal_moves` call at the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Ongoing,
    Checkmate,
    Stalemate,
}

/// Move clocks of the position a game was set up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartClocks {
    pub halfmove: u32,
    pub fullmove: u32,
}

impl Default for StartClocks {
    fn default() -> Self {
        Self { halfmove: 0, fullmove: 1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// Indexed by `Color::index()`.
    pub king_locations: [Square; 2],
    /// Square passed over by the last pawn double step, if any.
    pub en_passant_square: Option<Square>,
    pub orientation: Orientation,

    status: GameStatus,
    start_clocks: StartClocks,
    move_log: Vec<Move>,
    undo_stack: Vec<UndoState>,
}

impl GameState {
    /// Standard starting position with White at the bottom.
    pub fn new_game() -> Self {
        Self::new_game_oriented(Orientation::WhiteBottom)
    }

    /// Standard starting position laid out for `orientation`.
    pub fn new_game_oriented(orientation: Orientation) -> Self {
        let mut board: Board = [[None; 8]; 8];
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as i8;
            for (color, back, pawns) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                let back_sq = orientation.square(file, back);
                let pawn_sq = orientation.square(file, pawns);
                board[back_sq.row as usize][back_sq.col as usize] = Some(Piece::new(color, *kind));
                board[pawn_sq.row as usize][pawn_sq.col as usize] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }

        Self {
            board,
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            king_locations: [orientation.square(4, 0), orientation.square(4, 7)],
            en_passant_square: None,
            orientation,
            status: GameStatus::Ongoing,
            start_clocks: StartClocks::default(),
            move_log: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen, Orientation::WhiteBottom)
    }

    #[inline]
    pub fn from_fen_oriented(fen: &str, orientation: Orientation) -> ChessResult<Self> {
        parse_fen(fen, orientation)
    }

    /// Builds a state from raw parts, locating each king once.
    pub(crate) fn from_parts(
        board: Board,
        side_to_move: Color,
        castling_rights: CastlingRights,
        en_passant_square: Option<Square>,
        orientation: Orientation,
        start_clocks: StartClocks,
    ) -> ChessResult<Self> {
        let mut kings: [Option<Square>; 2] = [None, None];
        for (row, cells) in board.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(Piece { color, kind: PieceKind::King }) = cell {
                    if kings[color.index()].is_some() {
                        return Err(ChessError::InvalidFen(format!("more than one {color:?} king")));
                    }
                    kings[color.index()] = Some(Square::new(row as i8, col as i8));
                }
            }
        }
        let [Some(white_king), Some(black_king)] = kings else {
            return Err(ChessError::InvalidFen("both kings must be on the board".to_owned()));
        };

        Ok(Self {
            board,
            side_to_move,
            castling_rights,
            king_locations: [white_king, black_king],
            en_passant_square,
            orientation,
            status: GameStatus::Ongoing,
            start_clocks,
            move_log: Vec::new(),
            undo_stack: Vec::new(),
        })
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.row as usize][square.col as usize]
    }

    #[inline]
    fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.board[square.row as usize][square.col as usize] = piece;
    }

    #[inline]
    pub fn king_location(&self, color: Color) -> Square {
        self.king_locations[color.index()]
    }

    /// Whether `color`'s king is attacked right now.
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        is_square_attacked(self, self.king_location(color), color.opposite())
    }

    /// Applied moves, oldest first.
    #[inline]
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    /// Clocks of the position before the first logged move.
    #[inline]
    pub fn start_clocks(&self) -> StartClocks {
        self.start_clocks
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.move_log.is_empty()
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn checkmate(&self) -> bool {
        self.status == GameStatus::Checkmate
    }

    #[inline]
    pub fn stalemate(&self) -> bool {
        self.status == GameStatus::Stalemate
    }

    /// Reports the terminal status and marks it consumed, so the same
    /// detection is only ever scored once.
    #[inline]
    pub fn take_terminal_status(&mut self) -> GameStatus {
        std::mem::take(&mut self.status)
    }

    /// Legal moves for the side to move. Also records whether the position
    /// is checkmate or stalemate.
    pub fn get_legal_moves(&mut self) -> Vec<Move> {
        let moves = legal_moves(self);
        self.status = if !moves.is_empty() {
            GameStatus::Ongoing
        } else if self.is_in_check(self.side_to_move) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        };
        moves
    }

    /// Canonical position key: board, side to move, castling rights and
    /// en-passant target. Move counters are not part of it.
    pub fn get_board_string(&self) -> String {
        generate_board_string(self)
    }

    /// Key for repetition counting: the board string, with the en-passant
    /// target dropped unless an en-passant capture is actually legal.
    pub fn repetition_key(&mut self) -> String {
        let capturable = self.en_passant_square.is_some()
            && legal_moves(self).iter().any(|mv| mv.is_en_passant);
        if capturable {
            return generate_board_string(self);
        }
        let en_passant_square = self.en_passant_square.take();
        let key = generate_board_string(self);
        self.en_passant_square = en_passant_square;
        key
    }

    /// Applies a move produced by the generator. The move is not validated.
    pub fn make_move(&mut self, mv: Move) {
        self.undo_stack.push(UndoState {
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_king_locations: self.king_locations,
            prev_status: self.status,
        });

        let mover = mv.piece_moved.color;
        self.set_piece(mv.start, None);
        if mv.is_en_passant {
            self.set_piece(mv.capture_square(), None);
        }
        let placed = if mv.is_pawn_promotion {
            Piece::new(mover, mv.promotion_kind.promotion_or_queen())
        } else {
            mv.piece_moved
        };
        self.set_piece(mv.end, Some(placed));

        if mv.piece_moved.kind == PieceKind::King {
            self.king_locations[mover.index()] = mv.end;
            if mv.is_castle {
                let path = self.castle_path_for(mover, mv.end);
                let rook = self.piece_at(path.rook_from);
                self.set_piece(path.rook_from, None);
                self.set_piece(path.rook_to, rook);
            }
        }

        self.update_castling_rights(&mv);

        self.en_passant_square = if mv.piece_moved.kind == PieceKind::Pawn
            && (mv.end.row - mv.start.row).abs() == 2
        {
            Some(Square::new((mv.start.row + mv.end.row) / 2, mv.start.col))
        } else {
            None
        };

        self.status = GameStatus::Ongoing;
        self.move_log.push(mv);
        self.side_to_move = self.side_to_move.opposite();
    }

    /// Reverts the last move and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the move log is empty. Check [`GameState::can_undo`] first.
    pub fn undo_move(&mut self) -> Move {
        let (Some(mv), Some(undo)) = (self.move_log.pop(), self.undo_stack.pop()) else {
            panic!("undo_move called with an empty move log");
        };

        self.set_piece(mv.start, Some(mv.piece_moved));
        if mv.is_en_passant {
            self.set_piece(mv.end, None);
            self.set_piece(mv.capture_square(), mv.piece_captured);
        } else {
            self.set_piece(mv.end, mv.piece_captured);
        }

        if mv.is_castle {
            let path = self.castle_path_for(mv.piece_moved.color, mv.end);
            let rook = self.piece_at(path.rook_to);
            self.set_piece(path.rook_to, None);
            self.set_piece(path.rook_from, rook);
        }

        self.castling_rights = undo.prev_castling_rights;
        self.en_passant_square = undo.prev_en_passant_square;
        self.king_locations = undo.prev_king_locations;
        self.status = undo.prev_status;
        self.side_to_move = self.side_to_move.opposite();
        mv
    }

    /// Replaces the piece placed by the last move, which must have been a
    /// pawn promotion. Kings and pawns are promoted to a queen instead.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> ChessResult<()> {
        let Some(last) = self.move_log.last_mut() else {
            return Err(ChessError::NoPendingPromotion);
        };
        if !last.is_pawn_promotion {
            return Err(ChessError::NoPendingPromotion);
        }

        last.promotion_kind = kind.promotion_or_queen();
        let promoted = Piece::new(last.piece_moved.color, last.promotion_kind);
        let end = last.end;
        self.set_piece(end, Some(promoted));
        Ok(())
    }

    fn castle_path_for(&self, color: Color, king_to: Square) -> CastlePath {
        let kingside = self.orientation.castle_path(color, CastleSide::Kingside);
        if kingside.king_to == king_to {
            kingside
        } else {
            self.orientation.castle_path(color, CastleSide::Queenside)
        }
    }

    fn update_castling_rights(&mut self, mv: &Move) {
        if mv.piece_moved.kind == PieceKind::King {
            self.castling_rights.clear_color(mv.piece_moved.color);
        }

        // A rook leaving its corner, or anything landing on it, ends that right.
        for color in [Color::White, Color::Black] {
            for side in CASTLE_SIDES {
                let rook_home = self.orientation.castle_path(color, side).rook_from;
                if mv.start == rook_home || mv.end == rook_home {
                    self.castling_rights.clear(color, side);
                }
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}
