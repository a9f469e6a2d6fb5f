//! Core value types shared by the rules and search engines.
//!
//! The board is an 8x8 mailbox addressed by `(row, col)`. Row 0 is the top
//! edge of the board as displayed; which rank that is depends on the game's
//! `Orientation` (see `chess_rules`).

pub use crate::game_state::game_state::{GameState, GameStatus};
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// `+1.0` for White, `-1.0` for Black. Used as the negamax turn multiplier.
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Color::White => 1.0,
            Color::Black => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Kinds a pawn may promote to. Anything else falls back to a queen.
    #[inline]
    pub const fn promotion_or_queen(self) -> Self {
        match self {
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => self,
            PieceKind::Pawn | PieceKind::King => PieceKind::Queen,
        }
    }

    /// Minor and major pieces, the ones counted for mobility.
    #[inline]
    pub const fn is_minor_or_major(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A colored piece. Empty squares are `None` on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    #[inline]
    pub fn fen_char(self) -> char {
        let ch = self.kind.symbol();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };
        PieceKind::from_symbol(ch).map(|kind| Piece::new(color, kind))
    }

    /// Two-symbol code such as `wK` or `bp`.
    pub fn code(self) -> String {
        let color = match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let kind = match self.kind {
            PieceKind::Pawn => 'p',
            other => other.symbol().to_ascii_uppercase(),
        };
        format!("{color}{kind}")
    }
}

/// Board coordinate. Both fields are in `0..8` for on-board squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    #[inline]
    pub const fn is_on_board(self) -> bool {
        self.row >= 0 && self.row < 8 && self.col >= 0 && self.col < 8
    }

    /// The square `(d_row, d_col)` away, if it is still on the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let next = Square::new(self.row + d_row, self.col + d_col);
        if next.is_on_board() {
            Some(next)
        } else {
            None
        }
    }
}

pub type Board = [[Option<Piece>; 8]; 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

pub const CASTLE_WHITE_KINGSIDE: u8 = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: u8 = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: u8 = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: u8 = 1 << 3;

/// The four castling-rights booleans, packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights(
        CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE | CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
    );
    pub const NONE: CastlingRights = CastlingRights(0);

    #[inline]
    const fn bit(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => CASTLE_WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => CASTLE_WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => CASTLE_BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => CASTLE_BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit(color, side);
    }

    #[inline]
    pub fn clear(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::bit(color, side);
    }

    #[inline]
    pub fn clear_color(&mut self, color: Color) {
        self.clear(color, CastleSide::Kingside);
        self.clear(color, CastleSide::Queenside);
    }

    /// True once neither castling right remains for `color`.
    #[inline]
    pub const fn exhausted(self, color: Color) -> bool {
        !self.has(color, CastleSide::Kingside) && !self.has(color, CastleSide::Queenside)
    }
}
