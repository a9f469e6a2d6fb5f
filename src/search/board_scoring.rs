//! Pluggable board evaluation interfaces and the positional evaluator.
//!
//! Scores are from White's point of view: positive favors White. Search
//! applies the side-to-move sign itself.

use crate::game_state::chess_rules::Orientation;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::legal_moves_for;

pub type Score = f64;

pub const MATE_SCORE: Score = 1000.0;
pub const STALEMATE_SCORE: Score = 0.0;

pub trait BoardScorer: Send + Sync {
    /// Score from White's perspective.
    ///
    /// Takes the state mutably: a checkmate or stalemate recorded by the last
    /// `get_legal_moves` call is consumed here, and mobility probes moves.
    fn score(&self, game_state: &mut GameState) -> Score;
}

#[inline]
pub const fn piece_value(kind: PieceKind) -> Score {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight | PieceKind::Bishop => 3.0,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
        PieceKind::King => 0.0,
    }
}

pub type SquareTable = [[u8; 8]; 8];

pub const KNIGHT_SCORES: SquareTable = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 3, 3, 3, 3, 2, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 2, 3, 3, 3, 3, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

pub const BISHOP_SCORES: SquareTable = [
    [4, 3, 2, 1, 1, 2, 3, 4],
    [3, 4, 3, 2, 2, 3, 4, 3],
    [2, 3, 4, 3, 3, 4, 3, 2],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [2, 3, 4, 3, 3, 4, 3, 2],
    [3, 4, 3, 2, 2, 3, 4, 3],
    [4, 3, 2, 1, 1, 2, 3, 4],
];

pub const QUEEN_SCORES: SquareTable = [
    [1, 1, 1, 3, 1, 1, 1, 1],
    [1, 2, 3, 3, 3, 1, 1, 1],
    [1, 4, 3, 3, 3, 4, 2, 1],
    [1, 2, 3, 3, 3, 2, 2, 1],
    [1, 2, 3, 3, 3, 2, 2, 1],
    [1, 4, 3, 3, 3, 4, 2, 1],
    [1, 1, 2, 3, 3, 1, 1, 1],
    [1, 1, 1, 3, 1, 1, 1, 1],
];

pub const ROOK_SCORES: SquareTable = [
    [4, 3, 4, 4, 4, 4, 3, 4],
    [4, 4, 4, 4, 4, 4, 4, 4],
    [1, 1, 2, 3, 3, 2, 1, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 1, 2, 2, 2, 2, 1, 1],
    [4, 4, 4, 4, 4, 4, 4, 4],
    [4, 3, 2, 1, 1, 2, 3, 4],
];

/// Pawn table for pawns advancing toward row 0.
pub const UPWARD_PAWN_SCORES: SquareTable = [
    [8, 8, 8, 8, 8, 8, 8, 8],
    [8, 8, 8, 8, 8, 8, 8, 8],
    [5, 6, 6, 7, 7, 6, 6, 5],
    [2, 3, 3, 5, 5, 3, 3, 2],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [1, 1, 2, 3, 3, 2, 1, 1],
    [1, 1, 1, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

/// Pawn table for pawns advancing toward row 7.
pub const DOWNWARD_PAWN_SCORES: SquareTable = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 0, 0, 1, 1, 1],
    [1, 1, 2, 3, 3, 2, 1, 1],
    [1, 2, 3, 4, 4, 3, 2, 1],
    [2, 3, 3, 5, 5, 3, 3, 2],
    [5, 6, 6, 7, 7, 6, 6, 5],
    [8, 8, 8, 8, 8, 8, 8, 8],
    [8, 8, 8, 8, 8, 8, 8, 8],
];

const PLACEMENT_WEIGHT: Score = 0.1;
const CENTER_WEIGHT: Score = 0.1;
const EXTENDED_CENTER_WEIGHT: Score = 0.05;
const ISOLATED_PAWN_PENALTY: Score = 0.5;
const CONNECTED_PAWN_BONUS: Score = 0.2;
const PASSED_PAWN_BONUS: Score = 0.5;
const PASSED_PAWN_ENDGAME_BONUS: Score = 1.0;
const CENTRAL_KING_PENALTY: Score = 0.5;
const CASTLING_SPENT_BONUS: Score = 0.5;
const MOBILITY_PER_MOVE: Score = 0.1;
const BISHOP_PAIR_BONUS: Score = 0.5;
const OPEN_FILE_ROOK_BONUS: Score = 0.5;

pub const CENTER_SQUARES: [Square; 4] = [
    Square::new(3, 3),
    Square::new(3, 4),
    Square::new(4, 3),
    Square::new(4, 4),
];

pub const EXTENDED_CENTER_SQUARES: [Square; 12] = [
    Square::new(2, 2),
    Square::new(2, 3),
    Square::new(2, 4),
    Square::new(2, 5),
    Square::new(3, 2),
    Square::new(3, 5),
    Square::new(4, 2),
    Square::new(4, 5),
    Square::new(5, 2),
    Square::new(5, 3),
    Square::new(5, 4),
    Square::new(5, 5),
];

/// Coarse game stage from remaining non-king material, in pawn units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl GamePhase {
    pub fn from_material(total: Score) -> Self {
        if total < 20.0 {
            GamePhase::Endgame
        } else if total < 40.0 {
            GamePhase::Middlegame
        } else {
            GamePhase::Opening
        }
    }

    pub fn of(board: &Board) -> Self {
        let total = board
            .iter()
            .flatten()
            .flatten()
            .map(|piece| piece_value(piece.kind))
            .sum();
        Self::from_material(total)
    }
}

/// Which pawn table belongs to which color.
///
/// Piece tables are indexed by board row and column, so the pawn tables
/// depend on which way each color advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSquareTables {
    pub white_pawn: &'static SquareTable,
    pub black_pawn: &'static SquareTable,
}

impl PieceSquareTables {
    pub const fn for_orientation(orientation: Orientation) -> Self {
        match orientation {
            Orientation::WhiteBottom => Self {
                white_pawn: &UPWARD_PAWN_SCORES,
                black_pawn: &DOWNWARD_PAWN_SCORES,
            },
            Orientation::BlackBottom => Self {
                white_pawn: &DOWNWARD_PAWN_SCORES,
                black_pawn: &UPWARD_PAWN_SCORES,
            },
        }
    }

    #[inline]
    pub fn value(&self, piece: Piece, square: Square) -> u8 {
        let table = match (piece.kind, piece.color) {
            (PieceKind::King, _) => return 0,
            (PieceKind::Pawn, Color::White) => self.white_pawn,
            (PieceKind::Pawn, Color::Black) => self.black_pawn,
            (PieceKind::Knight, _) => &KNIGHT_SCORES,
            (PieceKind::Bishop, _) => &BISHOP_SCORES,
            (PieceKind::Rook, _) => &ROOK_SCORES,
            (PieceKind::Queen, _) => &QUEEN_SCORES,
        };
        table[square.row as usize][square.col as usize]
    }
}

impl Default for PieceSquareTables {
    fn default() -> Self {
        Self::for_orientation(Orientation::WhiteBottom)
    }
}

/// Plain material balance. Cheap enough for exhaustive search tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &mut GameState) -> Score {
        match game_state.take_terminal_status() {
            GameStatus::Checkmate => return -game_state.side_to_move.sign() * MATE_SCORE,
            GameStatus::Stalemate => return STALEMATE_SCORE,
            GameStatus::Ongoing => {}
        }
        let mut totals = [0.0; 2];
        for piece in game_state.board.iter().flatten().flatten() {
            totals[piece.color.index()] += piece_value(piece.kind);
        }
        totals[0] - totals[1]
    }
}

/// Each evaluation term as White's total minus Black's.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub material: Score,
    pub placement: Score,
    pub center_control: Score,
    pub pawn_structure: Score,
    pub king_safety: Score,
    pub mobility: Score,
    pub coordination: Score,
}

impl ScoreBreakdown {
    pub fn total(&self) -> Score {
        self.material
            + self.placement
            + self.center_control
            + self.pawn_structure
            + self.king_safety
            + self.mobility
            + self.coordination
    }
}

/// Material, placement, center, pawn structure, king safety, mobility and
/// piece coordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalScorer {
    tables: PieceSquareTables,
}

impl PositionalScorer {
    pub const fn new(tables: PieceSquareTables) -> Self {
        Self { tables }
    }

    pub const fn for_orientation(orientation: Orientation) -> Self {
        Self::new(PieceSquareTables::for_orientation(orientation))
    }

    /// All non-terminal terms. Leaves the terminal status untouched.
    pub fn breakdown(&self, game_state: &mut GameState) -> ScoreBreakdown {
        let phase = GamePhase::of(&game_state.board);
        let (material, placement) = self.material_and_placement(&game_state.board);
        ScoreBreakdown {
            material: difference(material),
            placement: difference(placement),
            center_control: difference(center_control(&game_state.board)),
            pawn_structure: difference(pawn_structure(
                &game_state.board,
                game_state.orientation,
                phase,
            )),
            king_safety: difference(king_safety(game_state, phase)),
            mobility: difference(mobility(game_state)),
            coordination: difference(piece_coordination(&game_state.board)),
        }
    }

    fn material_and_placement(&self, board: &Board) -> ([Score; 2], [Score; 2]) {
        let mut material = [0.0; 2];
        let mut placement = [0.0; 2];
        for (square, piece) in occupied(board) {
            let side = piece.color.index();
            material[side] += piece_value(piece.kind);
            placement[side] += Score::from(self.tables.value(piece, square)) * PLACEMENT_WEIGHT;
        }
        (material, placement)
    }
}

impl BoardScorer for PositionalScorer {
    fn score(&self, game_state: &mut GameState) -> Score {
        match game_state.take_terminal_status() {
            // The side to move has been mated.
            GameStatus::Checkmate => return -game_state.side_to_move.sign() * MATE_SCORE,
            GameStatus::Stalemate => return STALEMATE_SCORE,
            GameStatus::Ongoing => {}
        }
        self.breakdown(game_state).total()
    }
}

#[inline]
fn difference(per_color: [Score; 2]) -> Score {
    per_color[Color::White.index()] - per_color[Color::Black.index()]
}

fn occupied(board: &Board) -> impl Iterator<Item = (Square, Piece)> + '_ {
    board.iter().enumerate().flat_map(|(row, cells)| {
        cells.iter().enumerate().filter_map(move |(col, cell)| {
            cell.map(|piece| (Square::new(row as i8, col as i8), piece))
        })
    })
}

fn center_control(board: &Board) -> [Score; 2] {
    let mut totals = [0.0; 2];
    for (square, piece) in occupied(board) {
        let value = piece_value(piece.kind);
        if CENTER_SQUARES.contains(&square) {
            totals[piece.color.index()] += value * CENTER_WEIGHT;
        } else if EXTENDED_CENTER_SQUARES.contains(&square) {
            totals[piece.color.index()] += value / 2.0 * EXTENDED_CENTER_WEIGHT;
        }
    }
    totals
}

/// Pawn rows per column, per color.
fn pawn_files(board: &Board) -> [[Vec<i8>; 8]; 2] {
    let mut files: [[Vec<i8>; 8]; 2] = Default::default();
    for (square, piece) in occupied(board) {
        if piece.kind == PieceKind::Pawn {
            files[piece.color.index()][square.col as usize].push(square.row);
        }
    }
    files
}

fn pawn_structure(board: &Board, orientation: Orientation, phase: GamePhase) -> [Score; 2] {
    let files = pawn_files(board);
    let passed_bonus = if phase == GamePhase::Endgame {
        PASSED_PAWN_ENDGAME_BONUS
    } else {
        PASSED_PAWN_BONUS
    };

    let mut totals = [0.0; 2];
    for color in [Color::White, Color::Black] {
        let own = &files[color.index()];
        let enemy = &files[color.opposite().index()];
        let step = orientation.pawn_step(color);
        let promotion_row = orientation.promotion_row(color);

        for col in 0..8usize {
            let Some(front) = most_advanced(&own[col], step) else {
                continue;
            };

            // Edge-file pawns are never isolated.
            let isolated = col > 0 && own[col - 1].is_empty() && col < 7 && own[col + 1].is_empty();
            totals[color.index()] += if isolated {
                -ISOLATED_PAWN_PENALTY
            } else {
                CONNECTED_PAWN_BONUS
            };

            let low_col = col.saturating_sub(1);
            let high_col = (col + 1).min(7);
            let (low_row, high_row) = if step < 0 {
                (promotion_row, front)
            } else {
                (front, promotion_row)
            };
            let blocked = enemy[low_col..=high_col]
                .iter()
                .flatten()
                .any(|row| (low_row..=high_row).contains(row));
            if !blocked {
                totals[color.index()] += passed_bonus;
            }
        }
    }
    totals
}

/// Row of the pawn furthest along in direction `step`.
fn most_advanced(rows: &[i8], step: i8) -> Option<i8> {
    if step < 0 {
        rows.iter().copied().min()
    } else {
        rows.iter().copied().max()
    }
}

fn king_safety(game_state: &GameState, phase: GamePhase) -> [Score; 2] {
    let mut totals = [0.0; 2];
    for color in [Color::White, Color::Black] {
        let king = game_state.king_location(color);
        if phase != GamePhase::Endgame && (2..=5).contains(&king.row) && (2..=5).contains(&king.col) {
            totals[color.index()] -= CENTRAL_KING_PENALTY;
        }
        if game_state.castling_rights.exhausted(color) {
            totals[color.index()] += CASTLING_SPENT_BONUS;
        }
    }
    totals
}

fn mobility(game_state: &mut GameState) -> [Score; 2] {
    let mut totals = [0.0; 2];
    for color in [Color::White, Color::Black] {
        let count = legal_moves_for(game_state, color)
            .iter()
            .filter(|mv| mv.piece_moved.kind.is_minor_or_major())
            .count();
        totals[color.index()] = count as Score * MOBILITY_PER_MOVE;
    }
    totals
}

fn piece_coordination(board: &Board) -> [Score; 2] {
    let mut totals = [0.0; 2];
    let mut bishops = [0usize; 2];
    let mut pawn_on_file = [false; 8];
    for (square, piece) in occupied(board) {
        match piece.kind {
            PieceKind::Bishop => bishops[piece.color.index()] += 1,
            PieceKind::Pawn => pawn_on_file[square.col as usize] = true,
            _ => {}
        }
    }

    for color in [Color::White, Color::Black] {
        if bishops[color.index()] >= 2 {
            totals[color.index()] += BISHOP_PAIR_BONUS;
        }
    }
    for (square, piece) in occupied(board) {
        if piece.kind == PieceKind::Rook && !pawn_on_file[square.col as usize] {
            totals[piece.color.index()] += OPEN_FILE_ROOK_BONUS;
        }
    }
    totals
}
