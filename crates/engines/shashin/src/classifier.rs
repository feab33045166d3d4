//! Shashin position classifier.
//!
//! A handful of cheap bitboard tests produce [`StaticFeatures`]; boolean
//! combinations of those give [`DynamicFeatures`], a [`StyleLabel`] and the
//! verdict on whether the tree search should be tried at all. The tree search
//! is expensive, so it is reserved for sharp, open positions with a wide
//! choice of moves.

use chess_core::{square_distance, BitBoard, Color, File, Piece, Position, Rank, Square};
use tracing::debug;

use crate::style::StyleLabel;

/// More legal moves than this are needed before MCTS is considered.
pub const MCTS_MIN_LEGAL_MOVES: u32 = 14;

/// Positions with more pieces than this count as materially rich.
pub const HIGH_MATERIAL_PIECES: u32 = 18;

/// Fortress patterns only occur with at most this many pieces.
pub const FORTRESS_MAX_PIECES: u32 = 12;

/// Pieces above this count (with no clear character) mark a complex position.
pub const COMPLEX_MIN_PIECES: u32 = 14;

const RANKS_6_AND_7: BitBoard = BitBoard(0x00FF_FF00_0000_0000);
const RANKS_2_AND_3: BitBoard = BitBoard(0x0000_0000_00FF_FF00);
const FILE_A: u64 = 0x0101_0101_0101_0101;

/// Raw features of one position. "Friendly" means the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticFeatures {
    pub stm_king_exposed: bool,
    pub opponent_king_exposed: bool,
    pub sacrificial: bool,
    pub king_danger: bool,
    pub pawns_near_promotion: bool,
    pub high_material: bool,
    pub fortress: bool,
    pub piece_count: u32,
    pub legal_move_count: u32,
}

/// Flags derived from [`StaticFeatures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DynamicFeatures {
    pub strategic: bool,
    pub aggressive: bool,
    pub tactical: bool,
    pub high_tal: bool,
    pub complex: bool,
    pub mcts_applicable: bool,
}

/// Complete classification of one root position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShashinState {
    pub features: StaticFeatures,
    pub dynamic: DynamicFeatures,
    pub style: StyleLabel,
}

impl StaticFeatures {
    pub fn from_position(pos: &dyn Position) -> Self {
        let us = pos.side_to_move();
        let piece_count = pos.piece_count();
        Self {
            stm_king_exposed: king_exposed(pos, us),
            opponent_king_exposed: king_exposed(pos, !us),
            sacrificial: sacrificial_pattern(pos),
            king_danger: king_danger(pos),
            pawns_near_promotion: pawns_near_promotion(pos),
            high_material: piece_count > HIGH_MATERIAL_PIECES,
            fortress: fortress_pattern(pos),
            piece_count,
            legal_move_count: pos.legal_moves().len() as u32,
        }
    }
}

impl DynamicFeatures {
    pub fn derive(f: &StaticFeatures) -> Self {
        let aggressive =
            f.stm_king_exposed || f.opponent_king_exposed || f.king_danger || f.sacrificial;
        // Not the complement of `aggressive`: a rich position with an airy
        // king but nothing concrete going on is both (Capablanca).
        let strategic = !f.king_danger && !f.sacrificial && f.high_material;
        let tactical = f.king_danger || f.sacrificial || f.pawns_near_promotion;
        let high_tal = f.stm_king_exposed && f.opponent_king_exposed && f.king_danger;
        let complex = f.piece_count > COMPLEX_MIN_PIECES && !strategic && !aggressive;
        let mcts_applicable =
            (high_tal || (aggressive && tactical)) && f.legal_move_count > MCTS_MIN_LEGAL_MOVES;

        Self {
            strategic,
            aggressive,
            tactical,
            high_tal,
            complex,
            mcts_applicable,
        }
    }

    /// Style in priority order; the fortress test only breaks the tie when
    /// the position is neither strategic nor aggressive.
    pub fn style(&self, fortress: bool) -> StyleLabel {
        if self.high_tal {
            StyleLabel::UltraAggressive
        } else if self.aggressive && !self.strategic {
            StyleLabel::Aggressive
        } else if self.strategic && self.aggressive {
            StyleLabel::Balanced
        } else if self.strategic {
            StyleLabel::Strategic
        } else if fortress {
            StyleLabel::Fortress
        } else {
            StyleLabel::Unclassified
        }
    }
}

impl ShashinState {
    pub fn from_position(pos: &dyn Position) -> Self {
        Self::from_features(StaticFeatures::from_position(pos))
    }

    pub fn from_features(features: StaticFeatures) -> Self {
        let dynamic = DynamicFeatures::derive(&features);
        Self {
            features,
            dynamic,
            style: dynamic.style(features.fortress),
        }
    }
}

/// Caches the classification of the current root position.
///
/// Readers report "not applicable" and [`StyleLabel::Unclassified`] until
/// [`ShashinClassifier::set_static_state`] has been called.
#[derive(Debug, Clone, Default)]
pub struct ShashinClassifier {
    state: Option<ShashinState>,
}

impl ShashinClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `pos` and cache the result.
    pub fn set_static_state(&mut self, pos: &dyn Position) {
        self.set_state(ShashinState::from_position(pos));
    }

    /// Install a precomputed feature snapshot.
    pub fn set_features(&mut self, features: StaticFeatures) {
        self.set_state(ShashinState::from_features(features));
    }

    fn set_state(&mut self, state: ShashinState) {
        debug!(
            style = %state.style,
            applicable = state.dynamic.mcts_applicable,
            legal_moves = state.features.legal_move_count,
            pieces = state.features.piece_count,
            king_danger = state.features.king_danger,
            sacrificial = state.features.sacrificial,
            "classified position"
        );
        self.state = Some(state);
    }

    pub fn state(&self) -> Option<&ShashinState> {
        self.state.as_ref()
    }

    pub fn is_mcts_applicable(&self) -> bool {
        self.state.is_some_and(|s| s.dynamic.mcts_applicable)
    }

    pub fn style(&self) -> StyleLabel {
        self.state.map(|s| s.style).unwrap_or_default()
    }

    /// Whether a wider, exploratory search is worth it: either a complex
    /// position without clear character or a rich balanced one.
    pub fn is_exploration_applicable(&self) -> bool {
        self.state.is_some_and(|s| {
            s.dynamic.complex || (s.features.high_material && s.style.is_capablanca())
        })
    }
}

// =============================================================================
// Feature tests
// =============================================================================

fn square_at(file: i32, rank: i32) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::new(File::index(file as usize), Rank::index(rank as usize)))
    } else {
        None
    }
}

/// Squares adjacent to `sq`.
fn king_zone(sq: Square) -> BitBoard {
    let (file, rank) = (sq.file() as i32, sq.rank() as i32);
    let mut zone = BitBoard::EMPTY;
    for df in -1..=1 {
        for dr in -1..=1 {
            if df == 0 && dr == 0 {
                continue;
            }
            if let Some(s) = square_at(file + df, rank + dr) {
                zone = zone | s.bitboard();
            }
        }
    }
    zone
}

/// The king's file and its neighbours.
fn king_files(file: i32) -> BitBoard {
    let mask = (file - 1..=file + 1)
        .filter(|f| (0..8).contains(f))
        .fold(0u64, |acc, f| acc | (FILE_A << f));
    BitBoard(mask)
}

/// A king is exposed when it has left its first three ranks, when no own pawn
/// stands directly in front of it, or when no pawn of either color is left on
/// its file and the adjacent files.
pub fn king_exposed(pos: &dyn Position, color: Color) -> bool {
    let king = pos.king(color);
    let (file, rank) = (king.file() as i32, king.rank() as i32);
    let (relative_rank, forward) = match color {
        Color::White => (rank, 1),
        Color::Black => (7 - rank, -1),
    };
    if relative_rank > 2 {
        return true;
    }

    let own_pawns = pos.pieces(color, Piece::Pawn);
    let shielded = (-1..=1)
        .filter_map(|df| square_at(file + df, rank + forward))
        .any(|sq| own_pawns.has(sq));
    if !shielded {
        return true;
    }

    let pawns = pos.pieces(Color::White, Piece::Pawn) | pos.pieces(Color::Black, Piece::Pawn);
    (pawns & king_files(file)).is_empty()
}

/// Two friendly pieces next to the enemy king, or a friendly queen within
/// three king steps of it.
pub fn sacrificial_pattern(pos: &dyn Position) -> bool {
    let us = pos.side_to_move();
    let their_king = pos.king(!us);
    if (king_zone(their_king) & pos.colors(us)).len() >= 2 {
        return true;
    }
    pos.pieces(us, Piece::Queen)
        .into_iter()
        .any(|queen| square_distance(queen, their_king) <= 3)
}

/// At least two enemy knights, bishops, rooks or queens hit the squares
/// around the friendly king.
pub fn king_danger(pos: &dyn Position) -> bool {
    let us = pos.side_to_move();
    let them = !us;
    let heavy_and_minor = pos.pieces(them, Piece::Knight)
        | pos.pieces(them, Piece::Bishop)
        | pos.pieces(them, Piece::Rook)
        | pos.pieces(them, Piece::Queen);

    let attackers = king_zone(pos.king(us))
        .into_iter()
        .fold(BitBoard::EMPTY, |acc, sq| acc | pos.attackers_to(sq, them));
    (attackers & heavy_and_minor).len() >= 2
}

/// A white pawn on rank 6 or 7, or a black pawn on rank 2 or 3.
pub fn pawns_near_promotion(pos: &dyn Position) -> bool {
    !(pos.pieces(Color::White, Piece::Pawn) & RANKS_6_AND_7).is_empty()
        || !(pos.pieces(Color::Black, Piece::Pawn) & RANKS_2_AND_3).is_empty()
}

/// Few pieces left and either a locked pawn structure or a bishop pair with
/// almost no pawns.
pub fn fortress_pattern(pos: &dyn Position) -> bool {
    if pos.piece_count() > FORTRESS_MAX_PIECES {
        return false;
    }
    let pawns = pos.pieces(Color::White, Piece::Pawn) | pos.pieces(Color::Black, Piece::Pawn);
    let blocked = BitBoard((pawns.0 << 8) | (pawns.0 >> 8)) & pos.occupied();
    blocked.len() >= 4 || (pos.count(Piece::Bishop) >= 2 && pawns.len() <= 4)
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod classifier_tests;
