pub mod error;
pub mod eval;
pub mod position;
pub mod search;
pub mod time_control;
pub mod uci;

pub use error::{EvalError, PositionError};
pub use eval::{piece_value, Evaluator, MaterialEvaluator};
pub use position::{square_distance, BoardPosition, Position, STARTPOS_FEN};
pub use search::{pick_best_move, SearchOutcome, MATE_SCORE};
pub use time_control::*;
pub use uci::*;

// Board vocabulary shared by every crate in the workspace.
pub use cozy_chess::{BitBoard, Color, File, Move, Piece, Rank, Square};

// =============================================================================
// Engine trait, implemented by the hybrid Shashin/MCTS engine
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Evaluation score in centipawns from the side to move
    pub score: i32,
    /// Search depth reached (0 when the move came from MCTS)
    pub depth: u8,
    /// Nodes searched, or MCTS iterations completed
    pub nodes: u64,
    /// Whether search was stopped early due to time limit
    pub stopped: bool,
}

/// Trait that all chess engines must implement.
pub trait Engine: Send {
    /// Search `pos` within `limits`.
    fn search(&mut self, pos: &BoardPosition, limits: SearchLimits) -> SearchResult;

    /// Returns the engine's name for UCI identification
    fn name(&self) -> &str;

    /// Returns the engine's author for UCI identification
    fn author(&self) -> &str {
        "ML-chess"
    }

    /// Reset internal state for a new game
    fn new_game(&mut self) {}

    /// Set a UCI option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
