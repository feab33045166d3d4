use thiserror::Error;

/// Errors raised while building or mutating a position from external input.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("unparseable move text: {0}")]
    BadMoveText(String),
}

/// Errors a leaf evaluator may report instead of a score.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("evaluation failed: {0}")]
    Failed(String),
}
