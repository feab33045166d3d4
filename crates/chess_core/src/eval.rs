//! Leaf evaluation.

use cozy_chess::{Color, Piece};

use crate::error::EvalError;
use crate::position::Position;

/// Centipawn value of a piece kind. Kings are worth nothing here.
pub const fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

/// Scores a position in centipawns from the side-to-move's perspective.
///
/// Implementations must not mutate the position. They may fail (a network
/// evaluator whose weights are missing, for example); callers decide how to
/// degrade.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, pos: &dyn Position) -> Result<i32, EvalError>;

    fn name(&self) -> &str {
        "evaluator"
    }
}

/// Simple material count.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, pos: &dyn Position) -> Result<i32, EvalError> {
        let score: i32 = Piece::ALL
            .iter()
            .map(|&piece| {
                let white = pos.pieces(Color::White, piece).len() as i32;
                let black = pos.pieces(Color::Black, piece).len() as i32;
                (white - black) * piece_value(piece)
            })
            .sum();

        // Convert to side-to-move
        Ok(match pos.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        })
    }

    fn name(&self) -> &str {
        "material"
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
