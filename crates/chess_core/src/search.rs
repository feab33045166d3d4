//! Fixed-depth negamax used whenever MCTS declines a position.

use cozy_chess::Move;
use tracing::debug;

use crate::eval::Evaluator;
use crate::position::Position;
use crate::time_control::TimeControl;

/// Score of being checkmated at the root; shorter mates score higher.
pub const MATE_SCORE: i32 = 100_000;

const INFINITY: i32 = MATE_SCORE + 1;

/// Result of [`pick_best_move`].
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Best move with its score (None if no legal moves)
    pub best_move: Option<(Move, i32)>,
    pub nodes: u64,
    /// Whether the time limit cut the search short
    pub stopped: bool,
}

struct Negamax<'a> {
    evaluator: &'a dyn Evaluator,
    time_control: &'a TimeControl,
    nodes: u64,
    /// Keys of every position on the current line, root included.
    history: Vec<u64>,
}

/// Alpha-beta search to `depth` plies from `pos`.
///
/// `pos` is mutated during the search and restored before returning.
/// Repetition detection also sees the positions already on `seed_keys`
/// (typically the game history).
pub fn pick_best_move<P: Position>(
    pos: &mut P,
    evaluator: &dyn Evaluator,
    depth: u8,
    time_control: &TimeControl,
    seed_keys: &[u64],
) -> SearchOutcome {
    let moves = pos.legal_moves();
    if moves.is_empty() {
        return SearchOutcome::default();
    }

    let mut history = Vec::with_capacity(seed_keys.len() + depth as usize + 1);
    history.extend_from_slice(seed_keys);
    history.push(pos.hash());

    let mut search = Negamax {
        evaluator,
        time_control,
        nodes: 0,
        history,
    };

    let mut best: Option<(Move, i32)> = None;
    for mv in moves {
        let alpha = best.map_or(-INFINITY, |(_, score)| score);
        pos.do_move(mv);
        search.history.push(pos.hash());
        let score = -search.negamax(pos, depth.saturating_sub(1), -INFINITY, -alpha, 1);
        search.history.pop();
        pos.undo_move(mv);

        // A move searched after the deadline carries a meaningless score.
        if time_control.is_stopped() && best.is_some() {
            break;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }

    let stopped = time_control.is_stopped();
    debug!(
        depth,
        nodes = search.nodes,
        score = best.map(|(_, s)| s),
        stopped,
        "alpha-beta search finished"
    );
    SearchOutcome {
        best_move: best,
        nodes: search.nodes,
        stopped,
    }
}

impl Negamax<'_> {
    fn negamax<P: Position>(
        &mut self,
        pos: &mut P,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ply: i32,
    ) -> i32 {
        self.nodes += 1;
        if self.time_control.should_check_time(self.nodes) && self.time_control.check_time() {
            return 0;
        }
        if self.time_control.is_stopped() {
            return 0;
        }

        // 50-move rule
        if pos.halfmove_clock() >= 100 {
            return 0;
        }
        let key = pos.hash();
        if self.history.iter().filter(|&&k| k == key).count() >= 3 {
            return 0;
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            return if pos.in_check() { -MATE_SCORE + ply } else { 0 };
        }
        if depth == 0 {
            return self.evaluator.evaluate(&*pos).unwrap_or(0);
        }

        let mut best = -INFINITY;
        for mv in moves {
            pos.do_move(mv);
            self.history.push(pos.hash());
            let score = -self.negamax(pos, depth - 1, -beta, -alpha, ply + 1);
            self.history.pop();
            pos.undo_move(mv);

            best = best.max(score);
            alpha = alpha.max(best);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
