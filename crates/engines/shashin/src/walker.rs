//! One MCTS iteration: selection, expansion, simulation, backpropagation.
//!
//! The tree never stores positions. Each iteration replays the path it walks
//! onto a single shared position through a [`MoveStack`], which undoes every
//! move it applied when the iteration ends, including on unwind.

use chess_core::{piece_value, Color, Evaluator, Move, Position};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{trace, warn};

use crate::config::{MctsConfig, SimulationPolicy};
use crate::node::NodeId;
use crate::style::StyleParams;
use crate::tree::SearchTree;

/// Prior of a quiet, non-checking move.
pub const BASE_PRIOR: f64 = 0.5;
pub const MAX_PRIOR: f64 = 0.95;

/// Moves applied to a borrowed position, undone in reverse on drop.
pub struct MoveStack<'a, P: Position> {
    pos: &'a mut P,
    moves: Vec<Move>,
}

impl<'a, P: Position> MoveStack<'a, P> {
    pub fn new(pos: &'a mut P) -> Self {
        Self {
            pos,
            moves: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, mv: Move) {
        self.pos.do_move(mv);
        self.moves.push(mv);
    }

    /// Undo the most recent move.
    pub fn pop(&mut self) -> Option<Move> {
        let mv = self.moves.pop()?;
        self.pos.undo_move(mv);
        Some(mv)
    }

    /// Undo everything, returning the position to where the stack started.
    pub fn unwind(&mut self) {
        while self.pop().is_some() {}
    }

    pub fn depth(&self) -> usize {
        self.moves.len()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn position(&self) -> &P {
        &*self.pos
    }
}

impl<P: Position> Drop for MoveStack<'_, P> {
    fn drop(&mut self) {
        self.unwind();
    }
}

/// Node chosen by selection, with the legal moves of its position.
struct Selection {
    node: NodeId,
    legal: Vec<Move>,
}

/// Node to simulate from. `new_move` is set when expansion created it, in
/// which case its move is not yet applied to the position.
#[derive(Debug, Clone, Copy)]
pub struct Expansion {
    pub node: NodeId,
    pub new_move: Option<Move>,
}

/// Static estimate of a move's quality in [0.5, 0.95]: favourable captures,
/// checks and promotions rank first.
pub fn move_prior(pos: &dyn Position, mv: Move) -> f64 {
    let mut prior = BASE_PRIOR;

    if let Some(captured) = pos.captured_piece(mv) {
        let mover = pos.piece_on(mv.from).map_or(0, |(_, piece)| piece_value(piece));
        let gain = f64::from(piece_value(captured)) - f64::from(mover) / 10.0;
        if gain > 0.0 {
            prior += 0.15 + (gain / 500.0).min(0.2);
        } else if gain == 0.0 {
            prior += 0.1;
        }
    }
    if pos.gives_check(mv) {
        prior += 0.12;
    }
    if mv.promotion.is_some() {
        prior += 0.15;
    }
    prior.min(MAX_PRIOR)
}

/// Logistic mapping from centipawns to a win probability.
pub fn win_probability(centipawns: i32) -> f64 {
    1.0 / (1.0 + (-f64::from(centipawns) / 400.0).exp())
}

/// Score of a position without legal moves, for the player `mover` who
/// just moved into it.
fn terminal_score(pos: &dyn Position, mover: Color) -> f64 {
    if !pos.in_check() {
        0.5
    } else if pos.side_to_move() == mover {
        0.0
    } else {
        1.0
    }
}

/// Runs iterations against one tree with fixed parameters.
pub struct TreeWalker<'e> {
    params: StyleParams,
    expansion_factor: f64,
    simulation: SimulationPolicy,
    evaluator: &'e dyn Evaluator,
    rng: StdRng,
    eval_failures: u32,
}

impl<'e> TreeWalker<'e> {
    pub fn new(params: StyleParams, config: &MctsConfig, evaluator: &'e dyn Evaluator) -> Self {
        Self {
            params,
            expansion_factor: config.expansion_factor,
            simulation: config.simulation,
            evaluator,
            rng: StdRng::seed_from_u64(config.seed),
            eval_failures: 0,
        }
    }

    /// Leaf evaluations that failed and were scored as draws.
    pub fn eval_failures(&self) -> u32 {
        self.eval_failures
    }

    /// Run one full iteration. `pos` must be the tree's root position and is
    /// returned to it before this returns.
    pub fn iterate<P: Position>(&mut self, tree: &mut SearchTree, pos: &mut P) -> f64 {
        let mut stack = MoveStack::new(pos);

        let selection = self.select(tree, &mut stack);
        let expansion = self.expand(tree, selection, &mut stack);
        let score = self.simulate(tree, expansion, &mut stack);
        tree.backpropagate(expansion.node, score);

        trace!(
            depth = stack.depth(),
            nodes = tree.len(),
            score,
            "iteration complete"
        );
        stack.unwind();
        score
    }

    /// Children a node with `visits` visits may have before selection
    /// descends instead of widening it.
    pub fn expansion_limit(&self, visits: u32) -> usize {
        let limit = self.expansion_factor * f64::from(visits.max(1)).sqrt();
        (limit as usize).max(1)
    }

    fn select<P: Position>(&self, tree: &SearchTree, stack: &mut MoveStack<'_, P>) -> Selection {
        let mut id = tree.root();
        loop {
            let node = tree.get(id);
            if node.is_terminal() {
                return Selection {
                    node: id,
                    legal: Vec::new(),
                };
            }

            let legal = stack.position().legal_moves();
            if legal.is_empty() {
                node.mark_terminal();
                return Selection { node: id, legal };
            }

            let children = node.children().len();
            let widen = children < self.expansion_limit(node.visits())
                && !node.is_fully_expanded(legal.len());
            if children == 0 || widen {
                return Selection { node: id, legal };
            }

            match tree.best_child(id, self.params.exploration) {
                Some(child) => {
                    if let Some(mv) = tree.get(child).mv() {
                        stack.push(mv);
                    }
                    id = child;
                }
                None => return Selection { node: id, legal },
            }
        }
    }

    fn expand<P: Position>(
        &self,
        tree: &mut SearchTree,
        selection: Selection,
        stack: &mut MoveStack<'_, P>,
    ) -> Expansion {
        let Selection { node, legal } = selection;
        let unchanged = Expansion {
            node,
            new_move: None,
        };
        if tree.get(node).is_terminal() {
            return unchanged;
        }

        let pos = stack.position();
        let mut best: Option<(Move, f64)> = None;
        for mv in legal {
            if tree.has_child_move(node, mv) {
                continue;
            }
            let prior = move_prior(pos, mv);
            if best.map_or(true, |(_, p)| prior > p) {
                best = Some((mv, prior));
            }
        }
        let Some((mv, prior)) = best else {
            return unchanged;
        };

        let child = tree.add_child(node, mv, prior);
        stack.push(mv);
        if stack.position().legal_moves().is_empty() {
            tree.get(child).mark_terminal();
        }
        stack.pop();

        Expansion {
            node: child,
            new_move: Some(mv),
        }
    }

    /// Score of the expanded node in [0, 1] for the side that moved into it.
    fn simulate<P: Position>(
        &mut self,
        tree: &SearchTree,
        expansion: Expansion,
        stack: &mut MoveStack<'_, P>,
    ) -> f64 {
        if let Some(mv) = expansion.new_move {
            stack.push(mv);
        }
        let mover = !stack.position().side_to_move();

        if tree.get(expansion.node).is_terminal() {
            return terminal_score(stack.position(), mover);
        }

        if self.simulation == SimulationPolicy::WeightedPlayout {
            for ply in 0..=self.params.max_sim_depth {
                let moves = stack.position().legal_moves();
                if moves.is_empty() {
                    return terminal_score(stack.position(), mover);
                }
                if ply == self.params.max_sim_depth {
                    break;
                }
                let mv = self.pick_playout_move(stack.position(), &moves);
                stack.push(mv);
            }
        }

        let win = self.leaf_win_probability(stack.position());
        if stack.position().side_to_move() == mover {
            win
        } else {
            1.0 - win
        }
    }

    /// Random move weighted toward captures, checks and promotions.
    fn pick_playout_move(&mut self, pos: &dyn Position, moves: &[Move]) -> Move {
        let weights: Vec<f64> = moves
            .iter()
            .map(|&mv| {
                let mut weight = 1.0;
                if let Some(captured) = pos.captured_piece(mv) {
                    weight += f64::from(piece_value(captured)) / 100.0;
                }
                if pos.gives_check(mv) {
                    weight += 2.0;
                }
                if mv.promotion.is_some() {
                    weight += 5.0;
                }
                weight
            })
            .collect();

        match WeightedIndex::new(&weights) {
            Ok(dist) => moves[dist.sample(&mut self.rng)],
            Err(_) => moves[0],
        }
    }

    /// Win probability for the side to move; a failed evaluation counts as
    /// a draw.
    fn leaf_win_probability(&mut self, pos: &dyn Position) -> f64 {
        match self.evaluator.evaluate(pos) {
            Ok(centipawns) => win_probability(centipawns),
            Err(err) => {
                self.eval_failures += 1;
                if self.eval_failures == 1 {
                    warn!(evaluator = self.evaluator.name(), %err, "leaf evaluation failed, scoring as a draw");
                } else {
                    trace!(%err, "leaf evaluation failed");
                }
                0.5
            }
        }
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod walker_tests;
