//! MCTS search driver.
//!
//! Checks the gates, grows one tree for a bounded number of iterations and
//! picks the root move that is both strong and well explored.

use chess_core::{Evaluator, Move, Position, SearchLimits};
use serde::Serialize;
use tracing::debug;

use crate::classifier::ShashinClassifier;
use crate::config::MctsConfig;
use crate::style::StyleLabel;
use crate::tree::{RootMoveStat, SearchTree};
use crate::walker::TreeWalker;

/// Why a search returned no move without running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Abstention {
    /// MCTS is switched off in the configuration.
    Disabled,
    /// The classifier does not consider the position sharp enough.
    NotApplicable,
    /// The iteration budget is zero.
    NoBudget,
    /// The root has no legal moves.
    TerminalRoot,
}

/// Outcome of one [`run_search`] call.
#[derive(Debug, Clone)]
pub struct MctsReport {
    pub best_move: Option<Move>,
    /// Win rate of the chosen move for the side to move, 0.5 without one.
    pub win_rate: f64,
    pub best_visits: u32,
    pub root_visits: u32,
    /// Visited root moves, most visited first.
    pub root_stats: Vec<RootMoveStat>,
    pub style: StyleLabel,
    /// Iterations completed.
    pub iterations: u32,
    pub tree_nodes: usize,
    pub max_depth: usize,
    /// Whether the deadline cut the iteration loop short.
    pub stopped: bool,
    pub eval_failures: u32,
    pub abstention: Option<Abstention>,
}

impl MctsReport {
    fn abstained(reason: Abstention, style: StyleLabel) -> Self {
        Self {
            best_move: None,
            win_rate: 0.5,
            best_visits: 0,
            root_visits: 0,
            root_stats: Vec::new(),
            style,
            iterations: 0,
            tree_nodes: 0,
            max_depth: 0,
            stopped: false,
            eval_failures: 0,
            abstention: Some(reason),
        }
    }

    pub fn is_abstention(&self) -> bool {
        self.abstention.is_some()
    }
}

/// Run MCTS from `pos`, which must be the position `classifier` was last
/// given. `pos` is mutated during the search and restored before returning.
pub fn run_search<P: Position>(
    classifier: &ShashinClassifier,
    pos: &mut P,
    evaluator: &dyn Evaluator,
    config: &MctsConfig,
    limits: &SearchLimits,
) -> MctsReport {
    let style = classifier.style();

    if !config.enabled {
        return MctsReport::abstained(Abstention::Disabled, style);
    }
    if !classifier.is_mcts_applicable() {
        debug!(%style, "position not suited to MCTS");
        return MctsReport::abstained(Abstention::NotApplicable, style);
    }
    let budget = config.iteration_budget();
    if budget == 0 {
        return MctsReport::abstained(Abstention::NoBudget, style);
    }
    if pos.legal_moves().is_empty() {
        return MctsReport::abstained(Abstention::TerminalRoot, style);
    }

    let root_key = pos.hash();
    let params = style.search_params(config.exploration);
    let mut walker = TreeWalker::new(params, config, evaluator);
    let mut tree = SearchTree::new();

    let mut iterations = 0;
    let mut stopped = false;
    while iterations < budget {
        if limits.time_control.check_time() {
            stopped = true;
            break;
        }
        walker.iterate(&mut tree, pos);
        iterations += 1;
    }
    debug_assert_eq!(pos.hash(), root_key, "position not restored after search");

    let root_stats = tree.root_stats();
    let (best_move, win_rate, best_visits) = match select_root_move(&root_stats, iterations, config)
    {
        Some(best) => (Some(best.mv), best.win_rate, best.visits),
        None => (None, 0.5, 0),
    };
    let stats = tree.stats();

    let report = MctsReport {
        best_move,
        win_rate,
        best_visits,
        root_visits: stats.root_visits,
        style,
        iterations,
        tree_nodes: stats.total_nodes,
        max_depth: stats.max_depth,
        stopped,
        eval_failures: walker.eval_failures(),
        abstention: None,
        root_stats,
    };

    debug!(
        %style,
        iterations,
        nodes = report.tree_nodes,
        depth = report.max_depth,
        win_rate = report.win_rate,
        visits = report.best_visits,
        stopped,
        "mcts search finished"
    );
    report
}

/// Pick the root move by win rate plus a confidence term that grows with
/// visits, with a flat bonus for moves that took a fair share of the
/// `iterations` completed. Ties go to the earlier entry.
pub fn select_root_move<'a>(
    stats: &'a [RootMoveStat],
    iterations: u32,
    config: &MctsConfig,
) -> Option<&'a RootMoveStat> {
    let threshold = iterations / config.robustness_divisor.max(1);
    let robust_score = |stat: &RootMoveStat| {
        let mut score =
            stat.win_rate + config.robustness_weight * f64::from(stat.visits).sqrt() / 10.0;
        if stat.visits > threshold {
            score += config.robustness_bonus;
        }
        score
    };

    let mut best: Option<(&RootMoveStat, f64)> = None;
    for stat in stats.iter().filter(|s| s.visits > 0) {
        let score = robust_score(stat);
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((stat, score));
        }
    }
    best.map(|(stat, _)| stat)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
