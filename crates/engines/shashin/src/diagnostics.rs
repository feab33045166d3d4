//! Reporting of finished MCTS searches.
//!
//! Sinks receive every report that actually ran iterations. Moves are
//! rendered in UCI notation, which needs the root position.

use chess_core::{move_to_uci, Position};
use serde::Serialize;
use tracing::info;

use crate::search::{Abstention, MctsReport};
use crate::style::StyleLabel;

/// Receives every completed search report.
pub trait DiagnosticsSink: Send {
    fn on_search(&mut self, root: &dyn Position, report: &MctsReport);
}

/// One ranked root move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveSummary {
    #[serde(rename = "move")]
    pub uci: String,
    pub visits: u32,
    pub win_rate: f64,
}

/// Serializable view of an [`MctsReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub best_move: Option<String>,
    pub win_rate: f64,
    pub best_visits: u32,
    pub root_visits: u32,
    pub style: StyleLabel,
    pub iterations: u32,
    pub tree_nodes: usize,
    pub max_depth: usize,
    pub stopped: bool,
    pub eval_failures: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstention: Option<Abstention>,
    pub moves: Vec<MoveSummary>,
}

impl ReportSummary {
    pub fn new(root: &dyn Position, report: &MctsReport) -> Self {
        Self {
            best_move: report.best_move.map(|mv| move_to_uci(root, mv)),
            win_rate: report.win_rate,
            best_visits: report.best_visits,
            root_visits: report.root_visits,
            style: report.style,
            iterations: report.iterations,
            tree_nodes: report.tree_nodes,
            max_depth: report.max_depth,
            stopped: report.stopped,
            eval_failures: report.eval_failures,
            abstention: report.abstention,
            moves: report
                .root_stats
                .iter()
                .map(|stat| MoveSummary {
                    uci: move_to_uci(root, stat.mv),
                    visits: stat.visits,
                    win_rate: stat.win_rate,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Human-readable `info string` lines: a headline, then at most `top`
/// ranked root moves.
pub fn info_lines(root: &dyn Position, report: &MctsReport, top: usize) -> Vec<String> {
    let summary = ReportSummary::new(root, report);
    let mut lines = Vec::with_capacity(top + 1);

    match &summary.best_move {
        Some(best) => lines.push(format!(
            "info string MCTS {} bestmove {} winrate {:.3} visits {}/{} nodes {}",
            summary.style,
            best,
            summary.win_rate,
            summary.best_visits,
            summary.root_visits,
            summary.tree_nodes
        )),
        None => lines.push(format!(
            "info string MCTS {} no move after {} iterations",
            summary.style, summary.iterations
        )),
    }
    for (rank, m) in summary.moves.iter().take(top).enumerate() {
        lines.push(format!(
            "info string MCTS #{} {} visits {} winrate {:.3}",
            rank + 1,
            m.uci,
            m.visits,
            m.win_rate
        ));
    }
    lines
}

/// Logs each report as a structured `info!` event.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn on_search(&mut self, root: &dyn Position, report: &MctsReport) {
        let summary = ReportSummary::new(root, report);
        let ranked = summary
            .moves
            .iter()
            .map(|m| format!("{}:{}:{:.3}", m.uci, m.visits, m.win_rate))
            .collect::<Vec<_>>()
            .join(" ");
        info!(
            style = %summary.style,
            best_move = summary.best_move.as_deref().unwrap_or("none"),
            win_rate = summary.win_rate,
            root_visits = summary.root_visits,
            iterations = summary.iterations,
            stopped = summary.stopped,
            %ranked,
            "mcts search"
        );
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod diagnostics_tests;
