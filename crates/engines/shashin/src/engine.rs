//! Hybrid engine: MCTS where the classifier allows it, fixed-depth
//! alpha-beta everywhere else.

use std::path::Path;

use chess_core::{
    pick_best_move, BoardPosition, Engine, Evaluator, MaterialEvaluator, SearchLimits,
    SearchResult,
};
use tracing::{debug, warn};

use crate::classifier::ShashinClassifier;
use crate::config::MctsConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::search::{run_search, MctsReport};

/// Fallback depth used until the `Depth` option is set.
pub const DEFAULT_FALLBACK_DEPTH: u8 = 4;
pub const MAX_FALLBACK_DEPTH: u8 = 8;
pub const MAX_UCI_ITERATIONS: u32 = 100_000;

/// Centipawn equivalent of an MCTS win rate, for `SearchResult::score`.
pub fn win_rate_to_centipawns(win_rate: f64) -> i32 {
    let p = win_rate.clamp(0.001, 0.999);
    (400.0 * (p / (1.0 - p)).ln()).round() as i32
}

pub struct ShashinEngine {
    config: MctsConfig,
    fallback_depth: u8,
    classifier: ShashinClassifier,
    evaluator: Box<dyn Evaluator>,
    last_report: Option<MctsReport>,
    sinks: Vec<Box<dyn DiagnosticsSink>>,
}

impl ShashinEngine {
    /// Material evaluation, MCTS configured by `config`.
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            fallback_depth: DEFAULT_FALLBACK_DEPTH,
            classifier: ShashinClassifier::new(),
            evaluator: Box::new(MaterialEvaluator),
            last_report: None,
            sinks: Vec::new(),
        }
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_fallback_depth(mut self, depth: u8) -> Self {
        self.fallback_depth = depth.clamp(1, MAX_FALLBACK_DEPTH);
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn DiagnosticsSink>) {
        self.sinks.push(sink);
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn fallback_depth(&self) -> u8 {
        self.fallback_depth
    }

    pub fn classifier(&self) -> &ShashinClassifier {
        &self.classifier
    }

    /// Report of the most recent search, abstentions included.
    pub fn last_report(&self) -> Option<&MctsReport> {
        self.last_report.as_ref()
    }

    fn load_config(&mut self, path: &str) {
        match MctsConfig::load(Path::new(path)) {
            Ok(config) => {
                debug!(path, enabled = config.enabled, "loaded mcts config");
                self.config = config;
            }
            Err(err) => warn!(path, %err, "keeping previous mcts config"),
        }
    }

    fn fallback(&self, pos: &mut BoardPosition, limits: &SearchLimits) -> SearchResult {
        let depth = limits.depth.min(self.fallback_depth).max(1);
        let keys: Vec<u64> = pos.previous_keys().collect();
        let outcome = pick_best_move(
            pos,
            self.evaluator.as_ref(),
            depth,
            &limits.time_control,
            &keys,
        );
        SearchResult {
            best_move: outcome.best_move.map(|(mv, _)| mv),
            score: outcome.best_move.map(|(_, s)| s).unwrap_or(0),
            depth,
            nodes: outcome.nodes,
            stopped: outcome.stopped,
        }
    }
}

impl Default for ShashinEngine {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}

impl Engine for ShashinEngine {
    fn search(&mut self, pos: &BoardPosition, limits: SearchLimits) -> SearchResult {
        limits.start();
        let mut work = pos.clone();

        self.classifier.set_static_state(&work);
        let report = run_search(
            &self.classifier,
            &mut work,
            self.evaluator.as_ref(),
            &self.config,
            &limits,
        );

        if !report.is_abstention() {
            for sink in &mut self.sinks {
                sink.on_search(&work, &report);
            }
        }

        let result = match report.best_move {
            Some(mv) => SearchResult {
                best_move: Some(mv),
                score: win_rate_to_centipawns(report.win_rate),
                depth: 0,
                nodes: u64::from(report.iterations),
                stopped: report.stopped,
            },
            None => {
                debug!(abstention = ?report.abstention, "falling back to alpha-beta");
                self.fallback(&mut work, &limits)
            }
        };
        self.last_report = Some(report);
        result
    }

    fn name(&self) -> &str {
        "Shashin MCTS"
    }

    fn new_game(&mut self) {
        self.classifier = ShashinClassifier::new();
        self.last_report = None;
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim();
        match name.to_ascii_lowercase().as_str() {
            "mcts" => match value.to_ascii_lowercase().parse::<bool>() {
                Ok(enabled) => self.config.sync_options(enabled, self.config.iterations),
                Err(_) => warn!(value, "MCTS expects true or false"),
            },
            "mctsiterations" => match value.parse::<u32>() {
                Ok(n) => self
                    .config
                    .sync_options(self.config.enabled, n.clamp(1, MAX_UCI_ITERATIONS)),
                Err(_) => warn!(value, "MCTSIterations expects a number"),
            },
            "depth" => match value.parse::<u8>() {
                Ok(depth) => self.fallback_depth = depth.clamp(1, MAX_FALLBACK_DEPTH),
                Err(_) => warn!(value, "Depth expects a number"),
            },
            "shashinconfig" => self.load_config(value),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
