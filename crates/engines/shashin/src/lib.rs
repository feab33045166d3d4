//! Shashin MCTS Engine
//!
//! A position classifier places the root on the Tal/Capablanca/Petrosian
//! scale. Sharp, open positions with many legal moves are searched with a
//! Monte-Carlo tree search tuned to that style; everything else goes to a
//! fixed-depth alpha-beta search.
//!
//! ```no_run
//! use chess_core::{BoardPosition, Engine, SearchLimits};
//! use shashin_engine::{MctsConfig, ShashinEngine};
//!
//! let mut engine = ShashinEngine::new(MctsConfig::default().with_enabled(true));
//! let result = engine.search(&BoardPosition::startpos(), SearchLimits::default());
//! println!("{:?}", result.best_move);
//! ```

pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod node;
pub mod search;
pub mod style;
pub mod tree;
pub mod walker;

pub use classifier::{DynamicFeatures, ShashinClassifier, ShashinState, StaticFeatures};
pub use config::{MctsConfig, SimulationPolicy};
pub use diagnostics::{info_lines, DiagnosticsSink, MoveSummary, ReportSummary, TracingSink};
pub use engine::{win_rate_to_centipawns, ShashinEngine};
pub use error::ConfigError;
pub use node::{Node, NodeId};
pub use search::{run_search, select_root_move, Abstention, MctsReport};
pub use style::{StyleLabel, StyleParams};
pub use tree::{RootMoveStat, SearchTree, TreeStats};
pub use walker::{move_prior, win_probability, MoveStack, TreeWalker};
