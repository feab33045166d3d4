//! UCI command handling, independent of stdin/stdout.

use std::io::{self, Write};
use std::time::Duration;

use chess_core::{move_to_uci, set_position_from_uci, BoardPosition, Engine, SearchLimits};
use shashin_engine::engine::{DEFAULT_FALLBACK_DEPTH, MAX_FALLBACK_DEPTH, MAX_UCI_ITERATIONS};
use shashin_engine::{info_lines, MctsConfig, ReportSummary, ShashinEngine};
use tracing::{debug, warn};

/// Root moves listed after each MCTS search.
const INFO_TOP_MOVES: usize = 5;

pub struct UciSession {
    engine: ShashinEngine,
    pos: BoardPosition,
}

impl UciSession {
    pub fn new(engine: ShashinEngine) -> Self {
        Self {
            engine,
            pos: BoardPosition::startpos(),
        }
    }

    pub fn engine(&self) -> &ShashinEngine {
        &self.engine
    }

    pub fn position(&self) -> &BoardPosition {
        &self.pos
    }

    /// Handle one input line. Returns false once the engine should exit.
    pub fn handle(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Ok(true);
        };

        match command {
            "uci" => self.identify(out)?,
            "isready" => writeln!(out, "readyok")?,
            "setoption" => self.set_option(&parts[1..]),
            "ucinewgame" => {
                self.engine.new_game();
                self.pos = BoardPosition::startpos();
            }
            "position" => {
                if let Err(err) = set_position_from_uci(&mut self.pos, &parts[1..]) {
                    warn!(%err, "rejected position command");
                    writeln!(out, "info string {err}")?;
                }
            }
            "go" => self.go(&parts[1..], out)?,
            "quit" => return Ok(false),
            other => debug!(command = other, "ignoring unknown command"),
        }
        out.flush()?;
        Ok(true)
    }

    fn identify(&self, out: &mut impl Write) -> io::Result<()> {
        let defaults = MctsConfig::default();
        writeln!(out, "id name {}", self.engine.name())?;
        writeln!(out, "id author {}", self.engine.author())?;
        writeln!(out, "option name MCTS type check default {}", defaults.enabled)?;
        writeln!(
            out,
            "option name MCTSIterations type spin default {} min 1 max {MAX_UCI_ITERATIONS}",
            defaults.iterations
        )?;
        writeln!(
            out,
            "option name Depth type spin default {DEFAULT_FALLBACK_DEPTH} min 1 max {MAX_FALLBACK_DEPTH}"
        )?;
        writeln!(out, "option name ShashinConfig type string default <empty>")?;
        writeln!(out, "uciok")
    }

    /// `setoption name <name...> value <value...>`; both parts may contain
    /// spaces.
    fn set_option(&mut self, args: &[&str]) {
        let Some(name_at) = args.iter().position(|&a| a == "name") else {
            return;
        };
        let value_at = args.iter().position(|&a| a == "value");
        let name_end = value_at.unwrap_or(args.len());
        if name_end <= name_at {
            return;
        }
        let name = args[name_at + 1..name_end].join(" ");
        let value = value_at.map(|i| args[i + 1..].join(" ")).unwrap_or_default();

        if !self.engine.set_option(&name, &value) {
            debug!(%name, "unknown option");
        }
    }

    fn go(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        let mut depth = MAX_FALLBACK_DEPTH;
        let mut move_time = None;
        let mut iter = args.iter();
        while let Some(&arg) = iter.next() {
            match arg {
                "depth" => {
                    if let Some(d) = iter.next().and_then(|v| v.parse::<u8>().ok()) {
                        depth = d.max(1);
                    }
                }
                "movetime" => {
                    move_time = iter
                        .next()
                        .and_then(|v| v.parse::<u64>().ok())
                        .map(Duration::from_millis);
                }
                _ => {}
            }
        }
        let limits = match move_time {
            Some(time) => SearchLimits::depth_and_time(depth, time),
            None => SearchLimits::depth(depth),
        };

        let result = self.engine.search(&self.pos, limits);

        if let Some(report) = self.engine.last_report().filter(|r| !r.is_abstention()) {
            for line in info_lines(&self.pos, report, INFO_TOP_MOVES) {
                writeln!(out, "{line}")?;
            }
            match ReportSummary::new(&self.pos, report).to_json() {
                Ok(json) => writeln!(out, "info string json {json}")?,
                Err(err) => warn!(%err, "failed to serialize search report"),
            }
        }
        writeln!(
            out,
            "info depth {} score cp {} nodes {}",
            result.depth, result.score, result.nodes
        )?;

        match result.best_move {
            Some(mv) => writeln!(out, "bestmove {}", move_to_uci(&self.pos, mv)),
            None => writeln!(out, "bestmove 0000"),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
