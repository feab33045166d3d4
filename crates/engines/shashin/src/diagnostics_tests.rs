use super::*;
use crate::tree::RootMoveStat;
use chess_core::{BoardPosition, Move, Square};

const CASTLING_FEN: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

fn report(stats: Vec<RootMoveStat>) -> MctsReport {
    let best = stats.first().cloned();
    MctsReport {
        best_move: best.as_ref().map(|s| s.mv),
        win_rate: best.as_ref().map_or(0.5, |s| s.win_rate),
        best_visits: best.as_ref().map_or(0, |s| s.visits),
        root_visits: stats.iter().map(|s| s.visits).sum(),
        style: StyleLabel::UltraAggressive,
        iterations: 12,
        tree_nodes: 30,
        max_depth: 4,
        stopped: false,
        eval_failures: 0,
        abstention: None,
        root_stats: stats,
    }
}

fn castle_short() -> RootMoveStat {
    RootMoveStat {
        mv: Move {
            from: Square::E1,
            to: Square::H1,
            promotion: None,
        },
        visits: 8,
        win_rate: 0.625,
    }
}

fn rook_lift() -> RootMoveStat {
    RootMoveStat {
        mv: Move {
            from: Square::A1,
            to: Square::A4,
            promotion: None,
        },
        visits: 4,
        win_rate: 0.5,
    }
}

struct Collect(Vec<ReportSummary>);

impl DiagnosticsSink for Collect {
    fn on_search(&mut self, root: &dyn Position, report: &MctsReport) {
        self.0.push(ReportSummary::new(root, report));
    }
}

#[test]
fn summary_uses_uci_castling() {
    let root = BoardPosition::from_fen(CASTLING_FEN).unwrap();
    let summary = ReportSummary::new(&root, &report(vec![castle_short(), rook_lift()]));
    assert_eq!(summary.best_move.as_deref(), Some("e1g1"));
    assert_eq!(summary.moves[0].uci, "e1g1");
    assert_eq!(summary.moves[1].uci, "a1a4");
    assert_eq!(summary.root_visits, 12);
}

#[test]
fn summary_serializes_to_json() {
    let root = BoardPosition::from_fen(CASTLING_FEN).unwrap();
    let json = ReportSummary::new(&root, &report(vec![castle_short()]))
        .to_json()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["best_move"], "e1g1");
    assert_eq!(value["style"], "ultra_aggressive");
    assert_eq!(value["moves"][0]["move"], "e1g1");
    assert_eq!(value["moves"][0]["visits"], 8);
    assert!(value.get("abstention").is_none());
}

#[test]
fn info_lines_rank_moves() {
    let root = BoardPosition::from_fen(CASTLING_FEN).unwrap();
    let lines = info_lines(&root, &report(vec![castle_short(), rook_lift()]), 1);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("info string MCTS High Tal [FIRE] bestmove e1g1"));
    assert!(lines[0].contains("visits 8/12"));
    assert_eq!(lines[1], "info string MCTS #1 e1g1 visits 8 winrate 0.625");
}

#[test]
fn empty_report_has_headline_only() {
    let root = BoardPosition::startpos();
    let lines = info_lines(&root, &report(Vec::new()), 5);
    assert_eq!(lines, vec!["info string MCTS High Tal [FIRE] no move after 12 iterations"]);
}

#[test]
fn sinks_are_object_safe() {
    let root = BoardPosition::startpos();
    let mut sinks: Vec<Box<dyn DiagnosticsSink>> =
        vec![Box::new(TracingSink), Box::new(Collect(Vec::new()))];
    for sink in &mut sinks {
        sink.on_search(&root, &report(Vec::new()));
    }
}

#[test]
fn collecting_sink_sees_every_report() {
    let root = BoardPosition::from_fen(CASTLING_FEN).unwrap();
    let mut sink = Collect(Vec::new());
    sink.on_search(&root, &report(vec![rook_lift()]));
    sink.on_search(&root, &report(vec![castle_short()]));
    let best: Vec<_> = sink.0.iter().map(|s| s.best_move.clone()).collect();
    assert_eq!(best, vec![Some("a1a4".to_string()), Some("e1g1".to_string())]);
}
