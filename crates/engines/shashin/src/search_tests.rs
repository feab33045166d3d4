use super::*;
use crate::classifier::StaticFeatures;
use chess_core::{BoardPosition, MaterialEvaluator, Square};

const BACK_RANK_FEN: &str = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";

fn stat(from: Square, to: Square, visits: u32, win_rate: f64) -> RootMoveStat {
    RootMoveStat {
        mv: Move {
            from,
            to,
            promotion: None,
        },
        visits,
        win_rate,
    }
}

/// Classifier forced into the sharpest style regardless of the position.
fn sharp_classifier() -> ShashinClassifier {
    let mut classifier = ShashinClassifier::new();
    classifier.set_features(StaticFeatures {
        stm_king_exposed: true,
        opponent_king_exposed: true,
        king_danger: true,
        legal_move_count: 20,
        ..StaticFeatures::default()
    });
    classifier
}

#[test]
fn robustness_favours_well_explored_moves() {
    let config = MctsConfig::default();
    let stats = [
        stat(Square::E2, Square::E4, 10, 0.60),
        stat(Square::D2, Square::D4, 50, 0.55),
    ];
    let best = select_root_move(&stats, 60, &config).unwrap();
    assert_eq!(best.visits, 50);
}

#[test]
fn clear_winner_beats_visit_count() {
    let config = MctsConfig::default();
    let stats = [
        stat(Square::E2, Square::E4, 40, 0.40),
        stat(Square::D2, Square::D4, 20, 0.90),
    ];
    let best = select_root_move(&stats, 60, &config).unwrap();
    assert_eq!(best.visits, 20);
}

#[test]
fn unvisited_and_empty_stats_give_no_move() {
    let config = MctsConfig::default();
    assert!(select_root_move(&[], 10, &config).is_none());
    let stats = [stat(Square::E2, Square::E4, 0, 1.0)];
    assert!(select_root_move(&stats, 10, &config).is_none());
}

#[test]
fn disabled_search_abstains_first() {
    let mut pos = BoardPosition::from_fen(BACK_RANK_FEN).unwrap();
    let config = MctsConfig::for_testing().with_enabled(false);
    let report = run_search(
        &sharp_classifier(),
        &mut pos,
        &MaterialEvaluator,
        &config,
        &SearchLimits::default(),
    );
    assert_eq!(report.abstention, Some(Abstention::Disabled));
    assert!(report.best_move.is_none());
    assert_eq!(report.win_rate, 0.5);
    assert_eq!(report.tree_nodes, 0);
}

#[test]
fn unclassified_position_is_not_applicable() {
    let mut pos = BoardPosition::startpos();
    let report = run_search(
        &ShashinClassifier::new(),
        &mut pos,
        &MaterialEvaluator,
        &MctsConfig::for_testing(),
        &SearchLimits::default(),
    );
    assert_eq!(report.abstention, Some(Abstention::NotApplicable));
    assert_eq!(report.style, StyleLabel::Unclassified);
}

#[test]
fn zero_budget_abstains() {
    let mut pos = BoardPosition::from_fen(BACK_RANK_FEN).unwrap();
    let config = MctsConfig::for_testing().with_iterations(0);
    let report = run_search(
        &sharp_classifier(),
        &mut pos,
        &MaterialEvaluator,
        &config,
        &SearchLimits::default(),
    );
    assert_eq!(report.abstention, Some(Abstention::NoBudget));
}

#[test]
fn mated_root_abstains() {
    let mut pos = BoardPosition::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
    let report = run_search(
        &sharp_classifier(),
        &mut pos,
        &MaterialEvaluator,
        &MctsConfig::for_testing(),
        &SearchLimits::default(),
    );
    assert_eq!(report.abstention, Some(Abstention::TerminalRoot));
    assert!(report.best_move.is_none());
}

#[test]
fn finds_back_rank_mate() {
    let mut pos = BoardPosition::from_fen(BACK_RANK_FEN).unwrap();
    let key = pos.hash();
    let report = run_search(
        &sharp_classifier(),
        &mut pos,
        &MaterialEvaluator,
        &MctsConfig::for_testing(),
        &SearchLimits::default(),
    );

    assert_eq!(pos.hash(), key);
    assert!(report.abstention.is_none());
    assert_eq!(report.style, StyleLabel::UltraAggressive);
    assert_eq!(
        report.best_move,
        Some(Move {
            from: Square::A1,
            to: Square::A8,
            promotion: None,
        })
    );
    assert_eq!(report.win_rate, 1.0);
    assert_eq!(report.iterations, 100);
    assert_eq!(report.root_visits, 100);
}

#[test]
fn stopped_clock_runs_no_iterations() {
    let mut pos = BoardPosition::from_fen(BACK_RANK_FEN).unwrap();
    let limits = SearchLimits::default();
    limits.time_control.stop();

    let report = run_search(
        &sharp_classifier(),
        &mut pos,
        &MaterialEvaluator,
        &MctsConfig::for_testing(),
        &limits,
    );
    assert!(report.stopped);
    assert!(report.abstention.is_none());
    assert_eq!(report.iterations, 0);
    assert!(report.best_move.is_none());
    assert_eq!(report.win_rate, 0.5);
}

#[test]
fn budget_is_capped() {
    let mut pos = BoardPosition::from_fen(BACK_RANK_FEN).unwrap();
    let config = MctsConfig::for_testing().with_iterations(5000);
    let report = run_search(
        &sharp_classifier(),
        &mut pos,
        &MaterialEvaluator,
        &config,
        &SearchLimits::default(),
    );
    assert_eq!(report.iterations, config.max_iterations);
}
