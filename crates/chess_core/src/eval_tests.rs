use super::*;
use crate::position::BoardPosition;

#[test]
fn startpos_is_balanced() {
    let pos = BoardPosition::startpos();
    assert_eq!(MaterialEvaluator.evaluate(&pos).unwrap(), 0);
}

#[test]
fn score_is_from_side_to_move() {
    // White is a queen up
    let white_to_move = BoardPosition::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
    let black_to_move = BoardPosition::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();

    assert_eq!(MaterialEvaluator.evaluate(&white_to_move).unwrap(), 900);
    assert_eq!(MaterialEvaluator.evaluate(&black_to_move).unwrap(), -900);
}

#[test]
fn piece_values_are_ordered() {
    assert!(piece_value(Piece::Pawn) < piece_value(Piece::Knight));
    assert!(piece_value(Piece::Knight) < piece_value(Piece::Bishop));
    assert!(piece_value(Piece::Rook) < piece_value(Piece::Queen));
    assert_eq!(piece_value(Piece::King), 0);
}
