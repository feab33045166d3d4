use super::*;
use cozy_chess::Color;

#[test]
fn square_names_round_trip() {
    assert_eq!(square_name(Square::A1), "a1");
    assert_eq!(square_name(Square::H8), "h8");
    assert_eq!(parse_square("e4"), Some(Square::E4));
    assert_eq!(parse_square("i1"), None);
    assert_eq!(parse_square("a9"), None);
}

#[test]
fn castling_uses_king_destination() {
    let pos = BoardPosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let short = parse_uci_move(&pos, "e1g1").unwrap();
    assert_eq!(short.to, Square::H1);
    assert_eq!(move_to_uci(&pos, short), "e1g1");

    let long = parse_uci_move(&pos, "e1c1").unwrap();
    assert_eq!(move_to_uci(&pos, long), "e1c1");

    // Internal encoding is accepted as well
    assert_eq!(parse_uci_move(&pos, "e1h1"), Some(short));
}

#[test]
fn promotion_suffix_is_required_to_match() {
    let pos = BoardPosition::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let queen = parse_uci_move(&pos, "a7a8q").unwrap();
    assert_eq!(queen.promotion, Some(Piece::Queen));
    assert_eq!(parse_uci_move(&pos, "a7a8n").unwrap().promotion, Some(Piece::Knight));
    assert_eq!(parse_uci_move(&pos, "a7a8"), None);
    assert_eq!(move_to_uci(&pos, queen), "a7a8q");
}

#[test]
fn position_command_with_fen_and_moves() {
    let mut pos = BoardPosition::startpos();
    let args = [
        "fen", "4k3/8/8/8/8/8/4P3/4K3", "w", "-", "-", "0", "1", "moves", "e2e4", "e8d7",
    ];
    set_position_from_uci(&mut pos, &args).unwrap();
    assert_eq!(pos.side_to_move(), Color::White);
    assert_eq!(pos.piece_on(Square::E4), Some((Color::White, Piece::Pawn)));
    assert_eq!(pos.king(Color::Black), Square::D7);
    assert_eq!(pos.moves_made(), 2);
}

#[test]
fn bad_position_command_leaves_position_alone() {
    let mut pos = BoardPosition::startpos();
    let key = pos.hash();
    let err = set_position_from_uci(&mut pos, &["startpos", "moves", "e2e5"]).unwrap_err();
    assert!(matches!(err, PositionError::IllegalMove(_)));
    assert_eq!(pos.hash(), key);
}
