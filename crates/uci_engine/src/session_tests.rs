use super::*;
use chess_core::{parse_uci_move, Color, Piece, Position, Square};

const HIGH_TAL_FEN: &str = "r3k2r/8/8/8/3q4/6n1/8/R3K2R w - - 0 1";

fn session() -> UciSession {
    UciSession::new(ShashinEngine::default())
}

fn send(session: &mut UciSession, line: &str) -> String {
    let mut out = Vec::new();
    assert!(session.handle(line, &mut out).unwrap());
    String::from_utf8(out).unwrap()
}

fn bestmove(output: &str) -> &str {
    output
        .lines()
        .find_map(|l| l.strip_prefix("bestmove "))
        .expect("no bestmove line")
}

#[test]
fn handshake() {
    let mut s = session();
    let out = send(&mut s, "uci");
    assert!(out.contains("id name Shashin MCTS"));
    assert!(out.contains("id author ML-chess"));
    assert!(out.contains("option name MCTS type check default false"));
    assert!(out.contains("option name MCTSIterations type spin default 1000 min 1 max 100000"));
    assert!(out.contains("option name Depth type spin default 4 min 1 max 8"));
    assert!(out.contains("option name ShashinConfig type string"));
    assert_eq!(out.lines().last(), Some("uciok"));

    assert_eq!(send(&mut s, "isready"), "readyok\n");
    assert_eq!(send(&mut s, "   "), "");
}

#[test]
fn quit_ends_the_session() {
    let mut s = session();
    let mut out = Vec::new();
    assert!(!s.handle("quit", &mut out).unwrap());
}

#[test]
fn castling_in_standard_notation() {
    let mut s = session();
    send(&mut s, "position fen r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1 moves e1g1 e8c8");
    let pos = s.position();
    assert_eq!(pos.piece_on(Square::G1), Some((Color::White, Piece::King)));
    assert_eq!(pos.piece_on(Square::F1), Some((Color::White, Piece::Rook)));
    assert_eq!(pos.piece_on(Square::C8), Some((Color::Black, Piece::King)));
    assert_eq!(pos.piece_on(Square::D8), Some((Color::Black, Piece::Rook)));
}

#[test]
fn go_returns_a_legal_move() {
    let mut s = session();
    send(&mut s, "position startpos moves e2e4 e7e5");
    let out = send(&mut s, "go depth 2");
    let mv = bestmove(&out);
    assert!(parse_uci_move(s.position(), mv).is_some(), "illegal {mv}");
    assert!(out.contains("info depth 2"));
    assert!(!out.contains("info string MCTS"));
}

#[test]
fn go_with_movetime() {
    let mut s = session();
    send(&mut s, "position startpos");
    let out = send(&mut s, "go movetime 200");
    assert!(parse_uci_move(s.position(), bestmove(&out)).is_some());
}

#[test]
fn mcts_options_drive_the_search() {
    let mut s = session();
    send(&mut s, "setoption name MCTS value true");
    send(&mut s, "setoption name MCTSIterations value 50");
    send(&mut s, "setoption name Depth value 2");
    assert!(s.engine().config().enabled);
    assert_eq!(s.engine().config().iterations, 50);
    assert_eq!(s.engine().fallback_depth(), 2);

    send(&mut s, &format!("position fen {HIGH_TAL_FEN}"));
    let out = send(&mut s, "go");
    assert!(out.contains("info string MCTS High Tal [FIRE] bestmove"));
    assert!(out.contains("info string json {"));
    assert!(out.contains("nodes 50"));
    assert!(parse_uci_move(s.position(), bestmove(&out)).is_some());
}

#[test]
fn bad_position_is_reported_and_ignored() {
    let mut s = session();
    send(&mut s, "position startpos moves e2e4");
    let key = s.position().hash();
    let out = send(&mut s, "position startpos moves e2e5");
    assert!(out.starts_with("info string"));
    assert_eq!(s.position().hash(), key);
}

#[test]
fn option_values_may_contain_spaces() {
    let mut s = session();
    send(&mut s, "setoption name ShashinConfig value /tmp/no such dir/shashin.toml");
    send(&mut s, "setoption name Unknown Option value 3");
    assert!(!s.engine().config().enabled);
}

#[test]
fn new_game_resets_position() {
    let mut s = session();
    send(&mut s, "position startpos moves d2d4");
    send(&mut s, "ucinewgame");
    assert_eq!(s.position().hash(), BoardPosition::startpos().hash());
}
