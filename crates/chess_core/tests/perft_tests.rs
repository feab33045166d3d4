//! Perft through the [`Position`] adapter.
//!
//! Counts leaf nodes with `legal_moves`/`do_move`/`undo_move` only, so any
//! bookkeeping error in the undo stack shows up as a wrong count. Depths with
//! more than `NODE_LIMIT` leaves are skipped unless `FULL_PERFT` is set.

use std::time::Instant;

use chess_core::{BoardPosition, Position};
use rayon::prelude::*;

const FULL_PERFT_ENV: &str = "FULL_PERFT";
const NODE_LIMIT: u64 = 1_000_000;

const CASES: &[(&str, &[(u8, u64)])] = &[
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[(1, 20), (2, 400), (3, 8_902), (4, 197_281), (5, 4_865_609)],
    ),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[(1, 48), (2, 2_039), (3, 97_862), (4, 4_085_603)],
    ),
    (
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        &[(1, 14), (2, 191), (3, 2_812), (4, 43_238), (5, 674_624)],
    ),
    (
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[(1, 44), (2, 1_486), (3, 62_379)],
    ),
];

fn perft<P: Position>(pos: &mut P, depth: u8) -> u64 {
    let moves = pos.legal_moves();
    if depth <= 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        pos.do_move(mv);
        nodes += perft(pos, depth - 1);
        pos.undo_move(mv);
    }
    nodes
}

#[test]
fn perft_matches_reference_counts() {
    let full = std::env::var(FULL_PERFT_ENV).is_ok();

    CASES.par_iter().enumerate().for_each(|(idx, (fen, depths))| {
        let case_start = Instant::now();
        let mut pos = BoardPosition::from_fen(fen).unwrap();
        let key = pos.hash();
        let mut total_nodes = 0;

        for &(depth, expected) in depths.iter() {
            if !full && expected > NODE_LIMIT {
                continue;
            }
            let got = perft(&mut pos, depth);
            assert_eq!(got, expected, "perft({depth}) of '{fen}'");
            assert_eq!(pos.hash(), key);
            assert_eq!(pos.moves_made(), 0);
            total_nodes += got;
        }

        println!(
            "case {} done: {} nodes in {:.3?}",
            idx + 1,
            total_nodes,
            case_start.elapsed()
        );
    });
}
