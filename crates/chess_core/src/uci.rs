//! UCI move notation and `position` command handling.
//!
//! cozy-chess encodes castling as the king capturing its own rook (`e1h1`);
//! the protocol expects the king's destination square (`e1g1`). Conversion in
//! both directions happens here and nowhere else.

use cozy_chess::{File, Move, Piece, Rank, Square};

use crate::error::PositionError;
use crate::position::{BoardPosition, Position};

pub fn square_name(sq: Square) -> String {
    let file = (b'a' + sq.file() as u8) as char;
    let rank = (b'1' + sq.rank() as u8) as char;
    format!("{file}{rank}")
}

pub fn parse_square(text: &str) -> Option<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].to_ascii_lowercase().checked_sub(b'a')? as usize;
    let rank = bytes[1].checked_sub(b'1')? as usize;
    if file >= 8 || rank >= 8 {
        return None;
    }
    Some(Square::new(File::index(file), Rank::index(rank)))
}

fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        _ => 'q',
    }
}

/// Move text exactly as encoded, castling as king-takes-rook.
pub fn raw_move_text(mv: Move) -> String {
    let mut s = square_name(mv.from);
    s.push_str(&square_name(mv.to));
    if let Some(piece) = mv.promotion {
        s.push(promotion_char(piece));
    }
    s
}

/// Standard UCI text for `mv`, played from `pos`.
pub fn move_to_uci(pos: &dyn Position, mv: Move) -> String {
    let us = pos.side_to_move();
    let castles = matches!(pos.piece_on(mv.from), Some((c, Piece::King)) if c == us)
        && matches!(pos.piece_on(mv.to), Some((c, Piece::Rook)) if c == us);
    if !castles {
        return raw_move_text(mv);
    }
    let king_file = if mv.to.file() as u8 > mv.from.file() as u8 {
        File::G
    } else {
        File::C
    };
    let to = Square::new(king_file, mv.from.rank());
    format!("{}{}", square_name(mv.from), square_name(to))
}

/// Resolve UCI text against the legal moves of `pos`.
///
/// Both the standard castling form and the king-takes-rook form are accepted.
pub fn parse_uci_move(pos: &dyn Position, text: &str) -> Option<Move> {
    let text = text.trim().to_ascii_lowercase();
    if text.len() < 4 || text.len() > 5 {
        return None;
    }
    pos.legal_moves()
        .into_iter()
        .find(|&mv| move_to_uci(pos, mv) == text || raw_move_text(mv) == text)
}

/// Apply the arguments of a UCI `position` command.
///
/// Supports `startpos [moves ...]` and `fen <fields...> [moves ...]`. On error
/// `pos` is left untouched.
pub fn set_position_from_uci(pos: &mut BoardPosition, args: &[&str]) -> Result<(), PositionError> {
    let moves_at = args.iter().position(|&a| a == "moves").unwrap_or(args.len());
    let mut next = match args.first() {
        None | Some(&"startpos") => BoardPosition::startpos(),
        Some(&"fen") => BoardPosition::from_fen(&args[1..moves_at].join(" "))?,
        Some(other) => {
            return Err(PositionError::InvalidFen {
                fen: other.to_string(),
                reason: "expected 'startpos' or 'fen'".to_string(),
            })
        }
    };

    for text in args.iter().skip(moves_at + 1) {
        let mv = parse_uci_move(&next, text)
            .ok_or_else(|| PositionError::IllegalMove(text.to_string()))?;
        next.do_move(mv);
    }
    *pos = next;
    Ok(())
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
