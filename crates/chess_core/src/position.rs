//! Position adapter.
//!
//! Everything above this module (classifier, tree search, fallback search)
//! talks to the board through the [`Position`] trait. [`BoardPosition`] is the
//! production implementation backed by `cozy_chess::Board`; make/unmake is
//! implemented by keeping a LIFO stack of the boards each move replaced.

use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves,
    BitBoard, Board, Color, Move, Piece, Square,
};

use crate::error::PositionError;
use crate::eval::piece_value;

/// Standard starting position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Board capabilities consumed by the search layers.
///
/// All queries reflect the exact current mutation state. `undo_move` must be
/// called with the most recent move passed to `do_move`; anything else is a
/// broken caller and implementations are expected to panic.
pub trait Position {
    /// Apply a legal move.
    fn do_move(&mut self, mv: Move);

    /// Revert the last move applied with [`Position::do_move`].
    fn undo_move(&mut self, mv: Move);

    /// All legal moves in the current position, in generation order.
    fn legal_moves(&self) -> Vec<Move>;

    fn side_to_move(&self) -> Color;

    /// Pieces of `color` and kind `piece`.
    fn pieces(&self, color: Color, piece: Piece) -> BitBoard;

    /// All occupied squares.
    fn occupied(&self) -> BitBoard;

    /// Color and kind of the piece on `sq`, if any.
    fn piece_on(&self, sq: Square) -> Option<(Color, Piece)>;

    /// Pieces of color `by` attacking `sq` with the current occupancy.
    fn attackers_to(&self, sq: Square, by: Color) -> BitBoard;

    /// Whether `mv` leaves the opponent in check.
    fn gives_check(&self, mv: Move) -> bool;

    /// Zobrist key of the current position.
    fn hash(&self) -> u64;

    /// Plies since the last capture or pawn move.
    fn halfmove_clock(&self) -> u8;

    /// All pieces of one color.
    fn colors(&self, color: Color) -> BitBoard {
        Piece::ALL
            .iter()
            .fold(BitBoard::EMPTY, |acc, &piece| acc | self.pieces(color, piece))
    }

    /// Square of the king of `color`.
    fn king(&self, color: Color) -> Square {
        // Legal positions always have exactly one king per side.
        self.pieces(color, Piece::King)
            .into_iter()
            .next()
            .unwrap_or(Square::A1)
    }

    /// Whether the side to move is in check.
    fn in_check(&self) -> bool {
        let us = self.side_to_move();
        !self.attackers_to(self.king(us), !us).is_empty()
    }

    /// Number of pieces of kind `piece` for both colors.
    fn count(&self, piece: Piece) -> u32 {
        self.pieces(Color::White, piece).len() + self.pieces(Color::Black, piece).len()
    }

    /// Total number of pieces (kings and pawns included).
    fn piece_count(&self) -> u32 {
        self.occupied().len()
    }

    /// Material of `color` excluding pawns and the king, in centipawns.
    fn non_pawn_material(&self, color: Color) -> i32 {
        [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .iter()
            .map(|&piece| self.pieces(color, piece).len() as i32 * piece_value(piece))
            .sum()
    }

    /// Kind of the piece captured by `mv`, en passant included.
    ///
    /// Castling (encoded as king-takes-own-rook) is not a capture.
    fn captured_piece(&self, mv: Move) -> Option<Piece> {
        let us = self.side_to_move();
        match self.piece_on(mv.to) {
            Some((color, piece)) if color != us => Some(piece),
            Some(_) => None,
            None => match self.piece_on(mv.from) {
                Some((_, Piece::Pawn)) if mv.from.file() != mv.to.file() => Some(Piece::Pawn),
                _ => None,
            },
        }
    }

    /// Whether `mv` captures anything.
    fn is_capture(&self, mv: Move) -> bool {
        self.captured_piece(mv).is_some()
    }
}

/// Chebyshev (king-step) distance between two squares.
pub fn square_distance(a: Square, b: Square) -> u32 {
    let df = (a.file() as i32 - b.file() as i32).unsigned_abs();
    let dr = (a.rank() as i32 - b.rank() as i32).unsigned_abs();
    df.max(dr)
}

/// [`Position`] over a `cozy_chess::Board` with an undo stack.
#[derive(Debug, Clone)]
pub struct BoardPosition {
    board: Board,
    /// Moves made so far with the board each one replaced.
    history: Vec<(Move, Board)>,
}

impl BoardPosition {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            history: Vec::new(),
        }
    }

    pub fn startpos() -> Self {
        Self::new(Board::default())
    }

    /// Parse a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let board = fen
            .trim()
            .parse::<Board>()
            .map_err(|err| PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{err:?}"),
            })?;
        Ok(Self::new(board))
    }

    /// The underlying board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of moves currently on the undo stack.
    pub fn moves_made(&self) -> usize {
        self.history.len()
    }

    /// Hash keys of every earlier position on the undo stack, oldest first.
    pub fn previous_keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.history.iter().map(|(_, board)| board.hash())
    }

    /// Apply `mv` after checking that it is legal.
    pub fn try_do_move(&mut self, mv: Move) -> Result<(), PositionError> {
        if !self.board.is_legal(mv) {
            return Err(PositionError::IllegalMove(format!("{mv:?}")));
        }
        self.do_move(mv);
        Ok(())
    }
}

impl Default for BoardPosition {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position for BoardPosition {
    fn do_move(&mut self, mv: Move) {
        debug_assert!(self.board.is_legal(mv), "illegal move {mv:?}");
        let previous = self.board.clone();
        self.board.play_unchecked(mv);
        self.history.push((mv, previous));
    }

    fn undo_move(&mut self, mv: Move) {
        match self.history.pop() {
            Some((last, previous)) => {
                assert_eq!(
                    last, mv,
                    "undo_move({mv:?}) does not match the last move made ({last:?})"
                );
                self.board = previous;
            }
            None => panic!("undo_move({mv:?}) with no moves made"),
        }
    }

    fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves);
            false
        });
        moves
    }

    fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    fn pieces(&self, color: Color, piece: Piece) -> BitBoard {
        self.board.colored_pieces(color, piece)
    }

    fn occupied(&self) -> BitBoard {
        self.board.occupied()
    }

    fn piece_on(&self, sq: Square) -> Option<(Color, Piece)> {
        let piece = self.board.piece_on(sq)?;
        let color = self.board.color_on(sq)?;
        Some((color, piece))
    }

    fn attackers_to(&self, sq: Square, by: Color) -> BitBoard {
        let board = &self.board;
        let occupied = board.occupied();
        let diagonal = board.pieces(Piece::Bishop) | board.pieces(Piece::Queen);
        let orthogonal = board.pieces(Piece::Rook) | board.pieces(Piece::Queen);

        let attackers = (get_knight_moves(sq) & board.pieces(Piece::Knight))
            | (get_king_moves(sq) & board.pieces(Piece::King))
            | (get_pawn_attacks(sq, !by) & board.pieces(Piece::Pawn))
            | (get_bishop_moves(sq, occupied) & diagonal)
            | (get_rook_moves(sq, occupied) & orthogonal);
        attackers & board.colors(by)
    }

    fn gives_check(&self, mv: Move) -> bool {
        let mut next = self.board.clone();
        next.play_unchecked(mv);
        !next.checkers().is_empty()
    }

    fn hash(&self) -> u64 {
        self.board.hash()
    }

    fn halfmove_clock(&self) -> u8 {
        self.board.halfmove_clock()
    }

    fn colors(&self, color: Color) -> BitBoard {
        self.board.colors(color)
    }

    fn king(&self, color: Color) -> Square {
        self.board.king(color)
    }

    fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
