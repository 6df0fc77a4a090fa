/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use anyhow::{anyhow, bail, Result};

use super::{Board, Piece, PieceKind, Square};

/// A single transition of one piece from one [`Square`] to another.
///
/// A [`Move`] reads the [`Board`] when it is created, recording the piece that moves and
/// the piece (if any) that it captures, so it must be built *before* the board changes.
///
/// Two moves are equal if they share the same origin and destination squares.
/// The moved/captured pieces and the promotion flag are not part of a move's identity;
/// with auto-queen promotion there is only ever one move per origin/destination pair.
#[derive(Clone, Copy)]
pub struct Move {
    from: Square,
    to: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
    is_promotion: bool,
}

impl Move {
    /// Creates a new [`Move`] from `from` to `to`, reading the involved pieces off `board`.
    ///
    /// Returns `None` if there is no piece on `from`.
    ///
    /// # Example
    /// ```
    /// # use plainchess::*;
    /// let board = Board::default();
    /// let mv = Move::new(Square::new(6, 4), Square::new(4, 4), &board).unwrap();
    /// assert_eq!(mv.piece_moved(), Piece::WHITE_PAWN);
    /// assert_eq!(mv.piece_captured(), None);
    /// assert_eq!(mv.chess_notation(), "e2e4");
    /// ```
    #[inline(always)]
    pub fn new(from: Square, to: Square, board: &Board) -> Option<Self> {
        let piece_moved = board.piece_at(from)?;
        Some(Self::with_piece(from, to, piece_moved, board))
    }

    /// Creates a new [`Move`] for `piece_moved`, which must be the occupant of `from`.
    ///
    /// Used by the move generators, which already know which piece they are moving.
    #[inline(always)]
    pub(crate) fn with_piece(from: Square, to: Square, piece_moved: Piece, board: &Board) -> Self {
        let is_promotion =
            piece_moved.is_pawn() && to.row() == piece_moved.color().promotion_row();

        Self {
            from,
            to,
            piece_moved,
            piece_captured: board.piece_at(to),
            is_promotion,
        }
    }

    /// Parses a move in coordinate notation (`e2e4`) against `board`.
    ///
    /// A fifth character, if present, must name a Queen (`q`), since Pawns always promote to Queens.
    /// This does not check whether the move is legal.
    pub fn from_uci(board: &Board, uci: &str) -> Result<Self> {
        let uci = uci.trim();
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            bail!("Move must be 4 or 5 chars, like \"e2e4\". Got {uci:?}");
        }

        let from = Square::from_uci(&uci[0..2])?;
        let to = Square::from_uci(&uci[2..4])?;

        if let Some(promotion) = uci[4..].chars().next() {
            if PieceKind::from_char(promotion)? != PieceKind::Queen {
                bail!("Only promotion to a Queen is supported. Got {uci:?}");
            }
        }

        Self::new(from, to, board).ok_or(anyhow!("No piece on {from} to move in {uci:?}"))
    }

    /// The square the piece leaves.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// The square the piece lands on.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Origin and destination.
    #[inline(always)]
    pub const fn squares(&self) -> (Square, Square) {
        (self.from, self.to)
    }

    /// The piece that moves, as it stood on [`Move::from`].
    #[inline(always)]
    pub const fn piece_moved(&self) -> Piece {
        self.piece_moved
    }

    /// The piece standing on [`Move::to`] before the move, if any.
    #[inline(always)]
    pub const fn piece_captured(&self) -> Option<Piece> {
        self.piece_captured
    }

    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }

    /// `true` if a Pawn reaches its last row with this move.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.is_promotion
    }

    /// The piece that ends up on [`Move::to`]: a Queen of the mover's color for promotions.
    #[inline(always)]
    pub const fn piece_placed(&self) -> Piece {
        if self.is_promotion {
            self.piece_moved.promoted(PieceKind::Queen)
        } else {
            self.piece_moved
        }
    }

    /// Coordinate notation of this move, such as `e2e4`.
    ///
    /// # Example
    /// ```
    /// # use plainchess::*;
    /// let board = Board::default();
    /// let mv = Move::new(Square::new(7, 6), Square::new(5, 5), &board).unwrap();
    /// assert_eq!(mv.chess_notation(), "g1f3");
    /// ```
    pub fn chess_notation(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Move {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.squares() == other.squares()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.squares().hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({}", self.piece_moved)?;
        if let Some(captured) = self.piece_captured {
            write!(f, "x{captured}")?;
        }
        if self.is_promotion {
            write!(f, "=Q")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_of_king_pawn_double_push() {
        let board = Board::default();
        let mv = Move::new(Square::new(6, 4), Square::new(4, 4), &board).unwrap();
        assert_eq!(mv.chess_notation(), "e2e4");
    }

    #[test]
    fn equality_ignores_everything_but_squares() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let empty = Board::new();
        let a1 = Square::from_uci("a1").unwrap();
        let a8 = Square::from_uci("a8").unwrap();

        let rook_move = Move::new(a1, a8, &board).unwrap();
        let other = Move::with_piece(a1, a8, Piece::BLACK_QUEEN, &empty);
        assert_eq!(rook_move, other);

        let h8 = Square::from_uci("h8").unwrap();
        assert_ne!(rook_move, Move::new(a1, h8, &board).unwrap());
    }

    #[test]
    fn moves_record_their_capture_when_built() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let mv = Move::from_uci(&board, "e4d5").unwrap();
        assert_eq!(mv.piece_captured(), Some(Piece::BLACK_PAWN));
        assert!(mv.is_capture());
        assert!(!mv.is_promotion());
    }

    #[test]
    fn pawns_reaching_the_last_row_promote_to_queens() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/7p/4K3").unwrap();

        let white = Move::from_uci(&board, "a7a8").unwrap();
        assert!(white.is_promotion());
        assert_eq!(white.piece_placed(), Piece::WHITE_QUEEN);

        let black = Move::from_uci(&board, "h2h1q").unwrap();
        assert!(black.is_promotion());
        assert_eq!(black.piece_placed(), Piece::BLACK_QUEEN);
    }

    #[test]
    fn malformed_notation_is_rejected() {
        let board = Board::default();
        assert!(Move::from_uci(&board, "e2").is_err());
        assert!(Move::from_uci(&board, "e2e9").is_err());
        assert!(Move::from_uci(&board, "e4e5").is_err()); // no piece on e4
        assert!(Move::from_uci(&board, "a7a8n").is_err());
    }
}
