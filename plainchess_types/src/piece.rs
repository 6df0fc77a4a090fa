/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::Direction;

/// The two sides of a chess game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of colors.
    pub const COUNT: usize = 2;

    /// Both colors, White first.
    pub const ALL: [Self; Self::COUNT] = [Self::White, Self::Black];

    /// Returns the opposing [`Color`].
    ///
    /// # Example
    /// ```
    /// # use plainchess_types::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Index for tables with one entry per color.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// `true` for [`Color::White`].
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// The direction this color's Pawns advance in.
    ///
    /// White plays "up" the board towards row 0, Black plays "down" towards row 7.
    #[inline(always)]
    pub const fn forward(&self) -> Direction {
        match self {
            Self::White => Direction::UP,
            Self::Black => Direction::DOWN,
        }
    }

    /// The row this color's Pawns start on, and may double-push from.
    #[inline(always)]
    pub const fn pawn_row(&self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// The row on which this color's Pawns promote.
    #[inline(always)]
    pub const fn promotion_row(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Single-character representation: `w` or `b`.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Parses `w`/`b` (case-insensitive).
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'w' => Ok(Self::White),
            'b' => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b'. Got {c:?}"),
        }
    }

    /// Human readable name.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => bail!("Color must be a single char, 'w' or 'b'. Got {s:?}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// The six kinds of chess pieces.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece kinds.
    pub const COUNT: usize = 6;

    /// All piece kinds, from Pawn to King.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// Uppercase algebraic letter of this kind.
    ///
    /// # Example
    /// ```
    /// # use plainchess_types::PieceKind;
    /// assert_eq!(PieceKind::Knight.char(), 'N');
    /// ```
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Parses a piece letter, ignoring case.
    pub fn from_char(c: char) -> Result<Self> {
        Ok(match c.to_ascii_uppercase() {
            'P' => Self::Pawn,
            'N' => Self::Knight,
            'B' => Self::Bishop,
            'R' => Self::Rook,
            'Q' => Self::Queen,
            'K' => Self::King,
            _ => bail!("Invalid char for PieceKind: {c:?}"),
        })
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "Pawn",
            Self::Knight => "Knight",
            Self::Bishop => "Bishop",
            Self::Rook => "Rook",
            Self::Queen => "Queen",
            Self::King => "King",
        }
    }

    /// Rooks and Queens.
    #[inline(always)]
    pub const fn is_orthogonal_slider(&self) -> bool {
        matches!(self, Self::Rook | Self::Queen)
    }

    /// Bishops and Queens.
    #[inline(always)]
    pub const fn is_diagonal_slider(&self) -> bool {
        matches!(self, Self::Bishop | Self::Queen)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A chess piece: a [`Color`] and a [`PieceKind`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceKind::Pawn);
    pub const WHITE_KNIGHT: Self = Self::new(Color::White, PieceKind::Knight);
    pub const WHITE_BISHOP: Self = Self::new(Color::White, PieceKind::Bishop);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceKind::Rook);
    pub const WHITE_QUEEN: Self = Self::new(Color::White, PieceKind::Queen);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceKind::King);
    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceKind::Pawn);
    pub const BLACK_KNIGHT: Self = Self::new(Color::Black, PieceKind::Knight);
    pub const BLACK_BISHOP: Self = Self::new(Color::Black, PieceKind::Bishop);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceKind::Rook);
    pub const BLACK_QUEEN: Self = Self::new(Color::Black, PieceKind::Queen);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceKind::King);

    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// The same piece, changed to `kind`. Used for promotion.
    #[inline(always)]
    pub const fn promoted(self, kind: PieceKind) -> Self {
        Self::new(self.color, kind)
    }

    /// FEN character: uppercase for White, lowercase for Black.
    ///
    /// # Example
    /// ```
    /// # use plainchess_types::Piece;
    /// assert_eq!(Piece::WHITE_QUEEN.char(), 'Q');
    /// assert_eq!(Piece::BLACK_PAWN.char(), 'p');
    /// ```
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind.char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parses a FEN piece character.
    pub fn from_uci(c: char) -> Result<Self> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self::new(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_chars_round_trip() {
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                let piece = Piece::new(color, kind);
                assert_eq!(Piece::from_uci(piece.char()).unwrap(), piece);
            }
        }
    }

    #[test]
    fn bad_piece_chars_are_rejected() {
        assert!(Piece::from_uci('x').is_err());
        assert!(Piece::from_uci('1').is_err());
        assert!("wb".parse::<Color>().is_err());
    }

    #[test]
    fn queens_slide_both_ways() {
        assert!(PieceKind::Queen.is_orthogonal_slider() && PieceKind::Queen.is_diagonal_slider());
        assert!(PieceKind::Rook.is_orthogonal_slider() && !PieceKind::Rook.is_diagonal_slider());
        assert!(!PieceKind::Bishop.is_orthogonal_slider() && PieceKind::Bishop.is_diagonal_slider());
        assert!(!PieceKind::Knight.is_orthogonal_slider() && !PieceKind::Knight.is_diagonal_slider());
    }

    #[test]
    fn pawns_move_towards_their_promotion_row() {
        let white = Color::White;
        let black = Color::Black;
        assert_eq!(white.forward().row(), -1);
        assert_eq!(black.forward().row(), 1);
        assert_eq!(white.promotion_row(), 0);
        assert_eq!(black.promotion_row(), 7);
    }
}
