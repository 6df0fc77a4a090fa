/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::BOARD_SIZE;

/// A step across the board, as a `(row, col)` delta.
///
/// Rows grow "downwards", towards White's back rank, so [`Direction::UP`] is White's forward.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Direction {
    row: i8,
    col: i8,
}

impl Direction {
    pub const UP: Self = Self::new(-1, 0);
    pub const DOWN: Self = Self::new(1, 0);
    pub const LEFT: Self = Self::new(0, -1);
    pub const RIGHT: Self = Self::new(0, 1);
    pub const UP_LEFT: Self = Self::new(-1, -1);
    pub const UP_RIGHT: Self = Self::new(-1, 1);
    pub const DOWN_LEFT: Self = Self::new(1, -1);
    pub const DOWN_RIGHT: Self = Self::new(1, 1);

    /// The four rook directions.
    pub const ORTHOGONALS: [Self; 4] = [Self::UP, Self::LEFT, Self::DOWN, Self::RIGHT];

    /// The four bishop directions.
    pub const DIAGONALS: [Self; 4] = [
        Self::UP_LEFT,
        Self::UP_RIGHT,
        Self::DOWN_LEFT,
        Self::DOWN_RIGHT,
    ];

    /// All eight rays leaving a square. Orthogonals come first.
    pub const ALL: [Self; 8] = [
        Self::UP,
        Self::LEFT,
        Self::DOWN,
        Self::RIGHT,
        Self::UP_LEFT,
        Self::UP_RIGHT,
        Self::DOWN_LEFT,
        Self::DOWN_RIGHT,
    ];

    /// The eight L-shaped jumps of a Knight.
    pub const KNIGHT_JUMPS: [Self; 8] = [
        Self::new(-2, -1),
        Self::new(-2, 1),
        Self::new(-1, -2),
        Self::new(-1, 2),
        Self::new(1, -2),
        Self::new(1, 2),
        Self::new(2, -1),
        Self::new(2, 1),
    ];

    #[inline(always)]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    #[inline(always)]
    pub const fn row(&self) -> i8 {
        self.row
    }

    #[inline(always)]
    pub const fn col(&self) -> i8 {
        self.col
    }

    /// The direction pointing the other way.
    ///
    /// # Example
    /// ```
    /// # use plainchess_types::Direction;
    /// assert_eq!(Direction::UP_LEFT.opposite(), Direction::DOWN_RIGHT);
    /// ```
    #[inline(always)]
    pub const fn opposite(&self) -> Self {
        Self::new(-self.row, -self.col)
    }

    #[inline(always)]
    pub const fn is_orthogonal(&self) -> bool {
        (self.row == 0) != (self.col == 0)
    }

    #[inline(always)]
    pub const fn is_diagonal(&self) -> bool {
        self.row != 0 && (self.row == self.col || self.row == -self.col)
    }

    /// Returns `true` if `self` and `other` lie on the same line through a square.
    #[inline(always)]
    pub const fn is_parallel_to(&self, other: Self) -> bool {
        (self.row == other.row && self.col == other.col)
            || (self.row == -other.row && self.col == -other.col)
    }
}

/// One of the 64 squares of the board, addressed by zero-based `(row, col)`.
///
/// Row 0 is Black's back rank (rank 8) and row 7 is White's back rank (rank 1).
/// Column 0 is the `a` file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = BOARD_SIZE * BOARD_SIZE;

    /// Creates a [`Square`] from a zero-based row and column.
    ///
    /// # Panics
    /// If either coordinate is not below 8. See [`Square::try_new`] for a fallible version.
    ///
    /// # Example
    /// ```
    /// # use plainchess_types::Square;
    /// let e2 = Square::new(6, 4);
    /// assert_eq!(e2.to_uci(), "e2");
    /// ```
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(
            row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8,
            "Square coordinates must be below 8"
        );
        Self(row * BOARD_SIZE as u8 + col)
    }

    /// Creates a [`Square`] from signed coordinates, returning `None` if they fall off the board.
    #[inline(always)]
    pub const fn try_new(row: i8, col: i8) -> Option<Self> {
        if row >= 0 && row < BOARD_SIZE as i8 && col >= 0 && col < BOARD_SIZE as i8 {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / BOARD_SIZE as u8
    }

    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.0 % BOARD_SIZE as u8
    }

    /// The square one step away in `direction`, if it is on the board.
    ///
    /// # Example
    /// ```
    /// # use plainchess_types::{Direction, Square};
    /// let a8 = Square::new(0, 0);
    /// assert_eq!(a8.offset(Direction::UP), None);
    /// assert_eq!(a8.offset(Direction::DOWN_RIGHT), Some(Square::new(1, 1)));
    /// ```
    #[inline(always)]
    pub const fn offset(&self, direction: Direction) -> Option<Self> {
        self.offset_by(direction, 1)
    }

    /// The square `steps` steps away in `direction`, if it is on the board.
    #[inline(always)]
    pub const fn offset_by(&self, direction: Direction, steps: i8) -> Option<Self> {
        Self::try_new(
            self.row() as i8 + direction.row() * steps,
            self.col() as i8 + direction.col() * steps,
        )
    }

    /// An iterator over the squares along `direction`, starting next to `self` and ending at the edge of the board.
    pub fn ray(self, direction: Direction) -> impl Iterator<Item = Self> {
        (1..BOARD_SIZE as i8).map_while(move |steps| self.offset_by(direction, steps))
    }

    /// The file letter of this square, `a` through `h`.
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.col()) as char
    }

    /// The rank digit of this square, `1` through `8`.
    ///
    /// Row 7 is rank `1` and row 0 is rank `8`.
    #[inline(always)]
    pub const fn rank_char(&self) -> char {
        (b'8' - self.row()) as char
    }

    /// Parses a square from algebraic coordinates, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use plainchess_types::Square;
    /// let e4 = Square::from_uci("e4").unwrap();
    /// assert_eq!((e4.row(), e4.col()), (4, 4));
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let mut chars = uci.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Square must be exactly two chars, like \"e4\". Got {uci:?}");
        };

        let col = match file.to_ascii_lowercase() {
            f @ 'a'..='h' => f as u8 - b'a',
            _ => bail!("Invalid file {file:?} in square {uci:?}"),
        };

        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .with_context(|| format!("Invalid rank {rank:?} in square {uci:?}"))?;

        Ok(Self::new(BOARD_SIZE as u8 - rank as u8, col))
    }

    /// Algebraic coordinates of this square, such as `e4`.
    pub fn to_uci(&self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// All 64 squares, row by row from `a8`.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self, self.row(), self.col())
    }
}
