/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::{bail, Result};
use tracing::{debug, info};

use super::{Color, Move, MoveList, Position, Square};

/// Outcome of a single [`Game::click`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Selection {
    /// A first square was chosen. The next click picks the destination.
    Selected(Square),

    /// The selected square was clicked again, clearing the selection.
    Deselected,

    /// The two clicks formed a legal move, which has been applied.
    Moved(Move),

    /// The two clicks did not form a legal move. The position is untouched,
    /// and the second square is now the selected one.
    Rejected(Square),
}

/// Whether the game can go on, and if not, how it ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    /// Returns `true` if the game has ended.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "Ongoing"),
            Self::Checkmate { winner } => write!(f, "Checkmate, {} wins", winner.name()),
            Self::Stalemate => write!(f, "Stalemate"),
        }
    }
}

/// A [`Position`] together with its current legal moves and a pending square selection.
///
/// This is what an interface drives: squares are clicked (or typed) one at a time,
/// and only moves found among the legal moves are ever applied.
#[derive(Clone, PartialEq, Eq)]
pub struct Game {
    position: Position,

    /// Legal moves of the side to move in `position`. Refreshed after every change to `position`.
    legal_moves: MoveList,

    /// The first of the two squares forming a move, once it has been clicked.
    selected: Option<Square>,
}

impl Game {
    /// Starts a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    /// Starts a game from an arbitrary [`Position`].
    pub fn from_position(position: Position) -> Self {
        let mut game = Self {
            position,
            legal_moves: MoveList::new(),
            selected: None,
        };

        game.refresh();
        game
    }

    /// Creates a new [`Game`] from the provided FEN string.
    #[inline(always)]
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// The legal moves available to the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// The currently selected square, if one has been clicked.
    #[inline(always)]
    pub const fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Returns `true` if `mv` is among the legal moves.
    #[inline(always)]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves.contains(&mv)
    }

    /// Handles one square being clicked.
    ///
    /// The first click selects a square, and clicking it again clears the selection.
    /// A click on a different square attempts the move between the two; if that move is not legal,
    /// the newly clicked square becomes the selection instead.
    ///
    /// # Example
    /// ```
    /// # use plainchess::*;
    /// let mut game = Game::new();
    /// let e2 = Square::from_uci("e2").unwrap();
    /// let e5 = Square::from_uci("e5").unwrap();
    /// let e4 = Square::from_uci("e4").unwrap();
    ///
    /// assert_eq!(game.click(e2), Selection::Selected(e2));
    /// assert_eq!(game.click(e5), Selection::Rejected(e5));
    /// assert_eq!(game.click(e2), Selection::Rejected(e2));
    /// assert!(matches!(game.click(e4), Selection::Moved(_)));
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// ```
    pub fn click(&mut self, square: Square) -> Selection {
        let Some(from) = self.selected else {
            self.selected = Some(square);
            return Selection::Selected(square);
        };

        if from == square {
            self.selected = None;
            return Selection::Deselected;
        }

        let Some(candidate) = Move::new(from, square, self.position.board()) else {
            debug!(%from, to = %square, "no piece to move");
            self.selected = Some(square);
            return Selection::Rejected(square);
        };

        debug!(mv = %candidate.chess_notation(), "attempting move");
        match self.try_make_move(candidate) {
            Ok(mv) => Selection::Moved(mv),
            Err(_) => {
                self.selected = Some(square);
                Selection::Rejected(square)
            }
        }
    }

    /// Applies `mv` if it is legal, returning the move actually made.
    ///
    /// Moves are matched by their squares alone, so the returned move is the legal move
    /// with the correct capture and promotion details, regardless of how `mv` was built.
    /// If `mv` is not legal, nothing changes and an `Err` explains why.
    pub fn try_make_move(&mut self, mv: Move) -> Result<Move> {
        let Some(&legal) = self.legal_moves.iter().find(|&&legal| legal == mv) else {
            debug!(mv = %mv, side = self.side_to_move().name(), "rejected illegal move");
            bail!(
                "{mv} is not a legal move for {} in {}",
                self.side_to_move().name(),
                self.position.to_fen()
            );
        };

        self.position.make_move(legal);
        debug!(mv = %legal, capture = legal.is_capture(), promotion = legal.is_promotion(), "applied move");

        self.selected = None;
        self.refresh();
        Ok(legal)
    }

    /// Takes back the last move, if there is one, and clears any selection.
    pub fn undo(&mut self) -> Option<Move> {
        self.selected = None;

        let undone = self.position.undo_move()?;
        debug!(mv = %undone, "undid move");

        self.refresh();
        Some(undone)
    }

    /// The state of the game for the side to move.
    pub fn status(&self) -> GameStatus {
        if !self.legal_moves.is_empty() {
            GameStatus::Ongoing
        } else if self.position.in_check() {
            GameStatus::Checkmate {
                winner: self.side_to_move().opponent(),
            }
        } else {
            GameStatus::Stalemate
        }
    }

    /// Every move applied so far, in coordinate notation.
    pub fn move_log(&self) -> Vec<String> {
        self.position
            .history()
            .iter()
            .map(Move::chess_notation)
            .collect()
    }

    /// Recomputes the legal moves after the position changed.
    fn refresh(&mut self) {
        self.legal_moves = self.position.get_valid_moves();

        let status = self.status();
        if status.is_over() {
            info!(%status, moves = self.position.history().len(), "game over");
        }
    }
}

impl Deref for Game {
    type Target = Position;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.position
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Game {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position.board())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let legal = self
            .legal_moves
            .iter()
            .map(Move::chess_notation)
            .collect::<Vec<_>>();

        write!(
            f,
            "{:?}\n\nStatus: {}\nSelected: {}\nLegal ({}): {}",
            self.position,
            self.status(),
            self.selected.map(|sq| sq.to_uci()).unwrap_or("-".into()),
            legal.len(),
            legal.join(" ")
        )
    }
}
