/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

pub use plainchess_types::*;

/// The interactive layer: square selection, legal move matching, undo, and game status.
mod game;
/// Check and pin detection, and the pseudo-legal moves of every kind of piece.
mod movegen;
/// A single move of a piece between two squares.
mod moves;
/// Utility functions for performance testing.
mod perft;
/// A mailbox chessboard, and the position built on it: turn, history, and legal move generation.
mod position;

pub use game::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use position::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::game::*;
    pub use crate::movegen::*;
    pub use crate::moves::*;
    pub use crate::perft::*;
    pub use crate::position::*;
    pub use plainchess_types::*;
}
