/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;

/// Upper bound on the number of moves generated for a single position at once.
///
/// The most legal moves known in any position is 218; pseudo-legal lists generated
/// while in check can run slightly past that before filtering.
pub const MAX_NUM_MOVES: usize = 256;

/// FEN placement and side to move of the standard starting position.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

/// A position where White has been mated by the "fool's mate" (1. f3 e5 2. g4 Qh4#).
pub const FEN_FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w";
