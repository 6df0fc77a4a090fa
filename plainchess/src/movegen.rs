/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arrayvec::ArrayVec;

use super::{Board, Color, Direction, Move, Piece, PieceKind, Square, MAX_NUM_MOVES};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = ArrayVec<Move, MAX_NUM_MOVES>;

/// A friendly piece that shields its King from an enemy slider.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pin {
    /// Where the pinned piece stands.
    pub square: Square,

    /// Direction from the King towards the pinned piece (and the pinner behind it).
    pub direction: Direction,
}

/// An enemy piece attacking the King.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Check {
    /// Where the checking piece stands.
    pub square: Square,

    /// Direction from the King towards the checker.
    ///
    /// For Knight checks, this is the Knight's jump rather than a ray.
    pub direction: Direction,
}

impl Check {
    /// Returns `true` if this check comes along a line that could be blocked or walked along,
    /// which is every check except a Knight's.
    #[inline(always)]
    pub const fn is_along_ray(&self) -> bool {
        self.direction.is_orthogonal() || self.direction.is_diagonal()
    }
}

/// Check and pin data for one King, produced by [`compute_checks_and_pins`].
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CheckInfo {
    in_check: bool,

    /// At most one pin per ray.
    pins: ArrayVec<Pin, 8>,

    /// One per ray plus one per Knight jump, in the most contrived of positions.
    checks: ArrayVec<Check, 16>,
}

impl CheckInfo {
    /// Returns `true` if the King is attacked.
    #[inline(always)]
    pub const fn in_check(&self) -> bool {
        self.in_check
    }

    /// Returns `true` if more than one piece attacks the King, in which case only the King may move.
    #[inline(always)]
    pub fn is_double_check(&self) -> bool {
        self.checks.len() > 1
    }

    #[inline(always)]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    #[inline(always)]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// The pin direction of the piece on `square`, if it is pinned.
    #[inline(always)]
    pub fn pin_on(&self, square: Square) -> Option<Direction> {
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| pin.direction)
    }

    /// Resets to "no checks, no pins".
    #[inline(always)]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Scans outward from `king_square` for every check against, and every pin on, the `color` pieces.
///
/// Each of the eight rays is walked one square at a time:
/// the first friendly piece found is remembered as a possibly pinned piece,
/// a second friendly piece closes the ray,
/// and the first enemy piece either attacks along the ray (a check, or a pin if a friendly piece stood in between) or closes it.
/// Knights are then looked for on the eight squares a Knight could jump to the King from.
///
/// # Example
/// ```
/// # use plainchess::*;
/// let board = Board::from_fen("4k3/8/8/4q3/8/8/8/4K3").unwrap();
/// let king = board.king_square(Color::White).unwrap();
/// let info = compute_checks_and_pins(&board, king, Color::White);
/// assert!(info.in_check());
/// assert_eq!(info.checks()[0].square, Square::from_uci("e5").unwrap());
/// ```
pub fn compute_checks_and_pins(board: &Board, king_square: Square, color: Color) -> CheckInfo {
    let mut info = CheckInfo::default();

    for direction in Direction::ALL {
        let mut possible_pin = None;

        for (distance, square) in (1..).zip(king_square.ray(direction)) {
            let Some(piece) = board.piece_at(square) else {
                continue;
            };

            if piece.color() == color {
                // Two friendly pieces in a row shield the King completely
                if possible_pin.is_some() {
                    break;
                }
                possible_pin = Some(square);
                continue;
            }

            if attacks_along(piece, direction, distance) {
                match possible_pin {
                    None => {
                        info.in_check = true;
                        info.checks.push(Check { square, direction });
                    }
                    Some(pinned) => info.pins.push(Pin {
                        square: pinned,
                        direction,
                    }),
                }
            }

            // Any enemy piece ends the ray, attacker or not
            break;
        }
    }

    let enemy_knight = Piece::new(color.opponent(), PieceKind::Knight);
    for jump in Direction::KNIGHT_JUMPS {
        let Some(square) = king_square.offset(jump) else {
            continue;
        };

        if board.piece_at(square) == Some(enemy_knight) {
            info.in_check = true;
            info.checks.push(Check {
                square,
                direction: jump,
            });
        }
    }

    info
}

/// Returns `true` if the enemy `piece`, found `distance` squares from the King along `direction`, attacks the King.
#[inline(always)]
fn attacks_along(piece: Piece, direction: Direction, distance: usize) -> bool {
    match piece.kind() {
        PieceKind::King => distance == 1,
        // The Pawn must be one step diagonally *ahead* of itself, from its own point of view
        PieceKind::Pawn => {
            distance == 1
                && direction.is_diagonal()
                && direction.row() == -piece.color().forward().row()
        }
        kind => {
            (direction.is_orthogonal() && kind.is_orthogonal_slider())
                || (direction.is_diagonal() && kind.is_diagonal_slider())
        }
    }
}

/// Computes the squares a non-King move must land on to answer `check` against the King on `king_square`.
///
/// That is the checker's own square, plus every square between it and the King if the check can be blocked.
///
/// # Example
/// ```
/// # use plainchess::*;
/// let board = Board::from_fen("4k3/8/8/4q3/8/8/8/4K3").unwrap();
/// let king = Square::from_uci("e1").unwrap();
/// let check = compute_checks_and_pins(&board, king, Color::White).checks()[0];
/// let mask = compute_checkmask(king, check);
/// assert_eq!(mask.len(), 4); // e2, e3, e4, and the Queen on e5
/// ```
pub fn compute_checkmask(king_square: Square, check: Check) -> ArrayVec<Square, 8> {
    let mut checkmask = ArrayVec::new();

    if check.is_along_ray() {
        for square in king_square.ray(check.direction) {
            checkmask.push(square);
            if square == check.square {
                break;
            }
        }
    } else {
        checkmask.push(check.square);
    }

    checkmask
}

/// Returns `true` if a piece pinned along `pin` (if pinned at all) may move in `direction`.
#[inline(always)]
fn follows_pin(pin: Option<Direction>, direction: Direction) -> bool {
    pin.map_or(true, |pin| pin.is_parallel_to(direction))
}

/// Appends the pseudo-legal moves of `piece` on `square`, honoring `pin`.
///
/// King moves are not checked for safety here. See [`king_moves`].
pub fn generate_piece_moves(
    board: &Board,
    square: Square,
    piece: Piece,
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    match piece.kind() {
        PieceKind::Pawn => pawn_moves(board, square, piece, pin, moves),
        PieceKind::Knight => knight_moves(board, square, piece, pin, moves),
        PieceKind::Bishop => bishop_moves(board, square, piece, pin, moves),
        PieceKind::Rook => rook_moves(board, square, piece, pin, moves),
        PieceKind::Queen => queen_moves(board, square, piece, pin, moves),
        PieceKind::King => king_moves(board, square, piece, moves),
    }
}

/// Pawn pushes (one step, or two from the starting row) onto empty squares, and diagonal captures of enemy pieces.
pub fn pawn_moves(
    board: &Board,
    square: Square,
    pawn: Piece,
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    let color = pawn.color();
    let forward = color.forward();

    if follows_pin(pin, forward) {
        if let Some(single) = square.offset(forward).filter(|&to| !board.has(to)) {
            moves.push(Move::with_piece(square, single, pawn, board));

            if square.row() == color.pawn_row() {
                if let Some(double) = single.offset(forward).filter(|&to| !board.has(to)) {
                    moves.push(Move::with_piece(square, double, pawn, board));
                }
            }
        }
    }

    for side in [-1, 1] {
        let capture = Direction::new(forward.row(), side);
        if !follows_pin(pin, capture) {
            continue;
        }

        if let Some(to) = square.offset(capture) {
            if board.is_enemy(to, color) {
                moves.push(Move::with_piece(square, to, pawn, board));
            }
        }
    }
}

/// Knight jumps onto empty or enemy-occupied squares. A pinned Knight cannot move.
pub fn knight_moves(
    board: &Board,
    square: Square,
    knight: Piece,
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    if pin.is_some() {
        return;
    }

    jump_moves(board, square, knight, &Direction::KNIGHT_JUMPS, moves);
}

pub fn bishop_moves(
    board: &Board,
    square: Square,
    bishop: Piece,
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    slider_moves(board, square, bishop, &Direction::DIAGONALS, pin, moves);
}

pub fn rook_moves(
    board: &Board,
    square: Square,
    rook: Piece,
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    slider_moves(board, square, rook, &Direction::ORTHOGONALS, pin, moves);
}

/// A Queen moves like a Rook and a Bishop combined.
pub fn queen_moves(
    board: &Board,
    square: Square,
    queen: Piece,
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    rook_moves(board, square, queen, pin, moves);
    bishop_moves(board, square, queen, pin, moves);
}

/// King steps onto empty or enemy-occupied squares.
///
/// These are only pseudo-legal: nothing here stops the King from stepping into an attack.
pub fn king_moves(board: &Board, square: Square, king: Piece, moves: &mut MoveList) {
    jump_moves(board, square, king, &Direction::ALL, moves);
}

/// Walks every ray in `directions` that the (possibly pinned) piece may travel along,
/// stopping before friendly pieces and on enemy pieces.
fn slider_moves(
    board: &Board,
    square: Square,
    piece: Piece,
    directions: &[Direction],
    pin: Option<Direction>,
    moves: &mut MoveList,
) {
    let color = piece.color();

    for &direction in directions {
        if !follows_pin(pin, direction) {
            continue;
        }

        for to in square.ray(direction) {
            match board.color_at(to) {
                None => moves.push(Move::with_piece(square, to, piece, board)),
                Some(occupant) => {
                    if occupant != color {
                        moves.push(Move::with_piece(square, to, piece, board));
                    }
                    break;
                }
            }
        }
    }
}

/// Single steps by each offset in `offsets`, onto squares not held by a friendly piece.
fn jump_moves(
    board: &Board,
    square: Square,
    piece: Piece,
    offsets: &[Direction],
    moves: &mut MoveList,
) {
    for &offset in offsets {
        if let Some(to) = square.offset(offset) {
            if !board.is_friendly(to, piece.color()) {
                moves.push(Move::with_piece(square, to, piece, board));
            }
        }
    }
}
