/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Deref, Index},
    str::FromStr,
};

use anyhow::{anyhow, bail, Result};

use super::{
    compute_checkmask, compute_checks_and_pins, generate_piece_moves, king_moves, Check,
    CheckInfo, Color, Move, MoveList, Pin, Piece, PieceKind, Square, BOARD_SIZE,
};

/// The state of a game of chess: the pieces, whose turn it is, and every move played so far.
///
/// Moves are applied with [`Position::make_move`] and taken back, one at a time, with [`Position::undo_move`].
/// The legal moves of the side to move come from [`Position::get_valid_moves`].
///
/// Two positions are equal if their boards, turns and histories are. Cached check data is not compared.
#[derive(Clone)]
pub struct Position {
    /// Piece placements.
    board: Board,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// Where each King stands, indexed by [`Color::index`]. Always agrees with `board`.
    king_squares: [Square; Color::COUNT],

    /// Every move applied so far, most recent last.
    history: Vec<Move>,

    /// Checks and pins against the side to move, as found by the last call to [`Position::get_valid_moves`].
    ///
    /// Cleared whenever a move is made or undone.
    check_info: CheckInfo,
}

impl Position {
    /// Creates a new [`Position`] with the standard starting arrangement and White to move.
    ///
    /// # Example
    /// ```
    /// # use plainchess::Position;
    /// let pos = Position::new();
    /// assert_eq!(pos.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w");
    /// ```
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// Creates a [`Position`] from a FEN string.
    ///
    /// Only the piece placements and the (optional) side to move are read.
    /// Castling rights, en passant squares and move counters are ignored if present.
    ///
    /// The position must be reachable in material: each side has exactly one King, at most 16 pieces
    /// and at most 8 Pawns, and no Pawn stands on the first or last row.
    /// The side that just moved may not be left in check.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_whitespace();
        let placements = split.next().ok_or(anyhow!(
            "Invalid FEN string: FEN string must have piece placements."
        ))?;
        let board = Board::from_fen(placements)?;

        let side_to_move = split.next().unwrap_or("w").parse()?;

        for color in Color::ALL {
            let kings = board
                .iter()
                .filter(|(_, piece)| *piece == Piece::new(color, PieceKind::King))
                .count();

            if kings != 1 {
                bail!(
                    "Invalid FEN string: {} must have exactly one King. Found {kings}",
                    color.name()
                );
            }

            let pieces = board.iter_color(color).count();
            if pieces > 16 {
                bail!(
                    "Invalid FEN string: {} may have at most 16 pieces. Found {pieces}",
                    color.name()
                );
            }

            let pawns = board
                .iter_color(color)
                .filter(|(_, piece)| piece.is_pawn())
                .count();
            if pawns > BOARD_SIZE {
                bail!(
                    "Invalid FEN string: {} may have at most 8 Pawns. Found {pawns}",
                    color.name()
                );
            }
        }

        if let Some((square, _)) = board.iter().find(|(square, piece)| {
            piece.is_pawn() && (square.row() == 0 || square.row() == BOARD_SIZE as u8 - 1)
        }) {
            bail!("Invalid FEN string: Pawn on {square} cannot stand on the first or last rank");
        }

        let position = Self::from_board(board, side_to_move);

        let waiting = side_to_move.opponent();
        if position.compute_check_info_for(waiting).in_check() {
            bail!(
                "Invalid FEN string: {} is in check, but it is {}'s turn",
                waiting.name(),
                side_to_move.name()
            );
        }

        Ok(position)
    }

    /// Builds a position around a board already known to hold one King per side.
    fn from_board(board: Board, side_to_move: Color) -> Self {
        let mut king_squares = [Square::default(); Color::COUNT];
        for (square, piece) in board.iter().filter(|(_, piece)| piece.is_king()) {
            king_squares[piece.color().index()] = square;
        }

        Self {
            board,
            side_to_move,
            king_squares,
            history: Vec::new(),
            check_info: CheckInfo::default(),
        }
    }

    /// Generates a FEN string (placements and side to move) from this [`Position`].
    pub fn to_fen(&self) -> String {
        format!("{} {}", self.board.to_fen(), self.side_to_move)
    }

    /// Returns the current player as a [`Color`].
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Fetches this position's [`Board`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Where the King of `color` stands.
    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// Every move applied so far, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The most recently applied move, if any.
    #[inline(always)]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// Returns `true` if the side to move was in check when [`Position::get_valid_moves`] was last called.
    ///
    /// This is reset to `false` when a move is made or undone, until the legal moves are generated again.
    /// See [`Position::is_in_check`] for a fresh answer.
    #[inline(always)]
    pub const fn in_check(&self) -> bool {
        self.check_info.in_check()
    }

    /// Pinned pieces of the side to move, as of the last call to [`Position::get_valid_moves`].
    #[inline(always)]
    pub fn pins(&self) -> &[Pin] {
        self.check_info.pins()
    }

    /// Pieces checking the side to move, as of the last call to [`Position::get_valid_moves`].
    #[inline(always)]
    pub fn checks(&self) -> &[Check] {
        self.check_info.checks()
    }

    /// Scans for checks and pins against the side to move in the current position.
    #[inline(always)]
    pub fn check_info(&self) -> CheckInfo {
        self.compute_check_info_for(self.side_to_move)
    }

    #[inline(always)]
    fn compute_check_info_for(&self, color: Color) -> CheckInfo {
        compute_checks_and_pins(&self.board, self.king_square(color), color)
    }

    /// Returns `true` if the side to move is currently in check.
    #[inline(always)]
    pub fn is_in_check(&self) -> bool {
        self.check_info().in_check()
    }

    /// Returns `true` if the side to move is in check and has no legal moves.
    pub fn is_checkmate(&mut self) -> bool {
        self.get_valid_moves().is_empty() && self.in_check()
    }

    /// Returns `true` if the side to move is not in check but has no legal moves.
    pub fn is_stalemate(&mut self) -> bool {
        self.get_valid_moves().is_empty() && !self.in_check()
    }

    /// Applies the move. No enforcement of legality.
    ///
    /// The moved piece leaves [`Move::from`] and lands on [`Move::to`], replacing anything there.
    /// Pawns reaching their last row become Queens.
    pub fn make_move(&mut self, mv: Move) {
        let piece = mv.piece_moved();

        self.board.clear(mv.from());
        self.board.place(mv.piece_placed(), mv.to());

        if piece.is_king() {
            self.king_squares[piece.color().index()] = mv.to();
        }

        self.history.push(mv);
        self.toggle_side_to_move();
        self.check_info.clear();
    }

    /// Apply the provided `moves` to the board. No enforcement of legality.
    #[inline(always)]
    pub fn make_moves(&mut self, moves: impl IntoIterator<Item = Move>) {
        for mv in moves {
            self.make_move(mv);
        }
    }

    /// Takes back the last move applied, returning it. Does nothing if no moves have been made.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;
        let piece = mv.piece_moved();

        self.board.place(piece, mv.from());
        match mv.piece_captured() {
            Some(captured) => self.board.place(captured, mv.to()),
            None => self.board.clear(mv.to()),
        }

        if piece.is_king() {
            self.king_squares[piece.color().index()] = mv.from();
        }

        self.toggle_side_to_move();
        self.check_info.clear();

        Some(mv)
    }

    /// Makes `mv`, evaluates `f` on the resulting position, and takes `mv` back again.
    ///
    /// `f` may make moves of its own, but must take them all back before returning.
    ///
    /// # Example
    /// ```
    /// # use plainchess::*;
    /// let mut pos = Position::new();
    /// let mv = Move::from_uci(pos.board(), "e2e4").unwrap();
    /// let replies = pos.simulate(mv, |after| after.side_to_move());
    /// assert_eq!(replies, Color::Black);
    /// assert_eq!(pos, Position::new());
    /// ```
    pub fn simulate<T>(&mut self, mv: Move, f: impl FnOnce(&mut Self) -> T) -> T {
        self.make_move(mv);
        let result = f(self);
        self.undo_move();
        result
    }

    /// Toggles the current player from White to Black (or vice versa).
    #[inline(always)]
    fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Generate all legal moves from the current position.
    ///
    /// An empty list means the side to move has been checkmated (if [`Position::in_check`]) or stalemated.
    ///
    /// # Example
    /// ```
    /// # use plainchess::Position;
    /// let mut pos = Position::new();
    /// assert_eq!(pos.get_valid_moves().len(), 20);
    /// ```
    pub fn get_valid_moves(&mut self) -> MoveList {
        let info = self.check_info();
        let mut moves = MoveList::new();

        match info.checks() {
            [] => self.generate_all_moves(&info, &mut moves),

            // Any move other than the King's must capture or block the checker
            [check] => {
                self.generate_all_moves(&info, &mut moves);

                let checkmask = compute_checkmask(self.king_square(self.side_to_move), *check);
                moves.retain(|mv| mv.piece_moved().is_king() || checkmask.contains(&mv.to()));
            }

            // If we're in double check, we can only move the King
            _ => self.generate_king_moves(&mut moves),
        }

        self.check_info = info;
        moves
    }

    /// Generates the moves of every piece of the side to move, with pins honored and the King kept safe.
    fn generate_all_moves(&mut self, info: &CheckInfo, moves: &mut MoveList) {
        let color = self.side_to_move;

        for (square, piece) in self.board.iter_color(color) {
            if !piece.is_king() {
                generate_piece_moves(&self.board, square, piece, info.pin_on(square), moves);
            }
        }

        self.generate_king_moves(moves);
    }

    /// Generates the King moves that do not step into an attack.
    ///
    /// Each destination is tried out on the board and the check scan is rerun from there.
    fn generate_king_moves(&mut self, moves: &mut MoveList) {
        let color = self.side_to_move;
        let from = self.king_square(color);
        let king = Piece::new(color, PieceKind::King);

        let mut candidates = MoveList::new();
        king_moves(&self.board, from, king, &mut candidates);

        for mv in candidates {
            if !self.simulate(mv, |after| after.compute_check_info_for(color).in_check()) {
                moves.push(mv);
            }
        }
    }
}

impl Default for Position {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.king_squares == other.king_squares
            && self.history == other.history
    }
}

impl Eq for Position {}

impl FromStr for Position {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Deref for Position {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.board()
    }
}

impl fmt::Display for Position {
    /// Display this position's FEN string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE as u8 {
            write!(f, "{}|", Square::new(row, 0).rank_char())?;
            for col in 0..BOARD_SIZE as u8 {
                let piece = self.board.piece_at(Square::new(row, col));
                write!(f, " {}", piece.map(|p| p.char()).unwrap_or('.'))?;
            }

            match row {
                0 => write!(f, "           FEN: {}", self.to_fen())?,
                1 => write!(f, "          Side: {}", self.side_to_move.name())?,
                2 => write!(f, "    White King: {}", self.king_square(Color::White))?,
                3 => write!(f, "    Black King: {}", self.king_square(Color::Black))?,
                4 => write!(f, "         Moves: {}", self.history.len())?,
                5 => {
                    let last = self.last_move().map(|mv| mv.to_string());
                    write!(f, "          Last: {}", last.as_deref().unwrap_or("-"))?
                }
                _ => {}
            }
            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in 0..BOARD_SIZE {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for col in 0..BOARD_SIZE as u8 {
            write!(f, "{} ", Square::new(0, col).file_char())?;
        }

        Ok(())
    }
}

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of turns or history. If you need those, see [`Position`].
///
/// Internally a "mailbox": one slot per [`Square`], each empty or holding a [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use plainchess::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
        }
    }

    /// Creates a [`Board`] with the pieces in their standard starting squares.
    ///
    /// # Example
    /// ```
    /// # use plainchess::{Board, FEN_STARTPOS};
    /// assert_eq!(Board::standard(), Board::from_fen(FEN_STARTPOS).unwrap());
    /// ```
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; BOARD_SIZE] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Self::new();
        for (col, kind) in (0..).zip(BACK_RANK) {
            for color in Color::ALL {
                let back_row = match color {
                    Color::White => 7,
                    Color::Black => 0,
                };
                board.place(Piece::new(color, kind), Square::new(back_row, col));
                board.place(Piece::new(color, PieceKind::Pawn), Square::new(color.pawn_row(), col));
            }
        }

        board
    }

    /// Constructs a [`Board`] from the placements field of a FEN string.
    ///
    /// Anything after the first space is ignored.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();

        // If this FEN string contains more than just the initial placements, extract the placements
        let placements = fen.split(' ').next().unwrap_or_default();

        // Check if the placements string is the correct length
        if placements.matches('/').count() != BOARD_SIZE - 1 {
            bail!("Missing placements for all 8 ranks.");
        }

        // The first rank in a FEN string is rank 8, which is row 0
        for (row, placements) in (0..).zip(placements.split('/')) {
            let mut col = 0;

            for piece_char in placements.chars() {
                if col >= BOARD_SIZE as u8 {
                    bail!("Too many squares in rank {placements:?} when parsing FEN.");
                }

                // If the next char is a piece, place it
                if let Ok(piece) = Piece::from_uci(piece_char) {
                    board.place(piece, Square::new(row, col));
                    col += 1;
                } else {
                    // If the next char was not a piece, it must count empty squares
                    let Some(empty) = piece_char.to_digit(10).filter(|n| (1..=8).contains(n))
                    else {
                        bail!("Found non-piece, non-numeric char {piece_char:?} when parsing FEN.");
                    };
                    col += empty as u8;
                }
            }

            if col != BOARD_SIZE as u8 {
                bail!("Rank {placements:?} does not describe exactly 8 squares.");
            }
        }

        Ok(board)
    }

    /// Generates the placements field of a [FEN](https://www.chess.com/terms/fen-chess) string of this [`Board`].
    pub fn to_fen(&self) -> String {
        let mut placements = Vec::with_capacity(BOARD_SIZE);

        for row in 0..BOARD_SIZE as u8 {
            let mut rank = String::new();
            let mut empty_spaces = 0;

            for col in 0..BOARD_SIZE as u8 {
                if let Some(piece) = self.piece_at(Square::new(row, col)) {
                    if empty_spaces != 0 {
                        rank += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    rank.push(piece.char());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                rank += &empty_spaces.to_string();
            }
            placements.push(rank);
        }

        placements.join("/")
    }

    /// Returns `true` if there is a piece at the given [`Square`], else `false`.
    ///
    /// # Example
    /// ```
    /// # use plainchess::{Board, Square};
    /// let board = Board::default();
    /// assert_eq!(board.has(Square::from_uci("b1").unwrap()), true);
    /// assert_eq!(board.has(Square::from_uci("b3").unwrap()), false);
    /// ```
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.mailbox[square.index()].is_some()
    }

    /// Places the provided [`Piece`] on the supplied [`Square`], replacing whatever stood there.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.mailbox[square.index()] = Some(piece);
    }

    /// Clears the supplied [`Square`] of any pieces.
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.take(square);
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present.
    ///
    /// # Example
    /// ```
    /// # use plainchess::{Board, Piece, Square};
    /// let mut board = Board::from_fen("k7/8/8/8/2N5/8/8/7K").unwrap();
    /// let taken = board.take(Square::from_uci("c4").unwrap());
    /// assert_eq!(board.to_fen(), "k7/8/8/8/8/8/8/7K");
    /// assert_eq!(taken, Some(Piece::WHITE_KNIGHT));
    /// ```
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()].take()
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()]
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Returns `true` if `square` holds a piece of `color`.
    #[inline(always)]
    pub fn is_friendly(&self, square: Square, color: Color) -> bool {
        self.color_at(square) == Some(color)
    }

    /// Returns `true` if `square` holds a piece of `color`'s opponent.
    #[inline(always)]
    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        self.color_at(square) == Some(color.opponent())
    }

    /// Searches the board for the King of `color`.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        self.iter()
            .find(|&(_, piece)| piece == king)
            .map(|(square, _)| square)
    }

    /// Iterates over every occupied square and its piece, row by row from `a8`.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| Some((square, self.piece_at(square)?)))
    }

    /// Iterates over every piece of `color` and its square.
    pub fn iter_color(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }
}

impl Default for Board {
    #[inline(always)]
    fn default() -> Self {
        Self::standard()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.mailbox[index.index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        for row in 0..BOARD_SIZE as u8 {
            board += &format!("{}| ", Square::new(row, 0).rank_char());

            for col in 0..BOARD_SIZE as u8 {
                let occupant = self
                    .piece_at(Square::new(row, col))
                    .map(|piece| piece.char())
                    .unwrap_or('.');

                board += &format!("{occupant} ");
            }

            board += "\n"
        }
        board += " +";
        for _ in 0..BOARD_SIZE {
            board += "--";
        }
        board += "\n   ";
        for col in 0..BOARD_SIZE as u8 {
            board += &format!("{} ", Square::new(0, col).file_char());
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Game;

    fn sq(uci: &str) -> Square {
        Square::from_uci(uci).unwrap()
    }

    /// Plays `moves` (in coordinate notation) from `pos`, checking each is legal first.
    fn play(pos: &mut Position, moves: &[&str]) {
        for uci in moves {
            let mv = Move::from_uci(pos.board(), uci).unwrap();
            assert!(
                pos.get_valid_moves().contains(&mv),
                "{uci} is not legal in\n{pos:?}"
            );
            pos.make_move(mv);
        }
    }

    fn legal_moves(pos: &mut Position) -> Vec<String> {
        let mut moves = pos
            .get_valid_moves()
            .iter()
            .map(Move::chess_notation)
            .collect::<Vec<_>>();
        moves.sort();
        moves
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let mut pos = Position::new();
        let moves = pos.get_valid_moves();
        assert_eq!(moves.len(), 20);
        assert_eq!(moves.iter().filter(|mv| mv.piece_moved().is_pawn()).count(), 16);
        assert!(!pos.in_check());
    }

    #[test]
    fn startpos_kings_are_cached() {
        let pos = Position::new();
        assert_eq!(pos.king_square(Color::White), sq("e1"));
        assert_eq!(pos.king_square(Color::Black), sq("e8"));
    }

    #[test]
    fn make_then_undo_restores_everything() {
        let mut pos = Position::from_fen("r3k3/1P6/8/3q4/8/5N2/8/R3K3 w").unwrap();
        let original = pos.clone();

        for mv in pos.get_valid_moves() {
            pos.make_move(mv);
            assert_eq!(pos.side_to_move(), Color::Black);
            pos.undo_move();
            assert_eq!(pos, original, "Undoing {mv:?} did not restore the position");
        }
    }

    #[test]
    fn undo_on_empty_history_does_nothing() {
        let mut pos = Position::new();
        assert_eq!(pos.undo_move(), None);
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn repeated_undo_drains_to_the_start() {
        let mut pos = Position::new();
        play(&mut pos, &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6"]);
        assert_eq!(pos.history().len(), 6);

        while pos.undo_move().is_some() {}
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn king_moves_update_the_cache() {
        let mut pos = Position::new();
        play(&mut pos, &["e2e4", "e7e5", "e1e2"]);
        assert_eq!(pos.king_square(Color::White), sq("e2"));

        pos.undo_move();
        assert_eq!(pos.king_square(Color::White), sq("e1"));
    }

    #[test]
    fn queen_on_an_open_file_gives_check() {
        let mut pos = Position::from_fen("rnb1kbnr/pppp1ppp/8/4q3/8/8/PPPP1PPP/RNBQKBNR w").unwrap();
        pos.get_valid_moves();
        assert!(pos.in_check());
        assert!(pos.checks().iter().any(|check| check.square == sq("e5")));
    }

    #[test]
    fn single_check_must_be_answered() {
        // Queen on e5 checks along the e-file. Only blocks on e2 are possible.
        let mut pos = Position::from_fen("rnb1kbnr/pppp1ppp/8/4q3/8/8/PPPP1PPP/RNBQKBNR w").unwrap();
        assert_eq!(legal_moves(&mut pos), ["d1e2", "f1e2", "g1e2"]);
    }

    #[test]
    fn pinned_bishop_cannot_leave_the_rank() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/r2BK3 w").unwrap();
        let moves = pos.get_valid_moves();
        assert!(moves.iter().all(|mv| mv.from() != sq("d1")));
        assert_eq!(pos.pins().len(), 1);
        assert_eq!(pos.pins()[0].square, sq("d1"));
    }

    #[test]
    fn fools_mate() {
        let mut pos = Position::new();
        play(&mut pos, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(pos.get_valid_moves().is_empty());
        assert!(pos.in_check());
        assert!(pos.is_checkmate());
        assert!(!pos.is_stalemate());
    }

    #[test]
    fn stalemate() {
        // Black King in the corner, boxed in by the White Queen but not attacked
        let mut pos = Position::from_fen("k7/2Q5/1K6/8/8/8/8/8 b").unwrap();
        assert!(pos.get_valid_moves().is_empty());
        assert!(!pos.in_check());
        assert!(pos.is_stalemate());
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        // Rook on e8 and Knight on f3 both check the King on e1; the Rook on a2 could otherwise capture/block
        let mut pos = Position::from_fen("4r2k/8/8/8/8/5n2/R7/4K3 w").unwrap();
        let moves = pos.get_valid_moves();
        assert_eq!(pos.checks().len(), 2);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.piece_moved().is_king()));
    }

    #[test]
    fn king_cannot_retreat_along_the_checking_line() {
        let mut pos = Position::from_fen("k7/8/8/8/8/8/8/r3K3 w").unwrap();
        let moves = legal_moves(&mut pos);
        assert!(!moves.contains(&"e1f1".to_string()));
        assert_eq!(moves, ["e1d2", "e1e2", "e1f2"]);
    }

    #[test]
    fn kings_never_touch() {
        let mut pos = Position::from_fen("8/8/8/3k4/8/3K4/8/8 w").unwrap();
        let moves = legal_moves(&mut pos);
        assert_eq!(moves, ["d3c2", "d3c3", "d3d2", "d3e2", "d3e3"]);
    }

    #[test]
    fn king_cannot_capture_a_defended_piece() {
        let mut pos = Position::from_fen("k7/8/8/8/8/8/3r4/2b1K3 w").unwrap();
        // d2 is defended by the Bishop on c1, and the Rook covers d1, e2 and f2
        assert_eq!(legal_moves(&mut pos), ["e1f1"]);
    }

    #[test]
    fn promotion_places_a_queen_and_undo_restores_the_pawn() {
        let mut pos = Position::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w").unwrap();
        let moves = pos.get_valid_moves();
        let push = moves.iter().find(|mv| mv.chess_notation() == "a7a8").unwrap();
        let capture = moves.iter().find(|mv| mv.chess_notation() == "a7b8").unwrap();
        assert!(push.is_promotion() && capture.is_promotion());

        pos.make_move(*capture);
        assert_eq!(pos.board().piece_at(sq("b8")), Some(Piece::WHITE_QUEEN));
        assert!(pos.is_in_check());

        pos.undo_move();
        assert_eq!(pos.board().piece_at(sq("a7")), Some(Piece::WHITE_PAWN));
        assert_eq!(pos.board().piece_at(sq("b8")), Some(Piece::BLACK_ROOK));
    }

    #[test]
    fn fen_round_trip_and_validation() {
        let fen = "r3k2r/pppp1ppp/8/4p3/8/8/PPPPPPPP/R3K2R b";
        assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);

        // Extra FEN fields are ignored
        let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(pos.unwrap(), Position::new());

        assert!(Position::from_fen("8/8/8/8/8/8/8/8 w").is_err());
        assert!(Position::from_fen("kk6/8/8/8/8/8/8/7K w").is_err());
        assert!(Position::from_fen("k7/8/8/8/8/8/8/7K x").is_err());
        assert!(Board::from_fen("k7/8/8/8/8/8/8").is_err());
        assert!(Position::from_fen("k7/8/8/8/8/8/8/7K").is_ok());
        assert!(Board::from_fen("k8/8/8/8/8/8/8/7K").is_err());
        assert!(Board::from_fen("k6/8/8/8/8/8/8/7K").is_err());
    }

    #[test]
    fn unreachable_material_is_rejected() {
        // Far more Queens than pieces, enough to overflow any move list
        let queens = "kQQQQQQQ/Q5QQ/Q1Q4Q/Q3Q2Q/Q6Q/Q4Q1Q/Q6Q/QQQQQQQK w";
        assert!(Position::from_fen(queens).is_err());
        assert!(Game::from_fen(queens).is_err());

        assert!(Position::from_fen("4k3/8/8/8/8/P7/PPPPPPPP/4K3 w").is_err());
        assert!(Position::from_fen("P3k3/8/8/8/8/8/8/4K3 w").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/p3K3 b").is_err());

        // Sixteen pieces, eight of them Pawns, is a full army
        assert!(Position::from_fen("4k3/8/8/8/8/8/PPPPPPPP/RNBQKBNR w").is_ok());
    }

    #[test]
    fn the_waiting_side_cannot_be_in_check() {
        // Black to move could simply take the White King
        assert!(Position::from_fen("k7/8/8/8/8/8/8/r6K b").is_err());
        assert!(Position::from_fen("k7/8/8/8/8/8/8/r6K w").is_ok());
    }

    #[test]
    fn check_info_is_not_kept_across_moves() {
        let mut pos = Position::new();
        play(&mut pos, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        pos.get_valid_moves();
        assert!(pos.in_check());

        pos.undo_move();
        assert!(!pos.in_check());
        assert!(pos.checks().is_empty());
    }
}
