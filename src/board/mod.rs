/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The game façade: cached legal moves, move application, terminal states.
mod game;

/// Move representation and coordinate-notation parsing.
mod moves;

/// Colors, piece kinds, and pieces.
mod piece;

/// Game state: castling rights, en passant, move generation and application.
mod position;

/// Files, ranks, and squares.
mod square;

pub use game::*;
pub use moves::*;
pub use piece::*;
pub use position::*;
pub use square::*;

use std::fmt;

/// An `8x8` chess board: a mapping from the 64 squares to optional pieces.
///
/// This is a plain mailbox array with no legality knowledge of its own; the
/// rule engine drives it through [`Board::move_piece`] and [`Board::set`]
/// inside its move-application transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`].
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            cells: [None; Square::COUNT],
        }
    }

    /// Creates a [`Board`] with the standard chess starting setup.
    ///
    /// # Example
    /// ```
    /// # use stoat::{Board, Color, PieceKind, Square};
    /// let board = Board::initial_setup();
    /// let king = board.piece_at(Square::E1).unwrap();
    /// assert_eq!(king.color(), Color::White);
    /// assert_eq!(king.kind(), PieceKind::King);
    /// assert!(board.is_empty(Square::E4));
    /// ```
    pub fn initial_setup() -> Self {
        let mut board = Self::new();

        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for color in Color::all() {
            for (file, kind) in File::iter().zip(back_rank) {
                board.place(Square::new(file, Rank::back(color)), Piece::new(color, kind));
            }
            for file in File::iter() {
                board.place(
                    Square::new(file, Rank::pawn_start(color)),
                    Piece::new(color, PieceKind::Pawn),
                );
            }
        }

        board
    }

    /// Fetches the piece on the provided square, if any.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()]
    }

    /// Overwrites the cell at `square` with the provided contents.
    #[inline(always)]
    pub fn set(&mut self, square: Square, cell: Option<Piece>) {
        self.cells[square.index()] = cell;
    }

    /// Places `piece` on `square`, overwriting whatever was there.
    #[inline(always)]
    pub fn place(&mut self, square: Square, piece: Piece) {
        self.set(square, Some(piece));
    }

    /// Moves the contents of `from` onto `to`, clearing `from`.
    ///
    /// This is a shallow primitive for the rule engine's move application;
    /// it performs no legality checks of any kind.
    #[inline(always)]
    pub fn move_piece(&mut self, from: Square, to: Square) {
        self.cells[to.index()] = self.cells[from.index()].take();
    }

    /// Returns `true` if the provided square holds no piece.
    #[inline(always)]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Removes every piece from the board.
    #[inline(always)]
    pub fn clear_all(&mut self) {
        self.cells = [None; Square::COUNT];
    }

    /// Returns an iterator over all occupied squares and the pieces on them,
    /// rank by rank from the 8th down.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Renders the board as an ASCII grid, White at the bottom.
    ///
    /// White pieces are uppercase, Black pieces lowercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter() {
            write!(f, "{rank} |")?;
            for file in File::iter() {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map(|piece| piece.char())
                    .unwrap_or('.');
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        writeln!(f)?;
        write!(f, "   ")?;
        for file in File::iter() {
            write!(f, " {file}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
