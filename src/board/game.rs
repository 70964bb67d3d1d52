/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::Result;
use thiserror::Error;

use super::{parse_coordinate_move, Color, Move, MoveList, PieceKind, Position, Square};

/// Why a move intent was rejected.
///
/// The game state is guaranteed untouched whenever one of these is returned.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    /// The intent does not match any move in the legal set.
    #[error("{from}{to} is not a legal move in this position")]
    IllegalMove {
        /// Source square of the rejected intent.
        from: Square,
        /// Destination square of the rejected intent.
        to: Square,
    },

    /// The intent moves a pawn to the last rank but supplies no promotion kind.
    #[error("{from}{to} promotes a pawn and requires a promotion kind (q, r, b, or n)")]
    PromotionRequired {
        /// Source square of the rejected intent.
        from: Square,
        /// Destination square of the rejected intent.
        to: Square,
    },
}

/// The game façade: owns the current [`Position`] and answers the driver's
/// questions about it.
///
/// The legal move list is computed once per state change and cached, so
/// repeated calls to [`Game::legal_moves`] and the terminal-state queries
/// are free.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    legal: MoveList,
}

impl Game {
    /// Creates a new [`Game`] at the standard starting position.
    #[inline(always)]
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    /// Creates a new [`Game`] from an arbitrary [`Position`].
    #[inline(always)]
    pub fn from_position(position: Position) -> Self {
        Self {
            legal: position.legal_moves(),
            position,
        }
    }

    /// Fetches a read-only view of the current state.
    #[inline(always)]
    pub const fn state(&self) -> &Position {
        &self.position
    }

    /// Fetches the legal moves of the current state.
    #[inline(always)]
    pub fn legal_moves(&self) -> &MoveList {
        &self.legal
    }

    /// Looks up a legal move matching the intent and applies it.
    ///
    /// A promotion kind is required when the matched move promotes, and
    /// silently ignored when it does not. On any error the state is
    /// unchanged.
    ///
    /// # Example
    /// ```
    /// # use stoat::{Game, Square};
    /// let mut game = Game::new();
    /// assert!(game.try_move(Square::E2, Square::E4, None).is_ok());
    /// assert!(game.try_move(Square::E4, Square::E5, None).is_err()); // not Black's pawn
    /// ```
    pub fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<(), MoveError> {
        let mut saw_promotion = false;
        let mut matched = None;

        for &candidate in &self.legal {
            if candidate.from() != from || candidate.to() != to {
                continue;
            }

            if candidate.is_promotion() {
                saw_promotion = true;
                if promotion != candidate.promotion() {
                    continue;
                }
            }

            matched = Some(candidate);
            break;
        }

        if let Some(mv) = matched {
            self.apply(mv);
            return Ok(());
        }

        // All four promotion variants share (from, to); reaching this point
        // with one seen means the caller supplied no (matching) kind.
        if saw_promotion && promotion.is_none() {
            return Err(MoveError::PromotionRequired { from, to });
        }
        Err(MoveError::IllegalMove { from, to })
    }

    /// Parses a coordinate-notation intent such as `e2e4` or `a7a8q` and
    /// plays it via [`Game::try_move`].
    pub fn try_move_coordinate(&mut self, text: &str) -> Result<()> {
        let (from, to, promotion) = parse_coordinate_move(text)?;
        self.try_move(from, to, promotion)?;
        Ok(())
    }

    /// Unconditionally applies a move produced by this game's move generator.
    ///
    /// Used by the driver to play the search's chosen move without a second
    /// legality lookup.
    #[inline(always)]
    pub fn make_move(&mut self, mv: Move) {
        self.apply(mv);
    }

    fn apply(&mut self, mv: Move) {
        self.position = self.position.with_move_made(mv);
        self.legal = self.position.legal_moves();
    }

    /// Returns `true` if `color`'s King is currently attacked.
    #[inline(always)]
    pub fn in_check(&self, color: Color) -> bool {
        self.position.in_check(color)
    }

    /// Returns `true` if the side to move is checkmated.
    #[inline(always)]
    pub fn is_checkmate(&self) -> bool {
        self.legal.is_empty() && self.in_check(self.position.side_to_move())
    }

    /// Returns `true` if the side to move is stalemated: not in check, but
    /// with no legal reply.
    #[inline(always)]
    pub fn is_stalemate(&self) -> bool {
        self.legal.is_empty() && !self.in_check(self.position.side_to_move())
    }

    /// Restores the standard starting position.
    #[inline(always)]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Counts the leaf nodes of the legal-move tree at the given depth.
    #[inline(always)]
    pub fn perft(&self, depth: usize) -> u64 {
        self.position.perft(depth)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CastlingRights, Piece};

    #[test]
    fn illegal_intents_leave_the_state_unchanged() {
        let mut game = Game::new();
        let before = *game.state();

        assert_eq!(
            game.try_move(Square::E2, Square::E5, None),
            Err(MoveError::IllegalMove {
                from: Square::E2,
                to: Square::E5
            })
        );
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn legal_moves_refresh_after_each_move() {
        let mut game = Game::new();
        game.try_move(Square::E2, Square::E4, None).unwrap();

        assert_eq!(game.state().side_to_move(), Color::Black);
        assert!(game
            .legal_moves()
            .iter()
            .all(|mv| game.state().board().piece_at(mv.from()).unwrap().color() == Color::Black));
    }

    #[test]
    fn promotion_requires_a_kind() {
        let position = Position::builder()
            .piece(Square::E1, Piece::new(Color::White, PieceKind::King))
            .piece(Square::H8, Piece::new(Color::Black, PieceKind::King))
            .piece(Square::A7, Piece::new(Color::White, PieceKind::Pawn))
            .build();
        let mut game = Game::from_position(position);
        let before = *game.state();

        assert_eq!(
            game.try_move(Square::A7, Square::A8, None),
            Err(MoveError::PromotionRequired {
                from: Square::A7,
                to: Square::A8
            })
        );
        assert_eq!(game.state(), &before);

        game.try_move(Square::A7, Square::A8, Some(PieceKind::Queen))
            .unwrap();
        assert_eq!(
            game.state().board().piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }

    #[test]
    fn surplus_promotion_kind_is_ignored() {
        let mut game = Game::new();
        game.try_move(Square::E2, Square::E4, Some(PieceKind::Queen))
            .unwrap();
        assert_eq!(
            game.state().board().piece_at(Square::E4),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
    }

    #[test]
    fn coordinate_intents_are_parsed_and_played() {
        let mut game = Game::new();
        game.try_move_coordinate("e2e4").unwrap();
        game.try_move_coordinate("E7E5").unwrap();
        assert!(game.try_move_coordinate("banana").is_err());
        assert!(game.try_move_coordinate("e5e4").is_err()); // black pawn can't advance onto e4
        assert_eq!(game.state().fullmove(), 2);
    }

    #[test]
    fn reset_restores_the_initial_position() {
        let mut game = Game::new();
        game.try_move(Square::G1, Square::F3, None).unwrap();
        game.reset();
        assert_eq!(game.state(), &Position::new());
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn no_legal_moves_means_mate_or_stalemate() {
        // Back-rank mate.
        let mate = Position::builder()
            .piece(Square::H8, Piece::new(Color::Black, PieceKind::King))
            .piece(Square::G7, Piece::new(Color::Black, PieceKind::Pawn))
            .piece(Square::H7, Piece::new(Color::Black, PieceKind::Pawn))
            .piece(Square::E8, Piece::new(Color::White, PieceKind::Rook))
            .piece(Square::E1, Piece::new(Color::White, PieceKind::King))
            .side_to_move(Color::Black)
            .build();
        let game = Game::from_position(mate);
        assert!(game.legal_moves().is_empty());
        assert!(game.is_checkmate());
        assert!(!game.is_stalemate());

        // Kings and a cornered stalemate.
        let stale = Position::builder()
            .piece(Square::H8, Piece::new(Color::Black, PieceKind::King))
            .piece(Square::F7, Piece::new(Color::White, PieceKind::King))
            .piece(Square::G6, Piece::new(Color::White, PieceKind::Queen))
            .side_to_move(Color::Black)
            .build();
        let game = Game::from_position(stale);
        assert!(game.legal_moves().is_empty());
        assert!(game.is_stalemate());
        assert!(!game.is_checkmate());
    }

    #[test]
    fn castling_rights_survive_unrelated_moves() {
        let mut game = Game::new();
        game.try_move(Square::G1, Square::F3, None).unwrap();
        game.try_move(Square::B8, Square::C6, None).unwrap();
        assert_eq!(
            game.state().castling_rights(Color::White),
            CastlingRights::all()
        );
        assert_eq!(
            game.state().castling_rights(Color::Black),
            CastlingRights::all()
        );
    }
}
