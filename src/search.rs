/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{evaluate, order_moves, Color, Move, Position, Score};

/// Default number of plies to search ahead.
///
/// Three plies answer quickly on any hardware; drivers may raise this at the
/// cost of response time.
pub const DEFAULT_DEPTH: usize = 3;

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum depth (in plies) to execute the search.
    pub max_depth: usize,
}

impl SearchConfig {
    /// Constructs a new [`SearchConfig`] searching `max_depth` plies ahead.
    ///
    /// A depth of zero is bumped to one; a zero-ply "search" has no moves to
    /// choose between.
    #[inline(always)]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
        }
    }
}

/// The result of a search: the best move found, its score, and how many
/// nodes were visited along the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search. [`None`] iff the searched side has
    /// no legal moves.
    pub bestmove: Option<Move>,

    /// Score of `bestmove` from the searched side's perspective.
    pub score: Score,
}

impl Default for SearchResult {
    /// A default search result holds a *very bad* score, since there isn't
    /// a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: -Score::INF,
        }
    }
}

/// Executes a [negamax](https://www.chessprogramming.org/Negamax) search with
/// alpha-beta pruning on a position.
///
/// The search is synchronous, deterministic, and bounded by depth alone. It
/// copies the position once per ply down its recursion stack and never
/// mutates the root.
pub struct Search<'a> {
    /// The root position to search on.
    position: &'a Position,

    /// Running result, updated as the root moves are evaluated.
    result: SearchResult,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,
}

impl<'a> Search<'a> {
    /// Constructs a new [`Search`] over the provided [`Position`].
    #[inline(always)]
    pub fn new(position: &'a Position, config: SearchConfig) -> Self {
        Self {
            position,
            result: SearchResult::default(),
            config,
        }
    }

    /// Runs the search for `side`, returning the result.
    ///
    /// Each root move is evaluated with a full window and the argmax wins;
    /// ties are broken by move-generation order, so the result is
    /// deterministic.
    pub fn start(mut self, side: Color) -> SearchResult {
        let root = if self.position.side_to_move() == side {
            *self.position
        } else {
            self.position.with_side_to_move(side)
        };

        let mut moves = root.legal_moves();
        if moves.is_empty() {
            return self.result;
        }
        order_moves(&root, &mut moves);

        let depth = self.config.max_depth.max(1);

        for mv in moves {
            // A move the rule engine cannot apply is skipped, not evaluated.
            if root.board().piece_at(mv.from()).is_none() {
                continue;
            }

            let next = root.with_move_made(mv);
            let value = -self.negamax(next, depth - 1, side.opponent(), -Score::INF, Score::INF);

            if value > self.result.score || self.result.bestmove.is_none() {
                self.result.score = value;
                self.result.bestmove = Some(mv);
            }
        }

        self.result
    }

    /// The recursive core of the search.
    ///
    /// Returns the value of `position` from `side`'s perspective, looking
    /// `depth` plies ahead. `alpha`/`beta` bound the window of scores still
    /// worth distinguishing; once `alpha >= beta` the remaining moves cannot
    /// affect the result and the loop cuts off.
    fn negamax(
        &mut self,
        position: Position,
        depth: usize,
        side: Color,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        self.result.nodes += 1;

        if depth == 0 {
            return Self::relative_eval(&position, side);
        }

        let mut moves = position.legal_moves();
        if moves.is_empty() {
            return Self::relative_eval(&position, side);
        }
        order_moves(&position, &mut moves);

        let mut best = -Score::INF;

        for mv in moves {
            if position.board().piece_at(mv.from()).is_none() {
                continue;
            }

            let next = position.with_move_made(mv);
            let value = -self.negamax(next, depth - 1, side.opponent(), -beta, -alpha);

            if value > best {
                best = value;
            }
            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                break; // beta cutoff
            }
        }

        best
    }

    /// The static evaluation of `position`, negated for Black.
    #[inline(always)]
    fn relative_eval(position: &Position, side: Color) -> Score {
        let value = evaluate(position);
        if side.is_white() {
            value
        } else {
            -value
        }
    }
}

/// Finds the best move for `side` on the provided position.
///
/// Returns [`None`] iff `side` has no legal moves. Otherwise the returned
/// move maximises the negamax score at `config.max_depth` plies, with ties
/// broken by move-generation order.
///
/// # Example
/// ```
/// # use stoat::{find_best_move, Color, Position, SearchConfig};
/// let position = Position::new();
/// let best = find_best_move(&position, Color::White, SearchConfig::default());
/// assert!(best.is_some());
/// ```
#[inline(always)]
pub fn find_best_move(position: &Position, side: Color, config: SearchConfig) -> Option<Move> {
    Search::new(position, config).start(side).bestmove
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Piece, PieceKind, Square};

    #[test]
    fn the_opening_search_returns_a_legal_move() {
        let position = Position::new();
        let config = SearchConfig::new(2);

        let best = find_best_move(&position, Color::White, config)
            .expect("the starting position has moves");
        assert!(position.legal_moves().contains(&best));
    }

    #[test]
    fn the_search_is_deterministic() {
        let position = Position::new();
        let config = SearchConfig::new(3);

        let first = Search::new(&position, config).start(Color::White);
        let second = Search::new(&position, config).start(Color::White);
        assert_eq!(first, second);
    }

    #[test]
    fn no_legal_moves_yields_no_best_move() {
        // Stalemate: Black to move with nowhere to go.
        let position = Position::builder()
            .piece(Square::H8, Piece::new(Color::Black, PieceKind::King))
            .piece(Square::F7, Piece::new(Color::White, PieceKind::King))
            .piece(Square::G6, Piece::new(Color::White, PieceKind::Queen))
            .side_to_move(Color::Black)
            .build();

        assert_eq!(
            find_best_move(&position, Color::Black, SearchConfig::default()),
            None
        );
    }

    #[test]
    fn a_hanging_queen_is_taken() {
        let position = Position::builder()
            .piece(Square::E1, Piece::new(Color::White, PieceKind::King))
            .piece(Square::E8, Piece::new(Color::Black, PieceKind::King))
            .piece(Square::D5, Piece::new(Color::White, PieceKind::Queen))
            .piece(Square::C6, Piece::new(Color::Black, PieceKind::Pawn))
            .side_to_move(Color::Black)
            .build();

        let best = find_best_move(&position, Color::Black, SearchConfig::new(2))
            .expect("black has moves");
        assert_eq!(best.from(), Square::C6);
        assert_eq!(best.to(), Square::D5);
    }

    #[test]
    fn deeper_search_avoids_losing_material() {
        // White to move: the rook on a1 is attacked by the bishop on f6.
        // At depth >= 2 the search must not leave it hanging for nothing.
        let position = Position::builder()
            .piece(Square::G1, Piece::new(Color::White, PieceKind::King))
            .piece(Square::G8, Piece::new(Color::Black, PieceKind::King))
            .piece(Square::A1, Piece::new(Color::White, PieceKind::Rook))
            .piece(Square::F6, Piece::new(Color::Black, PieceKind::Bishop))
            .build();

        let best = find_best_move(&position, Color::White, SearchConfig::new(2))
            .expect("white has moves");
        let after = position.with_move_made(best);
        let reply = find_best_move(&after, Color::Black, SearchConfig::new(1));

        // Whatever White chose, Black's best reply cannot win the rook.
        if let Some(reply) = reply {
            let settled = after.with_move_made(reply);
            assert!(
                crate::evaluate(&settled) >= Score::new(500 - 330),
                "white lost the rook: {best} then {reply}"
            );
        }
    }

    #[test]
    fn nodes_are_counted() {
        let position = Position::new();
        let result = Search::new(&position, SearchConfig::new(2)).start(Color::White);
        assert!(result.nodes > 0);
    }
}
