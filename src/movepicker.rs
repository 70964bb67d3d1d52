/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arrayvec::ArrayVec;

use crate::{value_of, Move, MoveList, PieceKind, Position, MAX_NUM_MOVES};

/// How many moves the partial ordering guarantees to place best-first.
///
/// A full sort of the move list is wasted work: with alpha-beta pruning the
/// search rarely looks past the first few moves, so only a prefix needs to
/// be in order.
const SORT_PREFIX: usize = 8;

/// Scores a move for [MVV-LVA](https://www.chessprogramming.org/MVV-LVA) ordering:
/// `10 * value(victim) - value(attacker)` for captures, `0` otherwise.
///
/// Capturing a high-value piece with a low-value piece scores best.
pub fn score_move(position: &Position, mv: &Move) -> i32 {
    if !mv.is_capture() {
        return 0;
    }

    // En passant's victim does not sit on the destination square, but it is
    // always a pawn.
    let victim = if mv.is_en_passant() {
        PieceKind::Pawn
    } else {
        match position.board().piece_at(mv.to()) {
            Some(piece) => piece.kind(),
            None => return 0,
        }
    };

    let attacker = match position.board().piece_at(mv.from()) {
        Some(piece) => piece.kind(),
        None => return 0,
    };

    10 * value_of(victim) - value_of(attacker)
}

/// Reorders `moves` so the most promising captures come first.
///
/// Small lists get a stable insertion sort by descending score, so equal
/// scores (in particular all non-captures) keep their generation order.
/// Larger lists get a partial selection sort that only guarantees the best
/// [`SORT_PREFIX`] moves are at the front.
pub fn order_moves(position: &Position, moves: &mut MoveList) {
    let count = moves.len();
    if count <= 1 {
        return;
    }

    let mut scores: ArrayVec<i32, MAX_NUM_MOVES> = moves
        .iter()
        .map(|mv| score_move(position, mv))
        .collect();

    if count <= SORT_PREFIX {
        for i in 1..count {
            let mut j = i;
            while j > 0 && scores[j] > scores[j - 1] {
                scores.swap(j, j - 1);
                moves.swap(j, j - 1);
                j -= 1;
            }
        }
    } else {
        for i in 0..SORT_PREFIX {
            let mut max_index = i;
            for j in (i + 1)..count {
                if scores[j] > scores[max_index] {
                    max_index = j;
                }
            }
            if max_index != i {
                scores.swap(i, max_index);
                moves.swap(i, max_index);
            }
        }
    }
}
