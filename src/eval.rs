/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{PieceKind, Position, Score};

/// Returns the material value of the provided [`PieceKind`], in centipawns.
///
/// Values are obtained from here: <https://www.chessprogramming.org/Simplified_Evaluation_Function>
///
/// # Example
/// ```
/// # use stoat::{value_of, PieceKind};
/// assert_eq!(value_of(PieceKind::Pawn), 100);
/// assert_eq!(value_of(PieceKind::Queen), 900);
/// ```
#[inline(always)]
pub const fn value_of(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

/// Statically evaluates a position by material count alone.
///
/// The result is White-positive: a high score means White holds more
/// material. The search negates this per side-to-move as needed.
///
/// # Example
/// ```
/// # use stoat::{evaluate, Position, Score};
/// assert_eq!(evaluate(&Position::new()), Score::DRAW);
/// ```
#[inline(always)]
pub fn evaluate(position: &Position) -> Score {
    let mut score = 0;

    for (_, piece) in position.board().iter() {
        score += value_of(piece.kind()) * piece.color().negation_multiplier() as i32;
    }

    Score::new(score)
}
