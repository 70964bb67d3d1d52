/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

/// A numerical evaluation of a position or move, in centipawns.
///
/// Positive scores favor whichever perspective the caller chose; the
/// evaluator produces White-positive scores and the search negates them
/// per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Score(pub(crate) i32);

impl Score {
    /// Largest possible score ever achievable.
    pub const INF: Self = Self(1_000_000_000);

    /// Score of a perfectly balanced position.
    pub const DRAW: Self = Self(0);

    /// Creates a new [`Score`] from a centipawn value.
    #[inline(always)]
    pub const fn new(centipawns: i32) -> Self {
        Self(centipawns)
    }

    /// Returns the centipawn value of this [`Score`].
    #[inline(always)]
    pub const fn centipawns(self) -> i32 {
        self.0
    }

    /// Returns the absolute value of this [`Score`].
    #[inline(always)]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the greater of two scores.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

macro_rules! impl_binary_op {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: Self) -> Self::Output {
                Self(self.0.$fn(rhs.0))
            }
        }

        impl std::ops::$trait<i32> for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: i32) -> Self::Output {
                Self(self.0.$fn(rhs))
            }
        }
    };
}

macro_rules! impl_binary_op_assign {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            #[inline(always)]
            fn $fn(&mut self, rhs: Self) {
                self.0.$fn(rhs.0);
            }
        }

        impl std::ops::$trait<i32> for Score {
            #[inline(always)]
            fn $fn(&mut self, rhs: i32) {
                self.0.$fn(rhs);
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);

impl_binary_op_assign!(AddAssign, add_assign);
impl_binary_op_assign!(SubAssign, sub_assign);

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(self.0.neg())
    }
}

impl From<i32> for Score {
    #[inline(always)]
    fn from(centipawns: i32) -> Self {
        Self(centipawns)
    }
}

impl fmt::Display for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_flips_perspective() {
        let score = Score::new(350);
        assert_eq!(-score, Score::new(-350));
        assert_eq!(-(-score), score);
        assert_eq!(-Score::DRAW, Score::DRAW);
    }

    #[test]
    fn arithmetic_matches_centipawns() {
        assert_eq!(Score::new(100) + Score::new(20), Score::new(120));
        assert_eq!(Score::new(100) - 30, Score::new(70));
        assert!(Score::INF > Score::new(20_000));
        assert_eq!((-Score::INF).max(Score::DRAW), Score::DRAW);
    }
}
