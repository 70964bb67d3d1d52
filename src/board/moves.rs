/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{PieceKind, Square};

/// Maximum possible number of moves in a given chess position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
pub const MAX_NUM_MOVES: usize = 218;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// The category of a move, determining which side effects apply when it is executed.
///
/// Internally these are bit flags in the upper nibble of a [`Move`], following the
/// [From-To based encoding](https://www.chessprogramming.org/Encoding_Moves#From-To_Based).
/// The promotion kind is part of the flags, and hence part of a move's identity.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum MoveKind {
    /// A single piece moving without changing the quantity or kind of any piece.
    Quiet = 0 << Move::FLG_BITS,

    /// A pawn's two-square advance from its starting rank.
    ///
    /// The only move that sets an en-passant target.
    DoublePawnPush = 1 << Move::FLG_BITS,

    /// King and Rook slide past each other on the King's side of the board.
    KingSideCastle = 2 << Move::FLG_BITS,

    /// King and Rook slide past each other on the Queen's side of the board.
    QueenSideCastle = 3 << Move::FLG_BITS,

    /// A piece moves onto a square occupied by an opponent's piece, removing it.
    Capture = 4 << Move::FLG_BITS,

    /// A pawn captures the pawn that just double-pushed past it.
    ///
    /// The captured pawn does *not* sit on the move's destination square.
    EnPassant = 5 << Move::FLG_BITS,

    /// A pawn reaches the last rank and becomes a Knight.
    PromoteKnight = 8 << Move::FLG_BITS,

    /// A pawn reaches the last rank and becomes a Bishop.
    PromoteBishop = 9 << Move::FLG_BITS,

    /// A pawn reaches the last rank and becomes a Rook.
    PromoteRook = 10 << Move::FLG_BITS,

    /// A pawn reaches the last rank and becomes a Queen.
    PromoteQueen = 11 << Move::FLG_BITS,

    /// A pawn captures onto the last rank and becomes a Knight.
    CaptureAndPromoteKnight = 12 << Move::FLG_BITS,

    /// A pawn captures onto the last rank and becomes a Bishop.
    CaptureAndPromoteBishop = 13 << Move::FLG_BITS,

    /// A pawn captures onto the last rank and becomes a Rook.
    CaptureAndPromoteRook = 14 << Move::FLG_BITS,

    /// A pawn captures onto the last rank and becomes a Queen.
    CaptureAndPromoteQueen = 15 << Move::FLG_BITS,
}

impl MoveKind {
    /// Creates a new [`MoveKind`] that is a promotion to the provided [`PieceKind`].
    ///
    /// # Panics
    /// This function will panic if `promotion` is not a Knight, Bishop, Rook, or Queen.
    #[inline(always)]
    pub fn promotion(promotion: PieceKind) -> Self {
        match promotion {
            PieceKind::Knight => Self::PromoteKnight,
            PieceKind::Bishop => Self::PromoteBishop,
            PieceKind::Rook => Self::PromoteRook,
            PieceKind::Queen => Self::PromoteQueen,
            _ => unreachable!(),
        }
    }

    /// Creates a new [`MoveKind`] that is a capture and promotion to the provided [`PieceKind`].
    ///
    /// # Panics
    /// This function will panic if `promotion` is not a Knight, Bishop, Rook, or Queen.
    #[inline(always)]
    pub fn promotion_capture(promotion: PieceKind) -> Self {
        match promotion {
            PieceKind::Knight => Self::CaptureAndPromoteKnight,
            PieceKind::Bishop => Self::CaptureAndPromoteBishop,
            PieceKind::Rook => Self::CaptureAndPromoteRook,
            PieceKind::Queen => Self::CaptureAndPromoteQueen,
            _ => unreachable!(),
        }
    }
}

impl fmt::Display for MoveKind {
    /// Displays a human-readable description for this [`MoveKind`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Quiet => "Quiet",
            Self::DoublePawnPush => "Double Pawn Push",
            Self::KingSideCastle => "King-Side Castle",
            Self::QueenSideCastle => "Queen-Side Castle",
            Self::Capture => "Capture",
            Self::EnPassant => "En Passant",
            Self::PromoteKnight => "Promotion (Knight)",
            Self::PromoteBishop => "Promotion (Bishop)",
            Self::PromoteRook => "Promotion (Rook)",
            Self::PromoteQueen => "Promotion (Queen)",
            Self::CaptureAndPromoteKnight => "Capture and Promotion (Knight)",
            Self::CaptureAndPromoteBishop => "Capture and Promotion (Bishop)",
            Self::CaptureAndPromoteRook => "Capture and Promotion (Rook)",
            Self::CaptureAndPromoteQueen => "Capture and Promotion (Queen)",
        };

        write!(f, "{s}")
    }
}

/// Represents a categorised move made on a chess board.
///
/// Internally encoded using the following bit pattern:
/// ```text
///     0000 000000 000000
///      |     |      |
///      |     |      +- Source square of the move.
///      |     +- Target square of the move.
///      +- Category flags (promotion, castling, etc.)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Move(u16);

impl Move {
    /// Mask for the source ("from") bits.
    const SRC_MASK: u16 = 0b0000_0000_0011_1111;
    /// Mask for the destination ("to") bits.
    const DST_MASK: u16 = 0b0000_1111_1100_0000;
    /// Mask for the category flag bits.
    const FLG_MASK: u16 = 0b1111_0000_0000_0000;
    /// Start index of destination bits.
    const DST_BITS: u16 = 6;
    /// Start index of flag bits.
    const FLG_BITS: u16 = 12;

    const FLAG_DOUBLE_PUSH: u16 = 1 << Self::FLG_BITS;
    const FLAG_CASTLE_SHORT: u16 = 2 << Self::FLG_BITS;
    const FLAG_CASTLE_LONG: u16 = 3 << Self::FLG_BITS;
    const FLAG_CAPTURE: u16 = 4 << Self::FLG_BITS;
    const FLAG_EP_CAPTURE: u16 = 5 << Self::FLG_BITS;
    const FLAG_PROMO_KNIGHT: u16 = 8 << Self::FLG_BITS;
    const FLAG_PROMO_BISHOP: u16 = 9 << Self::FLG_BITS;
    const FLAG_PROMO_ROOK: u16 = 10 << Self::FLG_BITS;
    const FLAG_PROMO_QUEEN: u16 = 11 << Self::FLG_BITS;
    const FLAG_CAPTURE_PROMO_KNIGHT: u16 = 12 << Self::FLG_BITS;
    const FLAG_CAPTURE_PROMO_BISHOP: u16 = 13 << Self::FLG_BITS;
    const FLAG_CAPTURE_PROMO_ROOK: u16 = 14 << Self::FLG_BITS;
    const FLAG_CAPTURE_PROMO_QUEEN: u16 = 15 << Self::FLG_BITS;

    /// Creates a new [`Move`] from the given [`Square`]s and a [`MoveKind`].
    ///
    /// # Example
    /// ```
    /// # use stoat::{Move, MoveKind, PieceKind, Square};
    /// let e2e4 = Move::new(Square::E2, Square::E4, MoveKind::DoublePawnPush);
    /// assert_eq!(e2e4.to_string(), "e2e4");
    ///
    /// let e7e8n = Move::new(Square::E7, Square::E8, MoveKind::promotion(PieceKind::Knight));
    /// assert_eq!(e7e8n.to_string(), "e7e8n");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self(kind as u16 | (to.0 as u16) << Self::DST_BITS | from.0 as u16)
    }

    /// Fetches the source (or "from") part of this [`Move`], as a [`Square`].
    #[inline(always)]
    pub const fn from(&self) -> Square {
        Square((self.0 & Self::SRC_MASK) as u8)
    }

    /// Fetches the destination (or "to") part of this [`Move`], as a [`Square`].
    #[inline(always)]
    pub const fn to(&self) -> Square {
        Square(((self.0 & Self::DST_MASK) >> Self::DST_BITS) as u8)
    }

    /// Fetches the [`MoveKind`] part of this [`Move`].
    #[inline(always)]
    pub fn kind(&self) -> MoveKind {
        // Safety: Since a `Move` can ONLY be constructed through the public API,
        // any instance of a `Move` is guaranteed to have a valid bit pattern for its `MoveKind`.
        unsafe { std::mem::transmute(self.0 & Self::FLG_MASK) }
    }

    /// Returns `true` if this [`Move`] is a capture of any kind
    /// (capture, promotion-capture, en passant).
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.0 & Self::FLAG_CAPTURE != 0
    }

    /// Returns `true` if this [`Move`] is en passant.
    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        (self.0 & Self::FLG_MASK) ^ Self::FLAG_EP_CAPTURE == 0
    }

    /// Returns `true` if this [`Move`] is a short (king-side) castle.
    #[inline(always)]
    pub const fn is_short_castle(&self) -> bool {
        (self.0 & Self::FLG_MASK) ^ Self::FLAG_CASTLE_SHORT == 0
    }

    /// Returns `true` if this [`Move`] is a long (queen-side) castle.
    #[inline(always)]
    pub const fn is_long_castle(&self) -> bool {
        (self.0 & Self::FLG_MASK) ^ Self::FLAG_CASTLE_LONG == 0
    }

    /// Returns `true` if this [`Move`] is a castle of either kind.
    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.is_short_castle() || self.is_long_castle()
    }

    /// Returns `true` if this [`Move`] is a pawn's double push.
    #[inline(always)]
    pub const fn is_double_push(&self) -> bool {
        (self.0 & Self::FLG_MASK) ^ Self::FLAG_DOUBLE_PUSH == 0
    }

    /// Returns `true` if this [`Move`] is a promotion of any kind.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        // The most-significant flag bit is set on every promotion variant.
        self.0 & Self::FLAG_PROMO_KNIGHT != 0
    }

    /// Fetches the promotion kind of this [`Move`], if it is a promotion.
    ///
    /// # Example
    /// ```
    /// # use stoat::{Move, MoveKind, PieceKind, Square};
    /// let a7a8q = Move::new(Square::A7, Square::A8, MoveKind::promotion(PieceKind::Queen));
    /// assert_eq!(a7a8q.promotion(), Some(PieceKind::Queen));
    ///
    /// let a2a3 = Move::new(Square::A2, Square::A3, MoveKind::Quiet);
    /// assert_eq!(a2a3.promotion(), None);
    /// ```
    #[inline(always)]
    pub fn promotion(&self) -> Option<PieceKind> {
        match self.0 & Self::FLG_MASK {
            Self::FLAG_PROMO_QUEEN | Self::FLAG_CAPTURE_PROMO_QUEEN => Some(PieceKind::Queen),
            Self::FLAG_PROMO_KNIGHT | Self::FLAG_CAPTURE_PROMO_KNIGHT => Some(PieceKind::Knight),
            Self::FLAG_PROMO_ROOK | Self::FLAG_CAPTURE_PROMO_ROOK => Some(PieceKind::Rook),
            Self::FLAG_PROMO_BISHOP | Self::FLAG_CAPTURE_PROMO_BISHOP => Some(PieceKind::Bishop),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    /// Formats this [`Move`] in coordinate notation: `<from><to>[promo]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.promotion() {
            Some(kind) => write!(
                f,
                "{}{}{}",
                self.from(),
                self.to(),
                kind.char().to_ascii_lowercase()
            ),
            None => write!(f, "{}{}", self.from(), self.to()),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.kind())
    }
}

/// A move intent parsed from coordinate notation: source, destination, and
/// an optional promotion kind.
pub type MoveIntent = (Square, Square, Option<PieceKind>);

/// Parses a move intent from coordinate notation: `<from><to>[promo]`,
/// where `promo` is one of `q`, `r`, `b`, `n`.
///
/// File letters and the promotion letter are case-insensitive.
///
/// # Example
/// ```
/// # use stoat::{parse_coordinate_move, PieceKind, Square};
/// let (from, to, promo) = parse_coordinate_move("e2e4").unwrap();
/// assert_eq!((from, to, promo), (Square::E2, Square::E4, None));
///
/// let (from, to, promo) = parse_coordinate_move("a7a8Q").unwrap();
/// assert_eq!((from, to, promo), (Square::A7, Square::A8, Some(PieceKind::Queen)));
/// ```
pub fn parse_coordinate_move(text: &str) -> Result<MoveIntent> {
    let text = text.trim();
    let from = text
        .get(0..2)
        .with_context(|| format!("Invalid move {text:?}: missing source square"))?
        .parse()?;
    let to = text
        .get(2..4)
        .with_context(|| format!("Invalid move {text:?}: missing destination square"))?
        .parse()?;

    let promotion = match text.get(4..) {
        None | Some("") => None,
        Some(promo) => match promo.to_ascii_lowercase().as_str() {
            "q" => Some(PieceKind::Queen),
            "r" => Some(PieceKind::Rook),
            "b" => Some(PieceKind::Bishop),
            "n" => Some(PieceKind::Knight),
            _ => bail!("Invalid move {text:?}: promotion must be one of q, r, b, n"),
        },
    };

    Ok((from, to, promotion))
}

impl FromStr for Move {
    type Err = anyhow::Error;

    /// Parses a bare [`Move`] from coordinate notation.
    ///
    /// The category cannot be recovered from text alone, so the result is a
    /// [`MoveKind::Quiet`] or plain promotion. Use the game façade to match
    /// an intent against the legal move list instead when applying moves.
    fn from_str(s: &str) -> Result<Self> {
        let (from, to, promotion) = parse_coordinate_move(s)?;
        let kind = match promotion {
            Some(kind) => MoveKind::promotion(kind),
            None => MoveKind::Quiet,
        };
        Ok(Self::new(from, to, kind))
    }
}
