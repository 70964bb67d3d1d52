/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Board, Color, File, Move, MoveKind, MoveList, Piece, PieceKind, Rank, Square};

/// Knight move offsets, as `(file, rank)` deltas.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

/// Sliding directions of a Bishop (and half of a Queen).
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Sliding directions of a Rook (and the other half of a Queen).
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// One side's castling availability.
///
/// Each right is monotonically cleared: once lost through king or rook
/// movement (or rook capture), it never comes back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    /// May castle king-side (towards the `h`-file).
    pub short: bool,
    /// May castle queen-side (towards the `a`-file).
    pub long: bool,
}

impl CastlingRights {
    /// Both rights available.
    #[inline(always)]
    pub const fn all() -> Self {
        Self {
            short: true,
            long: true,
        }
    }

    /// Neither right available.
    #[inline(always)]
    pub const fn none() -> Self {
        Self {
            short: false,
            long: false,
        }
    }
}

/// A complete chess game state.
///
/// Holds the board plus every bit of non-board state a legal-move generator
/// needs: the side to move, castling rights, the en-passant target, and the
/// half/fullmove clocks.
///
/// A [`Position`] is a plain value: [`Position::with_move_made`] returns a
/// new state and never mutates its receiver, so the search can keep one copy
/// per ply on its stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castling: [CastlingRights; Color::COUNT],
    ep_square: Option<Square>,
    halfmove: u16,
    fullmove: u16,
}

impl Position {
    /// Creates a [`Position`] for the standard chess starting setup, White to move.
    ///
    /// # Example
    /// ```
    /// # use stoat::Position;
    /// let position = Position::new();
    /// assert_eq!(position.legal_moves().len(), 20);
    /// ```
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            board: Board::initial_setup(),
            side_to_move: Color::White,
            castling: [CastlingRights::all(); Color::COUNT],
            ep_square: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    /// Creates a [`PositionBuilder`] for assembling an arbitrary position.
    #[inline(always)]
    pub fn builder() -> PositionBuilder {
        PositionBuilder::new()
    }

    /// Fetches the board of this position.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Fetches the [`Color`] whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Fetches the castling rights of `color`.
    #[inline(always)]
    pub const fn castling_rights(&self, color: Color) -> CastlingRights {
        self.castling[color.index()]
    }

    /// Fetches the en-passant target square, if a double pawn push was just played.
    ///
    /// This is the square the pushed pawn *traversed*, not its destination.
    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Fetches the halfmove clock: plies since the last capture or pawn move.
    #[inline(always)]
    pub const fn halfmove(&self) -> u16 {
        self.halfmove
    }

    /// Fetches the fullmove counter, starting at 1 and incremented after Black moves.
    #[inline(always)]
    pub const fn fullmove(&self) -> u16 {
        self.fullmove
    }

    /// Locates `color`'s King.
    ///
    /// # Panics
    /// If the board holds no King of that color. Every reachable state has
    /// exactly one King per side, so this indicates a corrupted setup.
    pub fn king_square(&self, color: Color) -> Square {
        Square::iter()
            .find(|&square| {
                self.board
                    .piece_at(square)
                    .is_some_and(|piece| piece.is_king() && piece.color() == color)
            })
            .unwrap_or_else(|| panic!("no {color} king on the board"))
    }

    /// Returns `true` if any piece of `by` attacks `square`.
    ///
    /// The test is geometric: a piece "attacks" a square if it could capture
    /// onto it, regardless of whose turn it is or what occupies the square.
    /// Pawns only attack diagonally forward.
    pub fn is_attacked_by(&self, square: Square, by: Color) -> bool {
        // A pawn of `by` attacks `square` if it sits one step diagonally
        // *behind* it, from `by`'s point of view.
        let pawn_rank_delta = -by.forward();
        for file_delta in [-1, 1] {
            if let Some(candidate) = square.offset(file_delta, pawn_rank_delta) {
                if let Some(piece) = self.board.piece_at(candidate) {
                    if piece.color() == by && piece.kind() == PieceKind::Pawn {
                        return true;
                    }
                }
            }
        }

        for (file_delta, rank_delta) in KNIGHT_OFFSETS {
            if let Some(candidate) = square.offset(file_delta, rank_delta) {
                if let Some(piece) = self.board.piece_at(candidate) {
                    if piece.color() == by && piece.kind() == PieceKind::Knight {
                        return true;
                    }
                }
            }
        }

        if self.ray_hits(square, by, DIAGONALS, PieceKind::Bishop)
            || self.ray_hits(square, by, ORTHOGONALS, PieceKind::Rook)
        {
            return true;
        }

        for (file_delta, rank_delta) in DIAGONALS.into_iter().chain(ORTHOGONALS) {
            if let Some(candidate) = square.offset(file_delta, rank_delta) {
                if let Some(piece) = self.board.piece_at(candidate) {
                    if piece.color() == by && piece.is_king() {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Walks each ray in `directions` away from `square` and reports whether
    /// the first piece encountered is a `by`-colored slider of `kind` or Queen.
    fn ray_hits(
        &self,
        square: Square,
        by: Color,
        directions: [(i8, i8); 4],
        kind: PieceKind,
    ) -> bool {
        for (file_delta, rank_delta) in directions {
            let mut current = square;
            while let Some(next) = current.offset(file_delta, rank_delta) {
                current = next;
                match self.board.piece_at(current) {
                    None => continue,
                    Some(piece) => {
                        if piece.color() == by
                            && (piece.kind() == kind || piece.kind() == PieceKind::Queen)
                        {
                            return true;
                        }
                        break;
                    }
                }
            }
        }
        false
    }

    /// Returns `true` if `color`'s King is attacked by the opponent.
    #[inline(always)]
    pub fn in_check(&self, color: Color) -> bool {
        self.is_attacked_by(self.king_square(color), color.opponent())
    }

    /// Generates all pseudo-legal moves for the side to move.
    ///
    /// Pseudo-legal moves satisfy piece-movement geometry but may leave the
    /// mover's own King in check; [`Position::legal_moves`] filters those out.
    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let side = self.side_to_move;

        for (from, piece) in self.board.iter() {
            if piece.color() != side {
                continue;
            }

            match piece.kind() {
                PieceKind::Pawn => self.pawn_moves(from, side, &mut moves),
                PieceKind::Knight => self.knight_moves(from, side, &mut moves),
                PieceKind::Bishop => self.sliding_moves(from, side, DIAGONALS, &mut moves),
                PieceKind::Rook => self.sliding_moves(from, side, ORTHOGONALS, &mut moves),
                PieceKind::Queen => {
                    self.sliding_moves(from, side, DIAGONALS, &mut moves);
                    self.sliding_moves(from, side, ORTHOGONALS, &mut moves);
                }
                PieceKind::King => self.king_moves(from, side, &mut moves),
            }
        }

        moves
    }

    fn pawn_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        let forward = color.forward();
        let last_rank = Rank::promotion(color);

        if let Some(single) = from.offset(0, forward) {
            if self.board.is_empty(single) {
                if single.rank() == last_rank {
                    for kind in PieceKind::promotions() {
                        moves.push(Move::new(from, single, MoveKind::promotion(kind)));
                    }
                } else {
                    moves.push(Move::new(from, single, MoveKind::Quiet));
                }

                // The double push must pass through the single-push square.
                if from.rank() == Rank::pawn_start(color) {
                    if let Some(double) = from.offset(0, 2 * forward) {
                        if self.board.is_empty(double) {
                            moves.push(Move::new(from, double, MoveKind::DoublePawnPush));
                        }
                    }
                }
            }
        }

        for file_delta in [-1, 1] {
            let Some(target) = from.offset(file_delta, forward) else {
                continue;
            };

            match self.board.piece_at(target) {
                Some(victim) if victim.color() != color => {
                    if target.rank() == last_rank {
                        for kind in PieceKind::promotions() {
                            moves.push(Move::new(from, target, MoveKind::promotion_capture(kind)));
                        }
                    } else {
                        moves.push(Move::new(from, target, MoveKind::Capture));
                    }
                }
                None if Some(target) == self.ep_square => {
                    moves.push(Move::new(from, target, MoveKind::EnPassant));
                }
                _ => {}
            }
        }
    }

    fn knight_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        for (file_delta, rank_delta) in KNIGHT_OFFSETS {
            let Some(to) = from.offset(file_delta, rank_delta) else {
                continue;
            };

            match self.board.piece_at(to) {
                None => moves.push(Move::new(from, to, MoveKind::Quiet)),
                Some(victim) if victim.color() != color => {
                    moves.push(Move::new(from, to, MoveKind::Capture));
                }
                Some(_) => {}
            }
        }
    }

    fn sliding_moves(
        &self,
        from: Square,
        color: Color,
        directions: [(i8, i8); 4],
        moves: &mut MoveList,
    ) {
        for (file_delta, rank_delta) in directions {
            let mut current = from;
            while let Some(to) = current.offset(file_delta, rank_delta) {
                current = to;
                match self.board.piece_at(to) {
                    None => moves.push(Move::new(from, to, MoveKind::Quiet)),
                    Some(victim) => {
                        if victim.color() != color {
                            moves.push(Move::new(from, to, MoveKind::Capture));
                        }
                        break;
                    }
                }
            }
        }
    }

    fn king_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        for file_delta in -1..=1 {
            for rank_delta in -1..=1 {
                if file_delta == 0 && rank_delta == 0 {
                    continue;
                }
                let Some(to) = from.offset(file_delta, rank_delta) else {
                    continue;
                };

                match self.board.piece_at(to) {
                    None => moves.push(Move::new(from, to, MoveKind::Quiet)),
                    Some(victim) if victim.color() != color => {
                        moves.push(Move::new(from, to, MoveKind::Capture));
                    }
                    Some(_) => {}
                }
            }
        }

        // Castling: the right must be intact, the rook on its home corner,
        // and the path between them clear. Attack constraints on the King's
        // own path are checked by the legality filter.
        let rights = self.castling[color.index()];
        let back = Rank::back(color);

        if rights.short && self.rook_at_home(color, Square::new(File::H, back)) {
            let f_square = Square::new(File::F, back);
            let g_square = Square::new(File::G, back);
            if self.board.is_empty(f_square) && self.board.is_empty(g_square) {
                moves.push(Move::new(from, g_square, MoveKind::KingSideCastle));
            }
        }
        if rights.long && self.rook_at_home(color, Square::new(File::A, back)) {
            let b_square = Square::new(File::B, back);
            let c_square = Square::new(File::C, back);
            let d_square = Square::new(File::D, back);
            if self.board.is_empty(b_square)
                && self.board.is_empty(c_square)
                && self.board.is_empty(d_square)
            {
                moves.push(Move::new(from, c_square, MoveKind::QueenSideCastle));
            }
        }
    }

    fn rook_at_home(&self, color: Color, corner: Square) -> bool {
        self.board
            .piece_at(corner)
            .is_some_and(|piece| piece.is_rook() && piece.color() == color)
    }

    /// Generates all legal moves for the side to move.
    ///
    /// Every pseudo-legal move is simulated on a copy; any move that would
    /// leave the mover's King attacked is rejected. Castling is additionally
    /// rejected if the King's current square or the square it crosses is
    /// attacked (its destination falls out of the simulation check).
    pub fn legal_moves(&self) -> MoveList {
        let side = self.side_to_move;
        let enemy = side.opponent();
        let king = self.king_square(side);
        let back = Rank::back(side);

        let mut legal = MoveList::new();
        for mv in self.pseudo_legal_moves() {
            if mv.is_castle() {
                // Castling out of check is illegal.
                if self.is_attacked_by(king, enemy) {
                    continue;
                }
                // As is castling *through* an attacked square. Only the
                // square the King crosses matters; the b-file square of a
                // queen-side castle may be attacked freely.
                let crossed = if mv.is_short_castle() {
                    Square::new(File::F, back)
                } else {
                    Square::new(File::D, back)
                };
                if self.is_attacked_by(crossed, enemy) {
                    continue;
                }
            }

            let next = self.with_move_made(mv);
            if !next.is_attacked_by(next.king_square(side), enemy) {
                legal.push(mv);
            }
        }

        legal
    }

    /// Applies `mv` to a copy of this position, returning the new state.
    ///
    /// The move must come from this position's move generator; no legality
    /// checking is performed here. The receiver is never mutated.
    ///
    /// # Panics
    /// If `mv`'s source square is empty.
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut next = *self;
        let piece = self
            .board
            .piece_at(mv.from())
            .expect("attempted to move a piece from an empty square");
        let color = piece.color();

        // The en-passant window lasts exactly one ply.
        next.ep_square = None;

        // Capturing a rook on its home corner revokes the right it backed.
        if let Some(victim) = self.board.piece_at(mv.to()) {
            if victim.color() != color {
                next.clear_castling_for_corner(mv.to());
            }
        }

        next.board.move_piece(mv.from(), mv.to());

        if let Some(kind) = mv.promotion() {
            next.board.place(mv.to(), Piece::new(color, kind));
        }

        if mv.is_en_passant() {
            // The captured pawn sits beside the destination, on the mover's
            // starting rank.
            let captured = Square::new(mv.to().file(), mv.from().rank());
            next.board.set(captured, None);
        }

        if piece.is_king() {
            next.castling[color.index()] = CastlingRights::none();
            let back = Rank::back(color);
            if mv.is_short_castle() {
                next.board
                    .move_piece(Square::new(File::H, back), Square::new(File::F, back));
            } else if mv.is_long_castle() {
                next.board
                    .move_piece(Square::new(File::A, back), Square::new(File::D, back));
            }
        }

        if piece.is_rook() {
            next.clear_castling_for_rook(color, mv.from());
        }

        // Belt-and-braces for the capture cases handled above; en passant
        // can never take a rook, so this is a no-op for it.
        if mv.is_capture() {
            next.clear_castling_for_corner(mv.to());
        }

        if mv.is_double_push() {
            next.ep_square = mv.from().offset(0, color.forward());
        }

        if piece.is_pawn() || mv.is_capture() {
            next.halfmove = 0;
        } else {
            next.halfmove += 1;
        }

        if self.side_to_move.is_black() {
            next.fullmove += 1;
        }
        next.side_to_move = self.side_to_move.opponent();

        next
    }

    /// Clears whichever castling right is backed by a rook on `square`,
    /// for either color.
    fn clear_castling_for_corner(&mut self, square: Square) {
        for color in Color::all() {
            let back = Rank::back(color);
            if square == Square::new(File::A, back) {
                self.castling[color.index()].long = false;
            } else if square == Square::new(File::H, back) {
                self.castling[color.index()].short = false;
            }
        }
    }

    /// Clears `color`'s castling right when its rook leaves a home corner.
    fn clear_castling_for_rook(&mut self, color: Color, from: Square) {
        let back = Rank::back(color);
        if from == Square::new(File::A, back) {
            self.castling[color.index()].long = false;
        } else if from == Square::new(File::H, back) {
            self.castling[color.index()].short = false;
        }
    }

    /// Returns a copy of this position with the side to move overridden.
    ///
    /// Used by the search to answer "best move for `color`" on positions
    /// where it is not `color`'s turn.
    #[inline(always)]
    pub(crate) const fn with_side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    /// Counts the leaf nodes of the legal-move tree at the given depth.
    ///
    /// A correctness tool: any discrepancy against known node counts points
    /// at a movegen bug.
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_moves();
        // At the last level the children are exactly the legal moves.
        if depth == 1 {
            return moves.len() as u64;
        }

        moves
            .into_iter()
            .map(|mv| self.with_move_made(mv).perft(depth - 1))
            .sum()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    /// Renders the board followed by a one-line summary of whose turn it is.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f)?;
        write!(f, "{} to move", self.side_to_move)
    }
}

/// Assembles an arbitrary [`Position`] piece by piece.
///
/// Starts from an empty board with no castling rights and no en-passant
/// target, White to move. Useful for tests and custom setups; there is no
/// FEN layer.
///
/// # Example
/// ```
/// # use stoat::{Color, Piece, PieceKind, Position, Square};
/// let position = Position::builder()
///     .piece(Square::E1, Piece::new(Color::White, PieceKind::King))
///     .piece(Square::E8, Piece::new(Color::Black, PieceKind::King))
///     .side_to_move(Color::Black)
///     .build();
/// assert_eq!(position.side_to_move(), Color::Black);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PositionBuilder {
    board: Board,
    side_to_move: Color,
    castling: [CastlingRights; Color::COUNT],
    ep_square: Option<Square>,
}

impl PositionBuilder {
    /// Creates a new, empty [`PositionBuilder`].
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            side_to_move: Color::White,
            castling: [CastlingRights::none(); Color::COUNT],
            ep_square: None,
        }
    }

    /// Places `piece` on `square`.
    #[inline(always)]
    pub fn piece(mut self, square: Square, piece: Piece) -> Self {
        self.board.place(square, piece);
        self
    }

    /// Sets the side to move.
    #[inline(always)]
    pub fn side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    /// Sets `color`'s castling rights.
    #[inline(always)]
    pub fn castling(mut self, color: Color, rights: CastlingRights) -> Self {
        self.castling[color.index()] = rights;
        self
    }

    /// Sets the en-passant target square.
    #[inline(always)]
    pub fn ep_square(mut self, square: Square) -> Self {
        self.ep_square = Some(square);
        self
    }

    /// Builds the [`Position`], with fresh move clocks.
    #[inline(always)]
    pub fn build(self) -> Position {
        Position {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            ep_square: self.ep_square,
            halfmove: 0,
            fullmove: 1,
        }
    }
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kings() -> PositionBuilder {
        Position::builder()
            .piece(Square::E1, Piece::new(Color::White, PieceKind::King))
            .piece(Square::E8, Piece::new(Color::Black, PieceKind::King))
    }

    #[test]
    fn twenty_legal_moves_from_the_start() {
        let position = Position::new();
        assert_eq!(position.pseudo_legal_moves().len(), 20);
        assert_eq!(position.legal_moves().len(), 20);
    }

    #[test]
    fn with_move_made_never_mutates_the_receiver() {
        let position = Position::new();
        let copy = position;

        for mv in position.legal_moves() {
            let _ = position.with_move_made(mv);
        }

        assert_eq!(position, copy);
    }

    #[test]
    fn double_push_sets_the_traversed_square_as_ep_target() {
        let position = Position::new();
        let e2e4 = Move::new(Square::E2, Square::E4, MoveKind::DoublePawnPush);
        let next = position.with_move_made(e2e4);
        assert_eq!(next.ep_square(), Some(Square::E3));

        // The window closes after any reply.
        let reply = Move::new(Square::G8, Square::F6, MoveKind::Quiet);
        assert_eq!(next.with_move_made(reply).ep_square(), None);
    }

    #[test]
    fn blocked_pawn_has_neither_push() {
        let position = kings()
            .piece(Square::E2, Piece::new(Color::White, PieceKind::Pawn))
            .piece(Square::E3, Piece::new(Color::Black, PieceKind::Knight))
            .build();

        let from_e2: Vec<_> = position
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.from() == Square::E2)
            .collect();
        assert!(from_e2.is_empty());
    }

    #[test]
    fn double_push_requires_an_empty_destination() {
        let position = kings()
            .piece(Square::E2, Piece::new(Color::White, PieceKind::Pawn))
            .piece(Square::E4, Piece::new(Color::Black, PieceKind::Knight))
            .build();

        let targets: Vec<_> = position
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.from() == Square::E2)
            .map(|mv| mv.to())
            .collect();
        assert_eq!(targets, vec![Square::E3]);
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let position = kings()
            .piece(Square::A4, Piece::new(Color::White, PieceKind::Rook))
            .piece(Square::D4, Piece::new(Color::Black, PieceKind::Pawn))
            .build();

        let rook_targets: Vec<_> = position
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.from() == Square::A4)
            .map(|mv| mv.to())
            .collect();

        assert!(rook_targets.contains(&Square::D4)); // capture ends the ray
        assert!(!rook_targets.contains(&Square::E4)); // beyond the blocker
    }

    #[test]
    fn attack_test_sees_all_piece_kinds() {
        let position = kings()
            .piece(Square::B3, Piece::new(Color::White, PieceKind::Bishop))
            .piece(Square::G1, Piece::new(Color::White, PieceKind::Knight))
            .piece(Square::D2, Piece::new(Color::White, PieceKind::Pawn))
            .build();

        assert!(position.is_attacked_by(Square::F7, Color::White)); // bishop ray
        assert!(position.is_attacked_by(Square::F3, Color::White)); // knight
        assert!(position.is_attacked_by(Square::C3, Color::White)); // pawn, diagonally
        assert!(!position.is_attacked_by(Square::D3, Color::White)); // pawns don't attack forward
        assert!(position.is_attacked_by(Square::D1, Color::White)); // king
    }

    #[test]
    fn pawn_attacks_are_color_relative() {
        let position = kings()
            .piece(Square::D5, Piece::new(Color::Black, PieceKind::Pawn))
            .build();

        assert!(position.is_attacked_by(Square::C6, Color::Black));
        assert!(position.is_attacked_by(Square::E6, Color::Black));
        assert!(!position.is_attacked_by(Square::C4, Color::Black));
    }

    #[test]
    fn moves_leaving_the_king_in_check_are_filtered() {
        // The rook on e4 is pinned against the king by the black rook on e7.
        let position = kings()
            .piece(Square::E4, Piece::new(Color::White, PieceKind::Rook))
            .piece(Square::E7, Piece::new(Color::Black, PieceKind::Rook))
            .build();

        for mv in position.legal_moves() {
            if mv.from() == Square::E4 {
                assert_eq!(
                    mv.to().file(),
                    File::E,
                    "pinned rook may only move along the pin: {mv}"
                );
            }
        }
    }

    #[test]
    fn castle_moves_the_rook_too() {
        let position = kings()
            .piece(Square::H1, Piece::new(Color::White, PieceKind::Rook))
            .piece(Square::A1, Piece::new(Color::White, PieceKind::Rook))
            .castling(Color::White, CastlingRights::all())
            .build();

        let short = Move::new(Square::E1, Square::G1, MoveKind::KingSideCastle);
        let next = position.with_move_made(short);
        assert_eq!(
            next.board().piece_at(Square::G1),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            next.board().piece_at(Square::F1),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert!(next.board().is_empty(Square::H1));
        assert_eq!(next.castling_rights(Color::White), CastlingRights::none());

        let long = Move::new(Square::E1, Square::C1, MoveKind::QueenSideCastle);
        let next = position.with_move_made(long);
        assert_eq!(
            next.board().piece_at(Square::C1),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            next.board().piece_at(Square::D1),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert!(next.board().is_empty(Square::A1));
    }

    #[test]
    fn rook_moves_and_rook_captures_clear_rights() {
        let position = kings()
            .piece(Square::H1, Piece::new(Color::White, PieceKind::Rook))
            .piece(Square::A1, Piece::new(Color::White, PieceKind::Rook))
            .piece(Square::H8, Piece::new(Color::Black, PieceKind::Rook))
            .castling(Color::White, CastlingRights::all())
            .castling(Color::Black, CastlingRights { short: true, long: false })
            .build();

        // Moving the h-rook loses the short right only.
        let h1h4 = Move::new(Square::H1, Square::H4, MoveKind::Quiet);
        let next = position.with_move_made(h1h4);
        assert_eq!(
            next.castling_rights(Color::White),
            CastlingRights { short: false, long: true }
        );

        // Capturing Black's h-rook on its home corner revokes Black's right.
        let h1h8 = Move::new(Square::H1, Square::H8, MoveKind::Capture);
        let next = position.with_move_made(h1h8);
        assert_eq!(next.castling_rights(Color::Black), CastlingRights::none());
    }

    #[test]
    fn castling_rights_never_increase() {
        let mut position = Position::new();
        for _ in 0..40 {
            let Some(mv) = position.legal_moves().into_iter().next() else {
                break;
            };
            let before = [
                position.castling_rights(Color::White),
                position.castling_rights(Color::Black),
            ];
            position = position.with_move_made(mv);
            for color in Color::all() {
                let prior = before[color.index()];
                let current = position.castling_rights(color);
                assert!(!current.short || prior.short);
                assert!(!current.long || prior.long);
            }
        }
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_moves_and_captures() {
        let position = Position::new();
        let knight = Move::new(Square::G1, Square::F3, MoveKind::Quiet);
        let after_knight = position.with_move_made(knight);
        assert_eq!(after_knight.halfmove(), 1);

        let pawn = Move::new(Square::E7, Square::E5, MoveKind::DoublePawnPush);
        let after_pawn = after_knight.with_move_made(pawn);
        assert_eq!(after_pawn.halfmove(), 0);
        assert_eq!(after_pawn.fullmove(), 2);
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let position = kings()
            .piece(Square::A7, Piece::new(Color::White, PieceKind::Pawn))
            .build();

        for kind in PieceKind::promotions() {
            let mv = Move::new(Square::A7, Square::A8, MoveKind::promotion(kind));
            let next = position.with_move_made(mv);
            assert_eq!(
                next.board().piece_at(Square::A8),
                Some(Piece::new(Color::White, kind))
            );
            assert!(next.board().is_empty(Square::A7));
        }
    }

    #[test]
    fn en_passant_removes_the_bypassing_pawn() {
        let position = kings()
            .piece(Square::E5, Piece::new(Color::White, PieceKind::Pawn))
            .piece(Square::D5, Piece::new(Color::Black, PieceKind::Pawn))
            .ep_square(Square::D6)
            .build();

        let capture = position
            .legal_moves()
            .into_iter()
            .find(|mv| mv.is_en_passant())
            .expect("en passant should be generated");
        assert_eq!(capture.to(), Square::D6);

        let next = position.with_move_made(capture);
        assert_eq!(
            next.board().piece_at(Square::D6),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert!(next.board().is_empty(Square::D5));
        assert!(next.board().is_empty(Square::E5));
        assert_eq!(next.ep_square(), None);
    }

    #[test]
    #[should_panic(expected = "no White king")]
    fn missing_king_is_fatal() {
        let position = Position::builder().build();
        let _ = position.king_square(Color::White);
    }
}
