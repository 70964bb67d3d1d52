/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use stoat::{
    evaluate, find_best_move, Color, Game, Piece, PieceKind, Position, Score, SearchConfig, Square,
};

#[test]
fn depth_two_search_from_the_start_returns_a_legal_move() {
    let mut game = Game::new();
    game.try_move(Square::E2, Square::E4, None).unwrap();

    let best = find_best_move(game.state(), Color::Black, SearchConfig::new(2))
        .expect("black has twenty replies");
    assert!(game.legal_moves().contains(&best));

    // The returned move must actually be playable.
    game.make_move(best);
    assert_eq!(game.state().side_to_move(), Color::White);
}

#[test]
fn the_search_result_is_reproducible() {
    let position = Position::new();
    let config = SearchConfig::new(3);

    let a = find_best_move(&position, Color::White, config);
    let b = find_best_move(&position, Color::White, config);
    assert_eq!(a, b);
}

#[test]
fn no_move_is_returned_in_terminal_positions() {
    // Checkmated side: no move.
    let mate = Position::builder()
        .piece(Square::H8, Piece::new(Color::Black, PieceKind::King))
        .piece(Square::G7, Piece::new(Color::Black, PieceKind::Pawn))
        .piece(Square::H7, Piece::new(Color::Black, PieceKind::Pawn))
        .piece(Square::E8, Piece::new(Color::White, PieceKind::Rook))
        .piece(Square::E1, Piece::new(Color::White, PieceKind::King))
        .side_to_move(Color::Black)
        .build();
    assert_eq!(
        find_best_move(&mate, Color::Black, SearchConfig::default()),
        None
    );

    // Stalemated side: no move either.
    let stale = Position::builder()
        .piece(Square::H8, Piece::new(Color::Black, PieceKind::King))
        .piece(Square::F7, Piece::new(Color::White, PieceKind::King))
        .piece(Square::G6, Piece::new(Color::White, PieceKind::Queen))
        .side_to_move(Color::Black)
        .build();
    assert_eq!(
        find_best_move(&stale, Color::Black, SearchConfig::default()),
        None
    );
}

#[test]
fn free_material_is_taken_at_depth_one() {
    let position = Position::builder()
        .piece(Square::E1, Piece::new(Color::White, PieceKind::King))
        .piece(Square::E8, Piece::new(Color::Black, PieceKind::King))
        .piece(Square::A5, Piece::new(Color::White, PieceKind::Rook))
        .piece(Square::A8, Piece::new(Color::Black, PieceKind::Rook))
        .build();

    // The black rook is free; nothing defends it.
    let best = find_best_move(&position, Color::White, SearchConfig::new(1))
        .expect("white has moves");
    assert_eq!(best.from(), Square::A5);
    assert_eq!(best.to(), Square::A8);
}

#[test]
fn poisoned_material_is_declined_at_depth_two() {
    // The black pawn on d5 is defended by the pawn on c6: taking it with
    // the queen loses 900 for 100.
    let position = Position::builder()
        .piece(Square::G1, Piece::new(Color::White, PieceKind::King))
        .piece(Square::G8, Piece::new(Color::Black, PieceKind::King))
        .piece(Square::D1, Piece::new(Color::White, PieceKind::Queen))
        .piece(Square::D5, Piece::new(Color::Black, PieceKind::Pawn))
        .piece(Square::C6, Piece::new(Color::Black, PieceKind::Pawn))
        .build();

    let best = find_best_move(&position, Color::White, SearchConfig::new(2))
        .expect("white has moves");
    assert!(
        !(best.from() == Square::D1 && best.to() == Square::D5),
        "the queen grabbed a defended pawn: {best}"
    );
}

#[test]
fn search_runs_for_a_side_out_of_turn() {
    // The position says White to move, but the driver may still ask what
    // Black would play here.
    let position = Position::new();
    let best = find_best_move(&position, Color::Black, SearchConfig::new(2))
        .expect("black has twenty first moves");

    assert!(position
        .board()
        .piece_at(best.from())
        .is_some_and(|piece| piece.color() == Color::Black));
}

#[test]
fn evaluation_tracks_material_through_a_game() {
    let mut game = Game::new();
    assert_eq!(evaluate(game.state()), Score::DRAW);

    // 1. e4 d5 2. exd5 -- White is a pawn up.
    game.try_move_coordinate("e2e4").unwrap();
    game.try_move_coordinate("d7d5").unwrap();
    game.try_move_coordinate("e4d5").unwrap();
    assert_eq!(evaluate(game.state()), Score::new(100));
}
