// crates/chess-core/tests/game_rules.rs
use chess_core::{Board, Color, Game, GameStatus, Move, MoveError, Piece, PieceType, Position};

fn sq(s: &str) -> Position {
    s.parse().expect("valid square")
}

fn mv(from: &str, to: &str) -> Move {
    Move::new(sq(from), sq(to))
}

fn game_from(pieces: &[(&str, Color, PieceType)], turn: Color) -> Game {
    let mut board = Board::new();
    for (s, color, kind) in pieces {
        board.add_piece(sq(s), Piece::new(*color, *kind));
    }
    Game::with_board(board, turn)
}

/// Every move reported as legal keeps the mover's king out of check.
fn assert_moves_never_self_check(game: &Game) {
    for (pos, piece) in game.board().pieces() {
        let moves = game.valid_moves(pos).expect("occupied square");
        for m in moves {
            let mut scratch = game.clone();
            scratch.set_turn(piece.color);
            scratch.make_move(&m).expect("reported legal");
            assert!(
                !scratch.is_in_check(piece.color),
                "{} leaves {} in check",
                m,
                piece.color
            );
        }
    }
}

#[test]
fn new_game_starts_with_white_and_twenty_moves() {
    let game = Game::new();
    assert_eq!(game.turn(), Color::White);

    let total: usize = game
        .board()
        .pieces()
        .filter(|(_, p)| p.color == Color::White)
        .map(|(pos, _)| game.valid_moves(pos).map_or(0, |m| m.len()))
        .sum();
    assert_eq!(total, 20);
    assert_eq!(game.status(Color::White), GameStatus::InProgress);
}

#[test]
fn valid_moves_is_none_for_empty_square() {
    let game = Game::new();
    assert!(game.valid_moves(sq("e4")).is_none());
}

#[test]
fn make_move_flips_turn_once_on_success() {
    let mut game = Game::new();
    game.make_move(&mv("e2", "e4")).unwrap();
    assert_eq!(game.turn(), Color::Black);
    assert_eq!(
        game.board().get_piece(sq("e4")),
        Some(Piece::new(Color::White, PieceType::Pawn))
    );

    game.make_move(&mv("e7", "e5")).unwrap();
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn set_board_replaces_the_position_and_keeps_the_turn() {
    let mut game = Game::new();
    game.make_move(&mv("e2", "e4")).unwrap();

    let mut board = Board::new();
    board.add_piece(sq("a1"), Piece::new(Color::White, PieceType::King));
    board.add_piece(sq("h8"), Piece::new(Color::Black, PieceType::King));
    board.add_piece(sq("h7"), Piece::new(Color::Black, PieceType::Pawn));
    game.set_board(board.clone());

    assert_eq!(game.board(), &board);
    assert_eq!(game.turn(), Color::Black);
    assert!(game.valid_moves(sq("e4")).is_none());
    game.make_move(&mv("h7", "h6")).unwrap();
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn rejected_moves_leave_turn_and_board_untouched() {
    let mut game = Game::new();
    let before = game.clone();

    assert_eq!(game.make_move(&mv("e4", "e5")), Err(MoveError::NoPiece(sq("e4"))));
    assert_eq!(
        game.make_move(&mv("e7", "e5")),
        Err(MoveError::WrongTurn {
            expected: Color::White,
            found: Color::Black
        })
    );
    assert_eq!(
        game.make_move(&mv("e2", "e5")),
        Err(MoveError::Illegal(mv("e2", "e5")))
    );

    assert_eq!(game, before);
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn promotion_must_name_the_piece() {
    let mut game = game_from(
        &[
            ("a7", Color::White, PieceType::Pawn),
            ("e1", Color::White, PieceType::King),
            ("e8", Color::Black, PieceType::King),
        ],
        Color::White,
    );

    assert!(game.make_move(&mv("a7", "a8")).is_err());
    game.make_move(&Move::promoting(sq("a7"), sq("a8"), PieceType::Queen))
        .unwrap();
    assert_eq!(
        game.board().get_piece(sq("a8")),
        Some(Piece::new(Color::White, PieceType::Queen))
    );
    assert!(game.is_in_check(Color::Black));
}

#[test]
fn pinned_piece_cannot_leave_the_line() {
    let game = game_from(
        &[
            ("e1", Color::White, PieceType::King),
            ("e2", Color::White, PieceType::Bishop),
            ("e8", Color::Black, PieceType::Rook),
            ("a8", Color::Black, PieceType::King),
        ],
        Color::White,
    );

    assert_eq!(game.valid_moves(sq("e2")).map(|m| m.len()), Some(0));
    assert_moves_never_self_check(&game);
}

#[test]
fn king_in_check_must_resolve_it() {
    let game = game_from(
        &[
            ("e1", Color::White, PieceType::King),
            ("h1", Color::White, PieceType::Rook),
            ("e8", Color::Black, PieceType::Rook),
            ("a8", Color::Black, PieceType::King),
        ],
        Color::White,
    );

    assert!(game.is_in_check(Color::White));
    assert_eq!(game.status(Color::White), GameStatus::Check);

    // The rook can only interpose on the e-file.
    let rook_moves = game.valid_moves(sq("h1")).unwrap();
    assert_eq!(rook_moves.len(), 0);

    let king_moves = game.valid_moves(sq("e1")).unwrap();
    assert!(king_moves.iter().all(|m| m.end.file() != 5));
    assert_moves_never_self_check(&game);
}

#[test]
fn legal_moves_never_self_check_across_positions() {
    let mut game = Game::new();
    for (from, to) in [("e2", "e4"), ("f7", "f6"), ("d1", "h5")] {
        game.make_move(&mv(from, to)).unwrap();
        assert_moves_never_self_check(&game);
    }

    // Qh5+ along the open e8-h5 diagonal; the knight cannot help.
    assert!(game.is_in_check(Color::Black));
    assert!(game.valid_moves(sq("g8")).unwrap().is_empty());
    assert!(game.make_move(&mv("g8", "h6")).is_err());
    assert_eq!(game.turn(), Color::Black);

    game.make_move(&mv("g7", "g6")).unwrap();
    assert!(!game.is_in_check(Color::Black));
    assert_moves_never_self_check(&game);
}

#[test]
fn checkmate_scenario() {
    let game = game_from(
        &[
            ("a1", Color::White, PieceType::King),
            ("b3", Color::Black, PieceType::Queen),
            ("a8", Color::Black, PieceType::Rook),
        ],
        Color::White,
    );

    assert!(game.is_in_check(Color::White));
    assert!(!game.has_any_legal_move(Color::White));
    assert!(game.is_in_checkmate(Color::White));
    assert!(!game.is_in_stalemate(Color::White));
    assert_eq!(game.status(Color::White), GameStatus::Checkmate);
}

#[test]
fn stalemate_scenario() {
    let game = game_from(
        &[
            ("a1", Color::White, PieceType::King),
            ("c2", Color::Black, PieceType::Queen),
            ("c3", Color::Black, PieceType::King),
        ],
        Color::White,
    );

    assert!(!game.is_in_check(Color::White));
    assert!(!game.has_any_legal_move(Color::White));
    assert!(game.is_in_stalemate(Color::White));
    assert!(!game.is_in_checkmate(Color::White));
    assert_eq!(game.status(Color::White), GameStatus::Stalemate);
}

#[test]
fn fools_mate_ends_the_game() {
    let mut game = Game::new();
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        game.make_move(&mv(from, to)).unwrap();
    }

    assert_eq!(game.turn(), Color::White);
    assert!(game.is_in_checkmate(Color::White));
    assert!(!game.is_in_checkmate(Color::Black));
}

#[test]
fn king_may_not_step_next_to_enemy_king() {
    let game = game_from(
        &[
            ("e4", Color::White, PieceType::King),
            ("e6", Color::Black, PieceType::King),
        ],
        Color::White,
    );

    let ends: Vec<_> = game
        .valid_moves(sq("e4"))
        .unwrap()
        .into_iter()
        .map(|m| m.end)
        .collect();
    assert_eq!(ends.len(), 5);
    assert!(!ends.contains(&sq("d5")));
    assert!(!ends.contains(&sq("e5")));
    assert!(!ends.contains(&sq("f5")));
}
