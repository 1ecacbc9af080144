// crates/chess-protocol/tests/json_codec.rs
use std::convert::TryFrom;

use chess_core::{Game, Move, PieceType, Position};
use chess_protocol::{
    command_move, decode_command, decode_server_message, encode_command, encode_server_message,
    CommandType, ProtocolError, ServerMessage, UserGameCommand, WireColor,
};
use serde_json::Value;

fn sq(s: &str) -> Position {
    s.parse().unwrap()
}

#[test]
fn decodes_connect_command_without_move() {
    let cmd = decode_command(r#"{"commandType":"CONNECT","authToken":"tok","gameID":7}"#).unwrap();
    assert_eq!(cmd.command_type, CommandType::Connect);
    assert_eq!(cmd.auth_token, "tok");
    assert_eq!(cmd.game_id, 7);
    assert!(cmd.chess_move.is_none());
    assert!(matches!(command_move(&cmd), Err(ProtocolError::MissingMove)));
}

#[test]
fn decodes_make_move_with_promotion() {
    let line = r#"
        {"commandType":"MAKE_MOVE","authToken":"tok","gameID":1,
         "move":{"start":{"rank":7,"file":1},"end":{"rank":8,"file":1},"promotion":"QUEEN"}}
    "#;
    let cmd = decode_command(line).unwrap();
    assert_eq!(cmd.command_type, CommandType::MakeMove);
    assert_eq!(
        command_move(&cmd).unwrap(),
        Move::promoting(sq("a7"), sq("a8"), PieceType::Queen)
    );
}

#[test]
fn rejects_out_of_range_square() {
    let line = r#"{"commandType":"MAKE_MOVE","authToken":"t","gameID":1,
                   "move":{"start":{"rank":0,"file":1},"end":{"rank":2,"file":1}}}"#;
    let cmd = decode_command(line).unwrap();
    assert!(matches!(
        command_move(&cmd),
        Err(ProtocolError::InvalidField("position"))
    ));
}

#[test]
fn rejects_unknown_command_type() {
    let err = decode_command(r#"{"commandType":"DANCE","authToken":"t","gameID":1}"#).unwrap_err();
    assert!(matches!(err, ProtocolError::Json(_)));
    assert!(err.to_string().starts_with("malformed message"));
}

#[test]
fn encoded_command_uses_wire_field_names() {
    let cmd = UserGameCommand::make_move("tok", 3, Move::new(sq("e2"), sq("e4")));
    let value: Value = serde_json::from_str(&encode_command(&cmd).unwrap()).unwrap();

    assert_eq!(value["commandType"], "MAKE_MOVE");
    assert_eq!(value["authToken"], "tok");
    assert_eq!(value["gameID"], 3);
    assert_eq!(value["move"]["start"]["rank"], 2);
    assert_eq!(value["move"]["end"]["file"], 5);
    assert!(value["move"].get("promotion").is_none());

    let leave = UserGameCommand::new(CommandType::Leave, "tok", 3);
    let value: Value = serde_json::from_str(&encode_command(&leave).unwrap()).unwrap();
    assert!(value.get("move").is_none());
}

#[test]
fn server_messages_are_tagged_by_type() {
    let note = encode_server_message(&ServerMessage::notification("hello")).unwrap();
    let value: Value = serde_json::from_str(&note).unwrap();
    assert_eq!(value["serverMessageType"], "NOTIFICATION");
    assert_eq!(value["message"], "hello");

    let err = encode_server_message(&ServerMessage::error("Error: nope")).unwrap();
    let value: Value = serde_json::from_str(&err).unwrap();
    assert_eq!(value["serverMessageType"], "ERROR");
    assert_eq!(value["message"], "Error: nope");
}

#[test]
fn load_game_carries_board_and_optional_color() {
    let game = Game::new();

    let observer = encode_server_message(&ServerMessage::load_game(&game, None)).unwrap();
    let value: Value = serde_json::from_str(&observer).unwrap();
    assert_eq!(value["serverMessageType"], "LOAD_GAME");
    assert_eq!(value["game"]["turn"], "WHITE");
    assert_eq!(value["game"]["board"].as_array().unwrap().len(), 32);
    assert!(value.get("playerColor").is_none());

    let player = encode_server_message(&ServerMessage::load_game(
        &game,
        Some(chess_core::Color::Black),
    ))
    .unwrap();
    match decode_server_message(&player).unwrap() {
        ServerMessage::LoadGame { game: wire, player_color } => {
            assert_eq!(player_color, Some(WireColor::Black));
            assert_eq!(Game::try_from(&wire).unwrap(), game);
        }
        other => panic!("unexpected message: {:?}", other),
    }
}

#[test]
fn game_state_survives_the_wire_after_moves() {
    let mut game = Game::new();
    game.make_move(&Move::new(sq("g1"), sq("f3"))).unwrap();
    game.make_move(&Move::new(sq("d7"), sq("d5"))).unwrap();

    let line = encode_server_message(&ServerMessage::load_game(&game, None)).unwrap();
    let ServerMessage::LoadGame { game: wire, .. } = decode_server_message(&line).unwrap() else {
        panic!("expected LOAD_GAME");
    };
    let rebuilt = Game::try_from(&wire).unwrap();
    assert_eq!(rebuilt, game);
    assert_eq!(rebuilt.turn(), chess_core::Color::White);
}

#[test]
fn duplicate_squares_are_rejected() {
    let line = r#"{"serverMessageType":"LOAD_GAME","game":{"turn":"BLACK","board":[
        {"position":{"rank":1,"file":1},"piece":{"color":"WHITE","type":"KING"}},
        {"position":{"rank":1,"file":1},"piece":{"color":"BLACK","type":"KING"}}]}}"#;
    let ServerMessage::LoadGame { game: wire, .. } = decode_server_message(line).unwrap() else {
        panic!("expected LOAD_GAME");
    };
    assert!(matches!(
        Game::try_from(&wire),
        Err(ProtocolError::InvalidField("board"))
    ));
}
