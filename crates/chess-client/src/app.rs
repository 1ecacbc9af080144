// crates/chess-client/src/app.rs

use std::convert::TryFrom;

use chess_core::{Board, Color, Game, Move, ParsePieceTypeError, ParsePositionError, PieceType, Position};
use chess_protocol::{CommandType, GameId, ServerMessage, UserGameCommand, WireColor};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

pub const HELP: &str = "\
commands:
  connect                          join the match (player or observer)
  move <from> <to> [promotion]     e.g. move e2 e4, move a7 a8 q
  moves <square>                   list legal moves for the piece on <square>
  leave                            leave the match
  resign                           concede the match
  help                             show this text
  quit                             exit";

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Connect,
    Move(Move),
    Moves(Position),
    Leave,
    Resign,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command {0:?}, type help for a list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Square(#[from] ParsePositionError),

    #[error(transparent)]
    Promotion(#[from] ParsePieceTypeError),
}

pub fn parse_input(line: &str) -> Result<Option<Input>, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let input = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("connect", []) => Input::Connect,
        ("connect", _) => return Err(InputError::Usage("connect")),

        ("move", [from, to]) => Input::Move(Move::new(from.parse()?, to.parse()?)),
        ("move", [from, to, promo]) => {
            let kind: PieceType = promo.parse()?;
            Input::Move(Move::promoting(from.parse()?, to.parse()?, kind))
        }
        ("move", _) => return Err(InputError::Usage("move <from> <to> [promotion]")),

        ("moves", [square]) => Input::Moves(square.parse()?),
        ("moves", _) => return Err(InputError::Usage("moves <square>")),

        ("leave", _) => Input::Leave,
        ("resign", _) => Input::Resign,
        ("help" | "?", _) => Input::Help,
        ("quit" | "exit", _) => Input::Quit,
        (other, _) => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(input))
}

/// Text grid of `board` as seen from `perspective`'s side of the table.
///
/// White sees rank 8 at the top and file a on the left; Black sees the
/// board turned around.
pub fn render_board(board: &Board, perspective: Color) -> String {
    let ranks: Vec<u8> = match perspective {
        Color::White => (1..=8).rev().collect(),
        Color::Black => (1..=8).collect(),
    };
    let files: Vec<u8> = match perspective {
        Color::White => (1..=8).collect(),
        Color::Black => (1..=8).rev().collect(),
    };

    let mut out = String::new();
    for &rank in &ranks {
        out.push_str(&format!("{} ", rank));
        for &file in &files {
            let c = board
                .get_piece(Position::new(rank, file))
                .map_or('.', |p| p.as_char());
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &file in &files {
        out.push(' ');
        out.push((b'a' + file - 1) as char);
    }
    out
}

pub struct App {
    pub auth_token: String,
    pub game_id: GameId,
    pub should_quit: bool,

    // Last state received from the server
    pub game: Option<Game>,
    pub player_color: Option<Color>,

    pub network_tx: Option<UnboundedSender<UserGameCommand>>,
}

impl App {
    pub fn new(auth_token: &str, game_id: GameId) -> Self {
        Self {
            auth_token: auth_token.to_string(),
            game_id,
            should_quit: false,
            game: None,
            player_color: None,
            network_tx: None,
        }
    }

    pub fn set_network_sender(&mut self, tx: UnboundedSender<UserGameCommand>) {
        self.network_tx = Some(tx);
    }

    /// Act on one line of user input; returns the lines to print.
    pub fn handle_input(&mut self, line: &str) -> Vec<String> {
        let input = match parse_input(line) {
            Ok(Some(input)) => input,
            Ok(None) => return Vec::new(),
            Err(e) => return vec![e.to_string()],
        };

        match input {
            Input::Connect => self.submit(CommandType::Connect, None),
            Input::Move(mv) => self.submit(CommandType::MakeMove, Some(mv)),
            Input::Leave => self.submit(CommandType::Leave, None),
            Input::Resign => self.submit(CommandType::Resign, None),
            Input::Moves(square) => self.list_moves(square),
            Input::Help => vec![HELP.to_string()],
            Input::Quit => {
                self.should_quit = true;
                Vec::new()
            }
        }
    }

    /// Render one server message; keeps the last loaded game for `moves`.
    pub fn handle_server_message(&mut self, msg: ServerMessage) -> Vec<String> {
        match msg {
            ServerMessage::LoadGame { game, player_color } => {
                if let Some(color) = player_color {
                    self.player_color = Some(match color {
                        WireColor::White => Color::White,
                        WireColor::Black => Color::Black,
                    });
                }
                match Game::try_from(&game) {
                    Ok(game) => {
                        let perspective = self.player_color.unwrap_or(Color::White);
                        let lines = vec![
                            render_board(game.board(), perspective),
                            format!("{} to move", game.turn()),
                        ];
                        self.game = Some(game);
                        lines
                    }
                    Err(e) => vec![format!("server sent an unreadable game: {}", e)],
                }
            }
            ServerMessage::Notification { message } => vec![message],
            ServerMessage::Error { message } => vec![message],
        }
    }

    fn submit(&mut self, command_type: CommandType, mv: Option<Move>) -> Vec<String> {
        let Some(tx) = &self.network_tx else {
            return vec!["not connected to a server".to_string()];
        };

        let cmd = match mv {
            Some(mv) => UserGameCommand::make_move(self.auth_token.clone(), self.game_id, mv),
            None => UserGameCommand::new(command_type, self.auth_token.clone(), self.game_id),
        };
        if tx.send(cmd).is_err() {
            self.network_tx = None;
            return vec!["connection closed".to_string()];
        }

        if command_type == CommandType::Leave {
            self.game = None;
            self.player_color = None;
        }
        Vec::new()
    }

    fn list_moves(&self, square: Position) -> Vec<String> {
        let Some(game) = &self.game else {
            return vec!["no game loaded, use connect first".to_string()];
        };

        let Some(moves) = game.valid_moves(square) else {
            return vec![format!("no piece at {}", square)];
        };
        if moves.is_empty() {
            return vec![format!("the piece at {} has no legal moves", square)];
        }

        let mut targets: Vec<String> = moves
            .iter()
            .map(|mv| match mv.promotion {
                Some(kind) => format!("{}={}", mv.end, kind.as_char()),
                None => mv.end.to_string(),
            })
            .collect();
        targets.sort();
        vec![format!("{}: {}", square, targets.join(" "))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("  "), Ok(None));
        assert_eq!(parse_input("connect"), Ok(Some(Input::Connect)));
        assert_eq!(
            parse_input("move e2 e4"),
            Ok(Some(Input::Move(Move::new(sq("e2"), sq("e4")))))
        );
        assert_eq!(
            parse_input("MOVE a7 a8 q"),
            Ok(Some(Input::Move(Move::promoting(sq("a7"), sq("a8"), PieceType::Queen))))
        );
        assert_eq!(parse_input("moves g1"), Ok(Some(Input::Moves(sq("g1")))));
        assert_eq!(parse_input("quit"), Ok(Some(Input::Quit)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse_input("move e2"), Err(InputError::Usage(_))));
        assert!(matches!(parse_input("move e2 e9"), Err(InputError::Square(_))));
        assert!(matches!(parse_input("move a7 a8 x"), Err(InputError::Promotion(_))));
        assert!(matches!(parse_input("castle"), Err(InputError::Unknown(_))));
    }

    #[test]
    fn commands_carry_token_and_game() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new("tok", 7);
        app.set_network_sender(tx);

        assert!(app.handle_input("move e2 e4").is_empty());
        let cmd = rx.try_recv().unwrap();
        assert_eq!(cmd.command_type, CommandType::MakeMove);
        assert_eq!(cmd.auth_token, "tok");
        assert_eq!(cmd.game_id, 7);
        assert!(cmd.chess_move.is_some());

        app.handle_input("resign");
        assert_eq!(rx.try_recv().unwrap().command_type, CommandType::Resign);
    }

    #[test]
    fn load_game_enables_local_move_listing() {
        let mut app = App::new("tok", 1);
        assert_eq!(
            app.handle_input("moves g1"),
            vec!["no game loaded, use connect first"]
        );

        let out = app.handle_server_message(ServerMessage::load_game(&Game::new(), Some(Color::Black)));
        assert_eq!(out.last().map(String::as_str), Some("white to move"));
        assert_eq!(app.player_color, Some(Color::Black));

        assert_eq!(app.handle_input("moves g1"), vec!["g1: f3 h3"]);
        assert_eq!(app.handle_input("moves e4"), vec!["no piece at e4"]);
        assert_eq!(
            app.handle_input("moves a1"),
            vec!["the piece at a1 has no legal moves"]
        );
    }

    #[test]
    fn board_is_drawn_from_the_players_side() {
        let board = Board::starting();

        let white = render_board(&board, Color::White);
        let lines: Vec<&str> = white.lines().collect();
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");

        let black = render_board(&board, Color::Black);
        let lines: Vec<&str> = black.lines().collect();
        assert_eq!(lines[0], "1  R N B K Q B N R");
        assert_eq!(lines[7], "8  r n b k q b n r");
        assert_eq!(lines[8], "   h g f e d c b a");
    }

    #[test]
    fn black_player_sees_the_flipped_board() {
        let mut app = App::new("tok", 1);
        let out = app.handle_server_message(ServerMessage::load_game(&Game::new(), Some(Color::Black)));
        assert!(out[0].starts_with("1  R N B K Q B N R"));

        // Later broadcasts carry no color; the orientation sticks.
        let out = app.handle_server_message(ServerMessage::load_game(&Game::new(), None));
        assert!(out[0].starts_with("1 "));
    }

    #[test]
    fn notifications_and_errors_print_verbatim() {
        let mut app = App::new("tok", 1);
        assert_eq!(
            app.handle_server_message(ServerMessage::notification("User bob left game 1")),
            vec!["User bob left game 1"]
        );
        assert_eq!(
            app.handle_server_message(ServerMessage::error("Error: game 1 does not exist")),
            vec!["Error: game 1 does not exist"]
        );
    }
}
