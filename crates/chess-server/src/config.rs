//! Configuration for the chess TCP server.
//!
//! Defaults can be overridden via a few environment variables:
//!
//! - `CHESS_BIND_ADDR`   (default: "0.0.0.0")
//! - `CHESS_PORT`        (default: "8080")
//! - `CHESS_MAX_CLIENTS` (default: "1024")
//! - `CHESS_SEED_FILE`   (optional TOML file with users and games)
//!
//! The seed file stands in for the registration and lobby services,
//! which live outside this server:
//!
//! ```toml
//! [[users]]
//! username = "alice"
//! token = "alice-token"
//!
//! [[games]]
//! name = "friendly"
//! white = "alice"
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use chess_core::Color;
use serde::Deserialize;

use crate::store::{join_match, Identity, MatchRecord, MatchStore, MemoryAuth};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// Users and games to preload into the in-memory services.
    pub seed_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            max_clients: 1024,
            seed_file: None,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to reasonable defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();
        let bind_addr = env::var("CHESS_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = read_env_or_default("CHESS_PORT", defaults.port)?;
        let max_clients = read_env_or_default("CHESS_MAX_CLIENTS", defaults.max_clients)?;
        let seed_file = env::var_os("CHESS_SEED_FILE").map(PathBuf::from);

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            seed_file,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Read and parse the seed file, if one is configured.
    pub fn load_seed(&self) -> anyhow::Result<Option<Seed>> {
        let Some(path) = &self.seed_file else {
            return Ok(None);
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        let seed = Seed::parse(&text)
            .with_context(|| format!("parsing seed file {}", path.display()))?;
        Ok(Some(seed))
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, val)),
        Err(_) => Ok(default),
    }
}

// -----------------------------------------------------------------------------
// Seed file
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub games: Vec<SeedGame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedGame {
    pub name: String,
    pub white: Option<String>,
    pub black: Option<String>,
}

impl Seed {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Register the users and create the games, seating named players.
    pub fn apply(&self, auth: &MemoryAuth, store: &dyn MatchStore) -> anyhow::Result<()> {
        for user in &self.users {
            auth.insert(user.token.clone(), Identity::new(user.username.clone()));
        }

        for game in &self.games {
            let game_id = store.create(MatchRecord::new(game.name.clone()));
            for (color, player) in [(Color::White, &game.white), (Color::Black, &game.black)] {
                if let Some(name) = player {
                    join_match(store, game_id, Identity::new(name.clone()), color)
                        .with_context(|| format!("seating {} in game {:?}", name, game.name))?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AuthService, MemoryMatchStore};

    #[test]
    fn seed_registers_users_and_seats_players() {
        let seed = Seed::parse(
            r#"
            [[users]]
            username = "alice"
            token = "a-tok"

            [[users]]
            username = "bob"
            token = "b-tok"

            [[games]]
            name = "friendly"
            white = "alice"
            black = "bob"

            [[games]]
            name = "open"
            "#,
        )
        .unwrap();

        let auth = MemoryAuth::new();
        let store = MemoryMatchStore::new();
        seed.apply(&auth, &store).unwrap();

        assert_eq!(auth.resolve("b-tok").unwrap(), Identity::new("bob"));

        let games = store.list();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].white, Some(Identity::new("alice")));
        assert_eq!(games[0].black, Some(Identity::new("bob")));
        assert_eq!(games[1].name, "open");
        assert_eq!(games[1].white, None);
    }

    #[test]
    fn empty_seed_is_valid() {
        let seed = Seed::parse("").unwrap();
        assert!(seed.users.is_empty());
        assert!(seed.games.is_empty());
    }
}
