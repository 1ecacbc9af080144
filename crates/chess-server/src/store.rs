//! External collaborators: identity resolution and match persistence.
//!
//! The session layer only talks to the [`AuthService`] and [`MatchStore`]
//! traits. The in-memory implementations here back the server binary and
//! the tests; a database-backed store would implement the same traits.

use std::sync::atomic::{AtomicU32, Ordering};

use chess_core::{Color, Game};
use chess_protocol::GameId;
use dashmap::DashMap;

use crate::error::SessionError;

/// An authenticated user name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Identity(name.into())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted state of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub game_id: GameId,
    pub white: Option<Identity>,
    pub black: Option<Identity>,
    pub name: String,
    pub game: Game,
    pub complete: bool,
}

impl MatchRecord {
    /// A fresh match in the starting position with both slots open.
    pub fn new(name: impl Into<String>) -> Self {
        MatchRecord {
            game_id: 0,
            white: None,
            black: None,
            name: name.into(),
            game: Game::new(),
            complete: false,
        }
    }

    pub fn player(&self, color: Color) -> Option<&Identity> {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, color: Color) -> &mut Option<Identity> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Color `who` plays in this match, or `None` for an observer.
    pub fn color_of(&self, who: &Identity) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|c| self.player(*c) == Some(who))
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            game_id: self.game_id,
            white: self.white.clone(),
            black: self.black.clone(),
            name: self.name.clone(),
            complete: self.complete,
        }
    }
}

/// A match record without its board, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub game_id: GameId,
    pub white: Option<Identity>,
    pub black: Option<Identity>,
    pub name: String,
    pub complete: bool,
}

pub trait AuthService: Send + Sync {
    /// Resolve a token to the identity it was issued for.
    fn resolve(&self, token: &str) -> Result<Identity, SessionError>;
}

pub trait MatchStore: Send + Sync {
    fn get(&self, game_id: GameId) -> Option<MatchRecord>;

    /// Replace an existing record; `NotFound` if there is none.
    fn update(&self, record: MatchRecord) -> Result<(), SessionError>;

    /// Store a new record under a freshly assigned id, which is returned.
    fn create(&self, record: MatchRecord) -> GameId;

    fn list(&self) -> Vec<MatchSummary>;
}

/// Claim `color` in `game_id` for `who`.
pub fn join_match(
    store: &dyn MatchStore,
    game_id: GameId,
    who: Identity,
    color: Color,
) -> Result<(), SessionError> {
    let mut record = store.get(game_id).ok_or(SessionError::NotFound(game_id))?;

    let slot = record.slot_mut(color);
    if slot.is_some() {
        return Err(SessionError::AlreadyOccupied(color));
    }
    *slot = Some(who);

    store.update(record)
}

// -----------------------------------------------------------------------------
// In-memory implementations
// -----------------------------------------------------------------------------

/// Token → identity table.
#[derive(Debug, Default)]
pub struct MemoryAuth {
    tokens: DashMap<String, Identity>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        MemoryAuth::default()
    }

    pub fn insert(&self, token: impl Into<String>, who: Identity) {
        self.tokens.insert(token.into(), who);
    }
}

impl AuthService for MemoryAuth {
    fn resolve(&self, token: &str) -> Result<Identity, SessionError> {
        self.tokens
            .get(token)
            .map(|who| who.clone())
            .ok_or_else(|| SessionError::Unauthorized("invalid auth token".to_string()))
    }
}

/// Match records keyed by id; ids are handed out sequentially from 1.
#[derive(Debug)]
pub struct MemoryMatchStore {
    records: DashMap<GameId, MatchRecord>,
    next_id: AtomicU32,
}

impl Default for MemoryMatchStore {
    fn default() -> Self {
        MemoryMatchStore {
            records: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        MemoryMatchStore::default()
    }
}

impl MatchStore for MemoryMatchStore {
    fn get(&self, game_id: GameId) -> Option<MatchRecord> {
        self.records.get(&game_id).map(|r| r.clone())
    }

    fn update(&self, record: MatchRecord) -> Result<(), SessionError> {
        match self.records.get_mut(&record.game_id) {
            Some(mut existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(SessionError::NotFound(record.game_id)),
        }
    }

    fn create(&self, mut record: MatchRecord) -> GameId {
        let game_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        record.game_id = game_id;
        self.records.insert(game_id, record);
        game_id
    }

    fn list(&self) -> Vec<MatchSummary> {
        let mut out: Vec<MatchSummary> = self.records.iter().map(|r| r.summary()).collect();
        out.sort_by_key(|s| s.game_id);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_sequential_ids() {
        let store = MemoryMatchStore::new();
        assert_eq!(store.create(MatchRecord::new("first")), 1);
        assert_eq!(store.create(MatchRecord::new("second")), 2);

        let names: Vec<_> = store.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn update_of_unknown_match_is_not_found() {
        let store = MemoryMatchStore::new();
        let mut record = MatchRecord::new("ghost");
        record.game_id = 42;
        assert!(matches!(store.update(record), Err(SessionError::NotFound(42))));
    }

    #[test]
    fn join_fills_open_slot_once() {
        let store = MemoryMatchStore::new();
        let id = store.create(MatchRecord::new("duel"));

        join_match(&store, id, Identity::new("alice"), Color::White).unwrap();
        let err = join_match(&store, id, Identity::new("bob"), Color::White).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyOccupied(Color::White)));
        join_match(&store, id, Identity::new("bob"), Color::Black).unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.color_of(&Identity::new("alice")), Some(Color::White));
        assert_eq!(record.color_of(&Identity::new("bob")), Some(Color::Black));
        assert_eq!(record.color_of(&Identity::new("carol")), None);

        assert!(matches!(
            join_match(&store, 99, Identity::new("x"), Color::Black),
            Err(SessionError::NotFound(99))
        ));
    }

    #[test]
    fn unknown_token_is_unauthorized() {
        let auth = MemoryAuth::new();
        auth.insert("tok", Identity::new("alice"));
        assert_eq!(auth.resolve("tok").unwrap(), Identity::new("alice"));
        assert!(matches!(auth.resolve("nope"), Err(SessionError::Unauthorized(_))));
    }
}
