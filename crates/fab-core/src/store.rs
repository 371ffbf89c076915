//! Storage ports for progress flags and per-user data.
//!
//! The engine only talks to these traits. The in-memory implementations back
//! tests and the CLI.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::FlagWrite;
use crate::error::StoreResult;

/// Durable key → value store of progress flags.
pub trait FlagStore {
    /// Read a flag, `None` when it was never written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a flag.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Write several flags as one change.
    ///
    /// The default writes them in order and stops at the first failure,
    /// leaving earlier writes in place. Stores that can commit all of them
    /// or none should override it.
    fn set_all(&mut self, writes: &[FlagWrite]) -> StoreResult<()> {
        for write in writes {
            self.set(&write.key, &write.value)?;
        }
        Ok(())
    }
}

/// Identifier of a player account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-user storage of serialized payloads.
pub trait UserStorage {
    /// Load the payload stored for `user` under `key`.
    fn find(&self, user: UserId, key: &str) -> StoreResult<Option<String>>;

    /// Replace the payload stored for `user` under `key`.
    fn save(&mut self, user: UserId, key: &str, payload: String) -> StoreResult<()>;
}

/// In-memory flag store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryFlags {
    flags: BTreeMap<String, String>,
}

impl MemoryFlags {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flags stored.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no flags are stored.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FlagStore for MemoryFlags {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.flags.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.flags.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory per-user storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<(UserId, String), String>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStorage for MemoryStorage {
    fn find(&self, user: UserId, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(&(user, key.to_string())).cloned())
    }

    fn save(&mut self, user: UserId, key: &str, payload: String) -> StoreResult<()> {
        self.entries.insert((user, key.to_string()), payload);
        Ok(())
    }
}
