use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logger;
use crate::utils::errors::StorageError;

/// What is remembered about the local player for one room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredIdentity {
    pub player_id: Option<String>,
    pub player_name: Option<String>,
}

/// Durable per-room identity storage. Never fails from the caller's point of view:
/// missing entries read as absent and write failures are logged.
pub trait IdentityStore {
    fn get(&self, game_id: &str) -> Option<StoredIdentity>;
    fn put_id(&mut self, game_id: &str, player_id: &str);
    fn put_name(&mut self, game_id: &str, player_name: &str);

    fn stored_name(&self, game_id: &str) -> Option<String> {
        self.get(game_id).and_then(|identity| identity.player_name)
    }

    fn stored_id(&self, game_id: &str) -> Option<String> {
        self.get(game_id).and_then(|identity| identity.player_id)
    }
}

fn player_key(game_id: &str) -> String {
    format!("durak-player-{game_id}")
}

fn name_key(game_id: &str) -> String {
    format!("durak-name-{game_id}")
}

fn lookup(entries: &HashMap<String, String>, game_id: &str) -> Option<StoredIdentity> {
    if game_id.is_empty() {
        return None;
    }
    let identity = StoredIdentity {
        player_id: entries.get(&player_key(game_id)).cloned(),
        player_name: entries.get(&name_key(game_id)).cloned(),
    };
    if identity.player_id.is_none() && identity.player_name.is_none() {
        return None;
    }
    Some(identity)
}

/// Keeps identities for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    entries: HashMap<String, String>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn get(&self, game_id: &str) -> Option<StoredIdentity> {
        lookup(&self.entries, game_id)
    }

    fn put_id(&mut self, game_id: &str, player_id: &str) {
        if game_id.is_empty() || player_id.is_empty() {
            return;
        }
        self.entries.insert(player_key(game_id), player_id.to_string());
    }

    fn put_name(&mut self, game_id: &str, player_name: &str) {
        if game_id.is_empty() || player_name.is_empty() {
            return;
        }
        self.entries.insert(name_key(game_id), player_name.to_string());
    }
}

/// Identity store backed by a JSON file of key/value entries.
///
/// The whole map is rewritten on every change. An unreadable or corrupt file is
/// treated as empty, so a damaged store costs the player their saved seat but
/// never stops the client.
pub struct FileIdentityStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileIdentityStore {
    /// Opens the store at `path`, loading whatever entries it already holds.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(error) => {
                logger!(WARN, "[STORE] Starting with an empty identity store ({error})");
                HashMap::new()
            }
        };
        logger!(DEBUG, "[STORE] Loaded {} entries from `{}`", entries.len(), path.display());
        Self { path, entries }
    }

    fn read_entries(path: &Path) -> Result<HashMap<String, String>, StorageError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn insert(&mut self, key: String, value: &str) {
        self.entries.insert(key, value.to_string());
        if let Err(error) = self.persist() {
            logger!(ERROR, "[STORE] Could not write `{}` ({error})", self.path.display());
        }
    }
}

impl IdentityStore for FileIdentityStore {
    fn get(&self, game_id: &str) -> Option<StoredIdentity> {
        lookup(&self.entries, game_id)
    }

    fn put_id(&mut self, game_id: &str, player_id: &str) {
        if game_id.is_empty() || player_id.is_empty() {
            return;
        }
        self.insert(player_key(game_id), player_id);
    }

    fn put_name(&mut self, game_id: &str, player_name: &str) {
        if game_id.is_empty() || player_name.is_empty() {
            return;
        }
        self.insert(name_key(game_id), player_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_room_is_absent() {
        let store = MemoryIdentityStore::new();
        assert_eq!(store.get("ABC123"), None);
        assert_eq!(store.stored_name("ABC123"), None);
    }

    #[test]
    fn test_id_and_name_are_independent() {
        let mut store = MemoryIdentityStore::new();
        store.put_name("ABC123", "Ann");
        assert_eq!(
            store.get("ABC123"),
            Some(StoredIdentity {
                player_id: None,
                player_name: Some("Ann".to_string()),
            })
        );

        store.put_id("ABC123", "p1");
        assert_eq!(store.stored_id("ABC123"), Some("p1".to_string()));
        // Other rooms are untouched
        assert_eq!(store.get("XYZ999"), None);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut store = MemoryIdentityStore::new();
        store.put_name("ABC123", "");
        store.put_id("", "p1");
        assert_eq!(store.get("ABC123"), None);
        assert_eq!(store.get(""), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let mut store = FileIdentityStore::open(&path);
        store.put_id("ABC123", "p1");
        store.put_name("ABC123", "Ann");
        drop(store);

        let reopened = FileIdentityStore::open(&path);
        assert_eq!(
            reopened.get("ABC123"),
            Some(StoredIdentity {
                player_id: Some("p1".to_string()),
                player_name: Some("Ann".to_string()),
            })
        );
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = FileIdentityStore::open(&path);
        assert_eq!(store.get("ABC123"), None);

        // Writing replaces the damaged file
        store.put_name("ABC123", "Ann");
        let reopened = FileIdentityStore::open(&path);
        assert_eq!(reopened.stored_name("ABC123"), Some("Ann".to_string()));
    }
}
