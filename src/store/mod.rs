pub mod json_store;
pub mod schema;

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use crate::error::QuizError;
use crate::store::schema::{HistoryData, decode_history};

/// Flat string key-value storage: the only contract the ledger needs.
pub trait KeyValueStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Volatile store for tests and for running without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }
}

pub fn progress_key(profile: &str) -> String {
    format!("progress-{profile}")
}

pub fn history_key(profile: &str) -> String {
    format!("history-{profile}")
}

pub fn backup_key(key: &str) -> String {
    format!("{key}-backup")
}

/// Copy a stored value that is about to be replaced because it could not be
/// read, so that a newer build can still recover it.
pub fn keep_backup<S: KeyValueStore + ?Sized>(store: &S, key: &str, raw: &str, err: &QuizError) {
    let backup = backup_key(key);
    match err {
        QuizError::NewerSchema { .. } => {
            log::warn!("{key:?} was written by a newer hanquiz ({err}); copy kept as {backup:?}")
        }
        _ => log::warn!("discarding unreadable {key:?} ({err}); copy kept as {backup:?}"),
    }
    if let Err(e) = store.set(&backup, raw) {
        log::warn!("cannot write backup {backup:?}: {e}");
    }
}

/// Session history for a profile. Unreadable history starts over empty,
/// with the old value kept under its backup key.
pub fn load_history<S: KeyValueStore + ?Sized>(store: &S, profile: &str) -> HistoryData {
    let key = history_key(profile);
    match store.get(&key) {
        Ok(Some(json)) => decode_history(&json).unwrap_or_else(|e| {
            keep_backup(store, &key, &json, &e);
            HistoryData::default()
        }),
        Ok(None) => HistoryData::default(),
        Err(e) => {
            log::warn!("cannot read session history: {e}");
            HistoryData::default()
        }
    }
}

pub fn save_history<S: KeyValueStore + ?Sized>(
    store: &S,
    profile: &str,
    data: &HistoryData,
) -> Result<(), QuizError> {
    let json =
        serde_json::to_string_pretty(data).map_err(|e| QuizError::Io(io::Error::other(e)))?;
    store.set(&history_key(profile), &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::QuizType;
    use crate::session::result::QuizResult;

    #[test]
    fn boxed_store_forwards() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn corrupt_history_loads_as_empty() {
        let store = MemoryStore::new();
        store.set(&history_key("default"), "not json").unwrap();
        assert!(load_history(&store, "default").results.is_empty());
        assert_eq!(
            store.get(&backup_key(&history_key("default"))).unwrap().as_deref(),
            Some("not json")
        );
    }

    #[test]
    fn newer_history_is_backed_up_before_it_can_be_overwritten() {
        let store = MemoryStore::new();
        let newer = r#"{"schemaVersion": 99, "results": [], "streaks": {}}"#;
        store.set(&history_key("default"), newer).unwrap();

        let mut history = load_history(&store, "default");
        assert!(history.results.is_empty());
        history.push(QuizResult::sample(QuizType::Reading, 5, 5));
        save_history(&store, "default", &history).unwrap();

        assert_eq!(
            store.get(&backup_key(&history_key("default"))).unwrap().as_deref(),
            Some(newer)
        );
    }

    #[test]
    fn history_round_trip() {
        let store = MemoryStore::new();
        let mut data = HistoryData::default();
        data.push(QuizResult::sample(QuizType::Meaning, 5, 4));
        save_history(&store, "default", &data).unwrap();
        let loaded = load_history(&store, "default");
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].correct, 4);
    }

    #[test]
    fn keys_are_per_profile() {
        assert_eq!(progress_key("alice"), "progress-alice");
        assert_eq!(history_key("alice"), "history-alice");
    }
}
