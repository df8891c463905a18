use chrono::Utc;

use crate::engine::progress::UserProgress;
use crate::error::QuizError;
use crate::store::{KeyValueStore, keep_backup};
use crate::store::schema::{decode_progress, encode_progress};
use crate::vocabulary::Word;

/// A progress ledger bound to one storage key.
///
/// Every mutation is written through to the store immediately. Store
/// failures are logged and swallowed; the in-memory ledger stays
/// authoritative for the rest of the session.
pub struct Ledger<S: KeyValueStore> {
    store: S,
    key: String,
    progress: Option<UserProgress>,
}

impl<S: KeyValueStore> Ledger<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            progress: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn progress(&self) -> Option<&UserProgress> {
        self.progress.as_ref()
    }

    /// Read the stored ledger. Absent, unreadable and corrupt state all come
    /// back as `None`. A stored value that fails to decode, including one from
    /// a newer schema, is copied to its backup key first, since the next
    /// commit overwrites it.
    pub fn load(&mut self) -> Option<&UserProgress> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("cannot read progress {:?}: {e}", self.key);
                None
            }
        };
        self.progress = raw.and_then(|json| match decode_progress(&json) {
            Ok(progress) => Some(progress),
            Err(e) => {
                keep_backup(&self.store, &self.key, &json, &e);
                None
            }
        });
        self.progress.as_ref()
    }

    pub fn save(&self) {
        if let Some(progress) = &self.progress {
            persist(&self.store, &self.key, progress);
        }
    }

    pub fn initialize(&mut self, words: &[Word]) -> &UserProgress {
        let progress = UserProgress::from_vocabulary(words, Utc::now());
        log::info!(
            "initialized progress {:?}: {} categories, {} levels",
            self.key,
            progress.categories.len(),
            progress.levels.len()
        );
        self.commit(progress)
    }

    /// Load the stored ledger and reconcile it with `words`, or start a fresh
    /// one when nothing usable is stored.
    pub fn load_or_initialize(&mut self, words: &[Word]) -> &UserProgress {
        self.load();
        match self.progress.take() {
            Some(mut progress) => {
                progress.reconcile(words, Utc::now());
                self.commit(progress)
            }
            None => self.initialize(words),
        }
    }

    pub fn record_learned(&mut self, word: &Word) -> Result<&UserProgress, QuizError> {
        self.mutate(|p| p.mark_learned(word, Utc::now()))
    }

    pub fn record_mistake(&mut self, word: &Word) -> Result<&UserProgress, QuizError> {
        self.mutate(|p| p.record_mistake(word, Utc::now()))
    }

    pub fn reset_mistake_count(&mut self, word: &Word) -> Result<&UserProgress, QuizError> {
        self.mutate(|p| p.reset_mistakes(word, Utc::now()))
    }

    pub fn reconcile_with_vocabulary(
        &mut self,
        words: &[Word],
    ) -> Result<&UserProgress, QuizError> {
        self.mutate(|p| p.reconcile(words, Utc::now()))
    }

    pub fn overall_progress(&self) -> Result<u32, QuizError> {
        self.progress
            .as_ref()
            .map(UserProgress::overall_progress)
            .ok_or(QuizError::LedgerMissing)
    }

    pub fn frequently_mistaken(&self, min_mistakes: u32) -> Result<Vec<String>, QuizError> {
        self.progress
            .as_ref()
            .map(|p| p.frequently_mistaken(min_mistakes))
            .ok_or(QuizError::LedgerMissing)
    }

    fn mutate(
        &mut self,
        f: impl FnOnce(&mut UserProgress),
    ) -> Result<&UserProgress, QuizError> {
        let progress = self.progress.as_mut().ok_or(QuizError::LedgerMissing)?;
        f(progress);
        persist(&self.store, &self.key, progress);
        Ok(&*progress)
    }

    fn commit(&mut self, progress: UserProgress) -> &UserProgress {
        let progress = self.progress.insert(progress);
        persist(&self.store, &self.key, progress);
        progress
    }
}

fn persist<S: KeyValueStore>(store: &S, key: &str, progress: &UserProgress) {
    let result = encode_progress(progress)
        .and_then(|json| store.set(key, &json).map_err(QuizError::from));
    if let Err(e) = result {
        log::warn!("cannot save progress {key:?}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, backup_key};

    fn words() -> Vec<Word> {
        (0..5)
            .map(|i| Word::new(&format!("w{i}"), "j", "p", "greeting", "beginner"))
            .collect()
    }

    #[test]
    fn mutation_before_initialize_is_ledger_missing() {
        let store = MemoryStore::new();
        let mut ledger = Ledger::new(&store, "progress-test");
        let words = words();
        let w = &words[0];
        assert!(matches!(ledger.record_learned(w), Err(QuizError::LedgerMissing)));
        assert!(matches!(ledger.record_mistake(w), Err(QuizError::LedgerMissing)));
        assert!(matches!(ledger.reset_mistake_count(w), Err(QuizError::LedgerMissing)));
        assert!(matches!(ledger.overall_progress(), Err(QuizError::LedgerMissing)));
        assert_eq!(store.get("progress-test").unwrap(), None);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let store = MemoryStore::new();
        let words = words();
        let mut ledger = Ledger::new(&store, "progress-test");
        ledger.initialize(&words);
        ledger.record_learned(&words[0]).unwrap();
        ledger.record_mistake(&words[1]).unwrap();

        let mut reloaded = Ledger::new(&store, "progress-test");
        let progress = reloaded.load().unwrap();
        assert_eq!(progress.categories["greeting"].correct_words, 1);
        assert_eq!(progress.mistake_count("w1"), 1);
    }

    #[test]
    fn corrupt_state_loads_as_absent_and_reinitializes() {
        let store = MemoryStore::new();
        store.set("progress-test", "{{{").unwrap();
        let words = words();
        let mut ledger = Ledger::new(&store, "progress-test");
        assert!(ledger.load().is_none());

        let progress = ledger.load_or_initialize(&words);
        assert_eq!(progress.categories["greeting"].total_words, 5);
        // The corrupt blob has been replaced.
        assert!(decode_progress(&store.get("progress-test").unwrap().unwrap()).is_ok());
    }

    #[test]
    fn newer_schema_is_kept_as_backup_when_starting_fresh() {
        let store = MemoryStore::new();
        let words = words();
        let mut newer = Ledger::new(&store, "progress-test");
        newer.initialize(&words);
        newer.record_learned(&words[0]).unwrap();
        let future = store
            .get("progress-test")
            .unwrap()
            .unwrap()
            .replace("\"schemaVersion\": 2", "\"schemaVersion\": 3");
        assert!(future.contains("\"schemaVersion\": 3"));
        store.set("progress-test", &future).unwrap();

        let mut older = Ledger::new(&store, "progress-test");
        let progress = older.load_or_initialize(&words);
        assert_eq!(progress.overall_progress(), 0);
        assert_eq!(
            store.get(&backup_key("progress-test")).unwrap().as_deref(),
            Some(future.as_str())
        );
    }

    #[test]
    fn load_or_initialize_reconciles_existing_ledger() {
        let store = MemoryStore::new();
        let words = words();
        {
            let mut ledger = Ledger::new(&store, "progress-test");
            ledger.initialize(&words);
            for w in &words {
                ledger.record_learned(w).unwrap();
            }
        }
        let mut ledger = Ledger::new(&store, "progress-test");
        let progress = ledger.load_or_initialize(&words[..3]);
        let bucket = &progress.categories["greeting"];
        assert_eq!((bucket.total_words, bucket.correct_words), (3, 3));
    }

    #[test]
    fn separate_keys_do_not_interfere() {
        let store = MemoryStore::new();
        let words = words();
        let mut a = Ledger::new(&store, "progress-a");
        let mut b = Ledger::new(&store, "progress-b");
        a.initialize(&words);
        b.initialize(&words);
        a.record_learned(&words[0]).unwrap();
        assert_eq!(b.overall_progress().unwrap(), 0);
        assert_eq!(a.overall_progress().unwrap(), 20);
    }

    #[test]
    fn frequently_mistaken_through_ledger() {
        let store = MemoryStore::new();
        let words = words();
        let mut ledger = Ledger::new(&store, "progress-test");
        ledger.initialize(&words);
        for _ in 0..3 {
            ledger.record_mistake(&words[4]).unwrap();
        }
        assert_eq!(ledger.frequently_mistaken(2).unwrap(), vec!["w4".to_string()]);
        ledger.reset_mistake_count(&words[4]).unwrap();
        assert!(ledger.frequently_mistaken(2).unwrap().is_empty());
    }
}
