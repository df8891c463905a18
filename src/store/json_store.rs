use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::QuizError;
use crate::store::KeyValueStore;

/// One JSON file per key under the user's data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self, QuizError> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hanquiz");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, QuizError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.file_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

/// Map a key to a file stem, one-to-one. ASCII letters, digits and `-`
/// pass through; every other byte, `%` and `_` included, becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::QuizType;
    use crate::session::result::QuizResult;
    use crate::store::schema::HistoryData;
    use crate::store::{load_history, progress_key, save_history};
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.get("progress-default").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips_and_leaves_no_tmp() {
        let (dir, store) = make_test_store();
        store.set("progress-default", "{\"a\":1}").unwrap();
        assert_eq!(
            store.get("progress-default").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn keys_cannot_escape_base_dir() {
        let (dir, store) = make_test_store();
        store.set("../evil/key", "x").unwrap();
        assert!(dir.path().join("%2E%2E%2Fevil%2Fkey.json").exists());
    }

    #[test]
    fn punctuation_variants_get_their_own_files() {
        let (_dir, store) = make_test_store();
        store.set(&progress_key("a.b"), "alice").unwrap();
        store.set(&progress_key("a_b"), "bob").unwrap();
        store.set(&progress_key("a%2Eb"), "carol").unwrap();
        assert_eq!(store.get(&progress_key("a.b")).unwrap().as_deref(), Some("alice"));
        assert_eq!(store.get(&progress_key("a_b")).unwrap().as_deref(), Some("bob"));
        assert_eq!(store.get(&progress_key("a%2Eb")).unwrap().as_deref(), Some("carol"));
    }

    #[test]
    fn plain_keys_keep_readable_file_names() {
        assert_eq!(encode_key("progress-default"), "progress-default");
        assert_eq!(encode_key("a_b"), "a%5Fb");
        assert_eq!(encode_key("학"), "%ED%95%99");
    }

    #[test]
    fn profiles_are_isolated() {
        let (_dir, store) = make_test_store();
        store.set(&progress_key("alice"), "a").unwrap();
        store.set(&progress_key("bob"), "b").unwrap();
        assert_eq!(store.get(&progress_key("alice")).unwrap().as_deref(), Some("a"));
        assert_eq!(store.get(&progress_key("bob")).unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn history_survives_reopen() {
        let (dir, store) = make_test_store();
        let mut data = HistoryData::default();
        data.push(QuizResult::sample(QuizType::Meaning, 5, 4));
        save_history(&store, "default", &data).unwrap();

        let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let loaded = load_history(&reopened, "default");
        assert_eq!(loaded.results[0].correct, 4);
    }
}
