use std::fs;

use tempfile::TempDir;

use hanquiz::engine::Ledger;
use hanquiz::generator::QuizType;
use hanquiz::session::QuizResult;
use hanquiz::store::json_store::JsonStore;
use hanquiz::store::schema::HistoryData;
use hanquiz::store::{load_history, progress_key, save_history};
use hanquiz::vocabulary::{Vocabulary, Word};

fn words() -> Vec<Word> {
    vec![
        Word::new("물", "水", "ムル", "食事", "初級"),
        Word::new("밥", "ご飯", "パプ", "食事", "初級"),
        Word::new("학교", "学校", "ハッキョ", "場所", "中級"),
        Word::new("계약", "契約", "ケヤク", "ビジネス", "上級"),
    ]
}

fn store(dir: &TempDir) -> JsonStore {
    JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap()
}

#[test]
fn progress_survives_restart() {
    let dir = TempDir::new().unwrap();
    let words = words();

    {
        let mut ledger = Ledger::new(store(&dir), progress_key("default"));
        ledger.load_or_initialize(&words);
        ledger.record_learned(&words[0]).unwrap();
        ledger.record_mistake(&words[2]).unwrap();
        ledger.record_mistake(&words[2]).unwrap();
    }

    let mut ledger = Ledger::new(store(&dir), progress_key("default"));
    let progress = ledger.load_or_initialize(&words);
    assert_eq!(progress.categories["食事"].correct_words, 1);
    assert_eq!(progress.levels["初級"].correct_words, 1);
    assert_eq!(progress.mistake_count("학교"), 2);
    assert_eq!(ledger.frequently_mistaken(2).unwrap(), vec!["학교".to_string()]);
}

#[test]
fn profiles_do_not_share_progress() {
    let dir = TempDir::new().unwrap();
    let words = words();

    let mut alice = Ledger::new(store(&dir), progress_key("alice"));
    alice.load_or_initialize(&words);
    alice.record_learned(&words[1]).unwrap();

    let mut bob = Ledger::new(store(&dir), progress_key("bob"));
    let progress = bob.load_or_initialize(&words);
    assert_eq!(progress.overall_progress(), 0);
}

#[test]
fn grown_vocabulary_extends_buckets_without_losing_counts() {
    let dir = TempDir::new().unwrap();
    let mut words = words();

    {
        let mut ledger = Ledger::new(store(&dir), progress_key("default"));
        ledger.load_or_initialize(&words);
        ledger.record_learned(&words[0]).unwrap();
    }

    words.push(Word::new("빵", "パン", "パン", "食事", "初級"));
    words.push(Word::new("안녕", "こんにちは", "アンニョン", "挨拶", "初級"));
    let mut ledger = Ledger::new(store(&dir), progress_key("default"));
    let progress = ledger.load_or_initialize(&words);
    assert_eq!(progress.categories["食事"].total_words, 3);
    assert_eq!(progress.categories["食事"].correct_words, 1);
    assert_eq!(progress.categories["挨拶"].total_words, 1);
}

#[test]
fn legacy_file_is_migrated_on_load() {
    let dir = TempDir::new().unwrap();
    let legacy = r#"{
        "categories": {"食事": {"name": "食事", "totalWords": 2, "correctWords": 1, "progressPercentage": 50}},
        "levels": {"初級": {"name": "初級", "totalWords": 2, "correctWords": 1, "progressPercentage": 50}},
        "lastUpdated": "2024-05-01T10:00:00Z"
    }"#;
    fs::write(dir.path().join("progress-default.json"), legacy).unwrap();

    let mut ledger = Ledger::new(store(&dir), progress_key("default"));
    let progress = ledger.load().cloned().unwrap();
    assert_eq!(progress.categories["食事"].correct_words, 1);
    assert!(progress.word_stats.is_empty());

    ledger.save();
    let rewritten = fs::read_to_string(dir.path().join("progress-default.json")).unwrap();
    assert!(rewritten.contains("\"schemaVersion\": 2"));
}

#[test]
fn corrupt_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("progress-default.json"), "{ not json").unwrap();

    let mut ledger = Ledger::new(store(&dir), progress_key("default"));
    assert!(ledger.load().is_none());
    let progress = ledger.load_or_initialize(&words());
    assert_eq!(progress.categories.len(), 3);
}

#[test]
fn history_is_kept_per_profile() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let mut history = HistoryData::default();
    history.push(QuizResult {
        quiz_type: QuizType::Reading,
        total: 5,
        correct: 4,
        review_total: 1,
        review_correct: 1,
        missed: vec!["학교".to_string()],
        started_at: chrono::Utc::now(),
        timestamp: chrono::Utc::now(),
    });
    save_history(&store, "default", &history).unwrap();

    let loaded = load_history(&store, "default");
    assert_eq!(loaded.results.len(), 1);
    assert_eq!(loaded.results[0].missed, vec!["학교".to_string()]);
    assert!(load_history(&store, "other").results.is_empty());
}

#[test]
fn bundled_vocabulary_initializes_every_bucket() {
    let vocabulary = Vocabulary::bundled().unwrap();
    let dir = TempDir::new().unwrap();
    let mut ledger = Ledger::new(store(&dir), progress_key("default"));
    let progress = ledger.load_or_initialize(vocabulary.words());

    let total: u32 = progress.categories.values().map(|b| b.total_words).sum();
    assert_eq!(total as usize, vocabulary.len());
    assert_eq!(progress.levels.len(), vocabulary.levels().len());
}
