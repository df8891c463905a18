use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::progress::UserProgress;
use crate::error::QuizError;
use crate::session::result::QuizResult;

pub const SCHEMA_VERSION: u32 = 2;
const VERSION_FIELD: &str = "schemaVersion";
const MAX_HISTORY: usize = 100;

/// A migration upgrades a document from `from` to `from + 1` in place.
struct Migration {
    from: u32,
    apply: fn(&mut Map<String, Value>),
}

/// Version 1 is the original shape: no version tag and no `wordStats`.
const MIGRATIONS: &[Migration] = &[Migration {
    from: 1,
    apply: add_word_stats,
}];

fn add_word_stats(doc: &mut Map<String, Value>) {
    doc.entry("wordStats")
        .or_insert_with(|| Value::Object(Map::new()));
}

/// On-disk envelope around the ledger.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressDocument {
    schema_version: u32,
    #[serde(flatten)]
    progress: UserProgress,
}

fn check_version(found: u32) -> Result<(), QuizError> {
    if found > SCHEMA_VERSION {
        return Err(QuizError::NewerSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(())
}

pub fn encode_progress(progress: &UserProgress) -> Result<String, QuizError> {
    let doc = ProgressDocument {
        schema_version: SCHEMA_VERSION,
        progress: progress.clone(),
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| QuizError::CorruptPersistedState(e.to_string()))
}

/// Parse a stored ledger, running every migration between its version and
/// the current one.
pub fn decode_progress(json: &str) -> Result<UserProgress, QuizError> {
    let corrupt = |msg: String| QuizError::CorruptPersistedState(msg);

    let value: Value = serde_json::from_str(json).map_err(|e| corrupt(e.to_string()))?;
    let Value::Object(mut doc) = value else {
        return Err(corrupt("top-level value is not an object".into()));
    };

    let mut version = match doc.get(VERSION_FIELD) {
        None => 1,
        Some(v) => v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| corrupt(format!("invalid {VERSION_FIELD}: {v}")))?,
    };
    check_version(version)?;

    while version < SCHEMA_VERSION {
        let step = MIGRATIONS
            .iter()
            .find(|m| m.from == version)
            .ok_or_else(|| corrupt(format!("no migration from schema {version}")))?;
        (step.apply)(&mut doc);
        version += 1;
        log::info!("migrated stored progress to schema {version}");
    }
    doc.insert(VERSION_FIELD.to_string(), Value::from(SCHEMA_VERSION));

    let doc: ProgressDocument =
        serde_json::from_value(Value::Object(doc)).map_err(|e| corrupt(e.to_string()))?;
    Ok(doc.progress)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryData {
    #[serde(alias = "schema_version")]
    pub schema_version: u32,
    pub results: Vec<QuizResult>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

/// Parse stored session history, rejecting schemas newer than this build.
pub fn decode_history(json: &str) -> Result<HistoryData, QuizError> {
    let corrupt = |msg: String| QuizError::CorruptPersistedState(msg);

    let value: Value = serde_json::from_str(json).map_err(|e| corrupt(e.to_string()))?;
    let version = value
        .get(VERSION_FIELD)
        .or_else(|| value.get("schema_version"))
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| corrupt(format!("missing or invalid {VERSION_FIELD}")))?;
    check_version(version)?;

    let mut history: HistoryData =
        serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))?;
    history.schema_version = SCHEMA_VERSION;
    Ok(history)
}

impl HistoryData {
    /// Append a result, dropping the oldest beyond the retention limit.
    pub fn push(&mut self, result: QuizResult) {
        self.results.push(result);
        if self.results.len() > MAX_HISTORY {
            let excess = self.results.len() - MAX_HISTORY;
            self.results.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Word;
    use chrono::Utc;

    const V1_BLOB: &str = r#"{
        "categories": {
            "挨拶": {"category": "挨拶", "totalWords": 5, "correctWords": 2, "progressPercentage": 40}
        },
        "levels": {
            "初級": {"level": "初級", "totalWords": 5, "correctWords": 2, "progressPercentage": 40}
        },
        "lastUpdated": "2024-03-01T12:00:00.000Z"
    }"#;

    #[test]
    fn legacy_blob_is_migrated() {
        let progress = decode_progress(V1_BLOB).unwrap();
        assert!(progress.word_stats.is_empty());
        let bucket = &progress.categories["挨拶"];
        assert_eq!(bucket.name, "挨拶");
        assert_eq!(bucket.correct_words, 2);
        assert_eq!(progress.levels["初級"].name, "初級");
    }

    #[test]
    fn encode_decode_preserves_ledger() {
        let words = vec![Word::new("물", "水", "ムル", "食事", "初級")];
        let mut progress = UserProgress::from_vocabulary(&words, Utc::now());
        progress.record_mistake(&words[0], Utc::now());

        let json = encode_progress(&progress).unwrap();
        assert!(json.contains("\"schemaVersion\": 2"));
        let decoded = decode_progress(&json).unwrap();
        assert_eq!(decoded, progress);
    }

    #[test]
    fn garbage_is_corrupt() {
        assert!(matches!(
            decode_progress("{not json"),
            Err(QuizError::CorruptPersistedState(_))
        ));
        assert!(matches!(
            decode_progress("[1, 2]"),
            Err(QuizError::CorruptPersistedState(_))
        ));
        assert!(matches!(
            decode_progress(r#"{"categories": 3}"#),
            Err(QuizError::CorruptPersistedState(_))
        ));
    }

    #[test]
    fn future_schema_is_rejected() {
        let blob = V1_BLOB.replacen('{', "{\"schemaVersion\": 9,", 1);
        let err = decode_progress(&blob).unwrap_err();
        assert!(matches!(
            err,
            QuizError::NewerSchema {
                found: 9,
                supported: SCHEMA_VERSION
            }
        ));
        assert!(err.to_string().contains("newer version"));
    }

    #[test]
    fn history_uses_the_same_version_field_as_progress() {
        let mut history = HistoryData::default();
        history.push(QuizResult::sample(crate::generator::QuizType::Meaning, 5, 3));
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.contains("\"schemaVersion\":2"));
        assert!(!json.contains("schema_version"));
        assert_eq!(decode_history(&json).unwrap().results.len(), 1);
    }

    #[test]
    fn snake_case_history_still_loads() {
        let json = r#"{"schema_version": 2, "results": []}"#;
        assert_eq!(decode_history(json).unwrap().schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn history_version_is_checked() {
        let newer = r#"{"schemaVersion": 7, "results": []}"#;
        assert!(matches!(
            decode_history(newer),
            Err(QuizError::NewerSchema { found: 7, .. })
        ));
        assert!(matches!(
            decode_history(r#"{"results": []}"#),
            Err(QuizError::CorruptPersistedState(_))
        ));
    }

    #[test]
    fn history_is_capped() {
        let mut history = HistoryData::default();
        for i in 0..(MAX_HISTORY + 5) {
            history.push(QuizResult::sample(crate::generator::QuizType::Reading, 5, i % 6));
        }
        assert_eq!(history.results.len(), MAX_HISTORY);
    }
}
