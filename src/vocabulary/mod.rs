pub mod merge;
pub mod synth;

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

const BUNDLED_CSV: &str = include_str!("../../assets/korean_vocabulary.csv");

pub const CSV_HEADER: [&str; 5] = ["korean", "japanese", "pronunciation", "category", "level"];

/// Known levels, easiest first. Anything else sorts after these.
pub const LEVEL_ORDER: [&str; 3] = ["初級", "中級", "上級"];

pub fn level_rank(level: &str) -> usize {
    LEVEL_ORDER
        .iter()
        .position(|l| *l == level)
        .unwrap_or(LEVEL_ORDER.len())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    pub korean: String,
    pub japanese: String,
    pub pronunciation: String,
    pub category: String,
    pub level: String,
}

impl Word {
    pub fn new(korean: &str, japanese: &str, pronunciation: &str, category: &str, level: &str) -> Self {
        Self {
            korean: korean.to_string(),
            japanese: japanese.to_string(),
            pronunciation: pronunciation.to_string(),
            category: category.to_string(),
            level: level.to_string(),
        }
    }

    /// Trim and NFC-compose every field so decomposed jamo input matches
    /// the composed keys stored in the ledger.
    pub(crate) fn normalized(self) -> Self {
        let nfc = ComposingNormalizerBorrowed::new_nfc();
        let clean = |s: &str| nfc.normalize(s.trim()).into_owned();
        Self {
            korean: clean(&self.korean),
            japanese: clean(&self.japanese),
            pronunciation: clean(&self.pronunciation),
            category: clean(&self.category),
            level: clean(&self.level),
        }
    }
}

/// The in-memory word list. Loaded once; `korean` is unique.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    words: Vec<Word>,
}

impl Vocabulary {
    /// Build from already-parsed words, dropping blank keys and later duplicates.
    pub fn new(words: Vec<Word>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut kept = Vec::with_capacity(words.len());
        for word in words {
            let word = word.normalized();
            if word.korean.is_empty() {
                log::warn!("skipping vocabulary entry with empty korean field");
                continue;
            }
            if !seen.insert(word.korean.clone()) {
                log::debug!("duplicate vocabulary entry {:?} ignored", word.korean);
                continue;
            }
            kept.push(word);
        }
        Self { words: kept }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuizError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let missing: Vec<&str> = CSV_HEADER
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h.trim_start_matches('\u{feff}') == *col))
            .collect();
        if !missing.is_empty() {
            return Err(QuizError::DataUnavailable(format!(
                "missing column(s): {}",
                missing.join(", ")
            )));
        }
        // A UTF-8 BOM would otherwise stick to the first header name.
        let cleaned: csv::StringRecord = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}'))
            .collect();
        rdr.set_headers(cleaned);

        let mut words = Vec::new();
        for (row, record) in rdr.deserialize::<Word>().enumerate() {
            match record {
                Ok(word) => words.push(word),
                // Header is line 1, so data rows start at line 2.
                Err(e) => log::warn!("skipping malformed vocabulary row {}: {e}", row + 2),
            }
        }

        let vocabulary = Self::new(words);
        log::info!("loaded {} vocabulary words", vocabulary.len());
        Ok(vocabulary)
    }

    pub fn from_csv_str(csv: &str) -> Result<Self, QuizError> {
        Self::from_reader(csv.as_bytes())
    }

    pub fn from_path(path: &Path) -> Result<Self, QuizError> {
        let content = fs::read_to_string(path).map_err(|e| {
            QuizError::DataUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_csv_str(&content)
    }

    /// The word list compiled into the binary.
    pub fn bundled() -> Result<Self, QuizError> {
        Self::from_csv_str(BUNDLED_CSV)
    }

    #[cfg(feature = "network")]
    pub fn fetch(url: &str) -> Result<Self, QuizError> {
        let unavailable = |e: reqwest::Error| QuizError::DataUnavailable(format!("{url}: {e}"));
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(unavailable)?;
        let response = client.get(url).send().map_err(unavailable)?;
        if !response.status().is_success() {
            return Err(QuizError::DataUnavailable(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        let body = response.text().map_err(unavailable)?;
        Self::from_csv_str(&body)
    }

    #[cfg(not(feature = "network"))]
    pub fn fetch(url: &str) -> Result<Self, QuizError> {
        Err(QuizError::DataUnavailable(format!(
            "cannot fetch {url}: built without the network feature"
        )))
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, korean: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.korean == korean)
    }

    /// Distinct categories, sorted by name.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .words
            .iter()
            .map(|w| w.category.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort();
        categories
    }

    /// Distinct levels, known levels first in difficulty order.
    pub fn levels(&self) -> Vec<String> {
        let mut levels: Vec<String> = self
            .words
            .iter()
            .map(|w| w.level.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        levels.sort_by(|a, b| level_rank(a).cmp(&level_rank(b)).then_with(|| a.cmp(b)));
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "korean,japanese,pronunciation,category,level
안녕하세요,こんにちは,アンニョンハセヨ,挨拶,初級
감사합니다,ありがとうございます,カムサハムニダ,挨拶,初級
학교,学校,ハッキョ,学校,中級
";

    #[test]
    fn parses_rows_in_file_order() {
        let vocab = Vocabulary::from_csv_str(SAMPLE).unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.words()[0].korean, "안녕하세요");
        assert_eq!(vocab.words()[2].level, "中級");
    }

    #[test]
    fn missing_column_is_data_unavailable() {
        let csv = "korean,japanese,category,level\n학교,学校,学校,中級\n";
        let err = Vocabulary::from_csv_str(csv).unwrap_err();
        assert!(matches!(err, QuizError::DataUnavailable(ref m) if m.contains("pronunciation")));
    }

    #[test]
    fn malformed_and_blank_rows_are_skipped() {
        let csv = "korean,japanese,pronunciation,category,level
학교,学校,ハッキョ,学校,中級
broken,row
,空,カラ,x,初級
물,水,ムル,食事,初級
";
        let vocab = Vocabulary::from_csv_str(csv).unwrap();
        let keys: Vec<&str> = vocab.words().iter().map(|w| w.korean.as_str()).collect();
        assert_eq!(keys, vec!["학교", "물"]);
    }

    #[test]
    fn duplicate_keys_keep_first_occurrence() {
        let csv = "korean,japanese,pronunciation,category,level
물,水,ムル,食事,初級
물,お水,ムル,日常,中級
";
        let vocab = Vocabulary::from_csv_str(csv).unwrap();
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.get("물").unwrap().japanese, "水");
    }

    #[test]
    fn decomposed_hangul_is_composed() {
        // 물 spelled with conjoining jamo U+1106 U+116E U+11AF
        let csv = "korean,japanese,pronunciation,category,level\n\u{1106}\u{116E}\u{11AF},水,ムル,食事,初級\n";
        let vocab = Vocabulary::from_csv_str(csv).unwrap();
        assert_eq!(vocab.words()[0].korean, "물");
    }

    #[test]
    fn bom_prefixed_header_is_accepted() {
        let csv = "\u{feff}korean,japanese,pronunciation,category,level\n물,水,ムル,食事,初級\n";
        let vocab = Vocabulary::from_csv_str(csv).unwrap();
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn levels_sort_by_rank_then_name() {
        let vocab = Vocabulary::new(vec![
            Word::new("a", "a", "a", "c", "上級"),
            Word::new("b", "b", "b", "c", "特別"),
            Word::new("c", "c", "c", "c", "初級"),
            Word::new("d", "d", "d", "c", "中級"),
        ]);
        assert_eq!(vocab.levels(), vec!["初級", "中級", "上級", "特別"]);
    }

    #[test]
    fn bundled_vocabulary_loads() {
        let vocab = Vocabulary::bundled().unwrap();
        assert!(vocab.len() >= 4);
        assert!(vocab.levels().iter().any(|l| l == "初級"));
    }
}
