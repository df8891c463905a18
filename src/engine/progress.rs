use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vocabulary::Word;

/// Counter pair for one category or one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    #[serde(alias = "category", alias = "level")]
    pub name: String,
    pub total_words: u32,
    pub correct_words: u32,
    pub progress_percentage: u32,
}

impl Bucket {
    pub fn new(name: &str, total_words: u32) -> Self {
        Self {
            name: name.to_string(),
            total_words,
            correct_words: 0,
            progress_percentage: 0,
        }
    }

    pub fn is_saturated(&self) -> bool {
        self.correct_words >= self.total_words
    }

    /// Add one learned word unless the bucket is already full.
    fn increment(&mut self) {
        if self.correct_words < self.total_words {
            self.correct_words += 1;
        }
        self.recompute();
    }

    fn set_total(&mut self, total_words: u32) {
        self.total_words = total_words;
        self.correct_words = self.correct_words.min(total_words);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.progress_percentage = percentage(self.correct_words, self.total_words);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStat {
    pub korean: String,
    pub incorrect_count: u32,
}

/// The per-profile progress aggregate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub categories: BTreeMap<String, Bucket>,
    pub levels: BTreeMap<String, Bucket>,
    #[serde(default)]
    pub word_stats: BTreeMap<String, WordStat>,
    pub last_updated: DateTime<Utc>,
}

pub fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn count_by<'a>(words: &'a [Word], key: impl Fn(&'a Word) -> &'a str) -> HashMap<&'a str, u32> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for word in words {
        *counts.entry(key(word)).or_default() += 1;
    }
    counts
}

impl UserProgress {
    /// Zeroed ledger covering every category, level and word in `words`.
    pub fn from_vocabulary(words: &[Word], now: DateTime<Utc>) -> Self {
        let categories = count_by(words, |w| w.category.as_str())
            .into_iter()
            .map(|(name, total)| (name.to_string(), Bucket::new(name, total)))
            .collect();
        let levels = count_by(words, |w| w.level.as_str())
            .into_iter()
            .map(|(name, total)| (name.to_string(), Bucket::new(name, total)))
            .collect();
        let word_stats = words
            .iter()
            .map(|w| {
                (
                    w.korean.clone(),
                    WordStat {
                        korean: w.korean.clone(),
                        incorrect_count: 0,
                    },
                )
            })
            .collect();

        Self {
            categories,
            levels,
            word_stats,
            last_updated: now,
        }
    }

    /// Count `word` as learned in its category and level buckets.
    /// Buckets that are already full, or unknown, are left alone.
    pub fn mark_learned(&mut self, word: &Word, now: DateTime<Utc>) {
        if let Some(bucket) = self.categories.get_mut(&word.category) {
            bucket.increment();
        }
        if let Some(bucket) = self.levels.get_mut(&word.level) {
            bucket.increment();
        }
        self.last_updated = now;
    }

    pub fn record_mistake(&mut self, word: &Word, now: DateTime<Utc>) {
        let stat = self
            .word_stats
            .entry(word.korean.clone())
            .or_insert_with(|| WordStat {
                korean: word.korean.clone(),
                incorrect_count: 0,
            });
        stat.incorrect_count += 1;
        self.last_updated = now;
    }

    pub fn reset_mistakes(&mut self, word: &Word, now: DateTime<Utc>) {
        if let Some(stat) = self.word_stats.get_mut(&word.korean) {
            stat.incorrect_count = 0;
        }
        self.last_updated = now;
    }

    /// Bring bucket totals and word stats in line with a possibly changed
    /// vocabulary. Buckets whose words disappeared are kept as they are.
    pub fn reconcile(&mut self, words: &[Word], now: DateTime<Utc>) {
        for (name, total) in count_by(words, |w| w.category.as_str()) {
            self.categories
                .entry(name.to_string())
                .or_insert_with(|| Bucket::new(name, total))
                .set_total(total);
        }
        for (name, total) in count_by(words, |w| w.level.as_str()) {
            self.levels
                .entry(name.to_string())
                .or_insert_with(|| Bucket::new(name, total))
                .set_total(total);
        }
        for word in words {
            self.word_stats
                .entry(word.korean.clone())
                .or_insert_with(|| WordStat {
                    korean: word.korean.clone(),
                    incorrect_count: 0,
                });
        }
        self.last_updated = now;
    }

    pub fn overall_progress(&self) -> u32 {
        let (correct, total) = self
            .categories
            .values()
            .fold((0u32, 0u32), |(c, t), b| (c + b.correct_words, t + b.total_words));
        percentage(correct, total)
    }

    /// Keys of words missed at least `min_mistakes` times, most-missed first.
    pub fn frequently_mistaken(&self, min_mistakes: u32) -> Vec<String> {
        let mut stats: Vec<&WordStat> = self
            .word_stats
            .values()
            .filter(|s| s.incorrect_count >= min_mistakes)
            .collect();
        stats.sort_by(|a, b| b.incorrect_count.cmp(&a.incorrect_count));
        stats.into_iter().map(|s| s.korean.clone()).collect()
    }

    pub fn mistake_count(&self, korean: &str) -> u32 {
        self.word_stats
            .get(korean)
            .map(|s| s.incorrect_count)
            .unwrap_or(0)
    }

    /// A category counts as learned once every word in it has been answered.
    pub fn is_category_learned(&self, category: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|b| b.total_words > 0 && b.is_saturated())
    }
}
