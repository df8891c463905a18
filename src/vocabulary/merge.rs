use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::QuizError;
use crate::vocabulary::{CSV_HEADER, LEVEL_ORDER, Vocabulary, Word};

const TOP_CATEGORIES: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeReport {
    pub existing: usize,
    pub added: usize,
    pub skipped: usize,
    pub statistics: Statistics,
}

/// Word counts per known level and for the largest categories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub levels: Vec<(String, usize)>,
    pub top_categories: Vec<(String, usize)>,
}

impl Statistics {
    pub fn from_words(words: &[Word]) -> Self {
        let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
        for w in words {
            *categories.entry(&w.category).or_default() += 1;
        }
        let mut top: Vec<(String, usize)> = categories
            .into_iter()
            .map(|(name, n)| (name.to_string(), n))
            .collect();
        // Stable, so equal counts stay in name order.
        top.sort_by(|a, b| b.1.cmp(&a.1));
        top.truncate(TOP_CATEGORIES);

        let levels = LEVEL_ORDER
            .iter()
            .map(|level| {
                let n = words.iter().filter(|w| w.level == *level).count();
                (level.to_string(), n)
            })
            .collect();

        Self {
            total: words.len(),
            levels,
            top_categories: top,
        }
    }

    fn share(&self, n: usize) -> usize {
        if self.total == 0 {
            0
        } else {
            (n as f64 / self.total as f64 * 100.0).round() as usize
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total words: {}", self.total)?;
        writeln!(f, "\nBy level:")?;
        for (level, n) in &self.levels {
            writeln!(f, "  {level}: {n} ({}%)", self.share(*n))?;
        }
        writeln!(f, "\nTop categories:")?;
        for (category, n) in &self.top_categories {
            writeln!(f, "  {category}: {n} ({}%)", self.share(*n))?;
        }
        Ok(())
    }
}

/// Append `words` whose key is not already in the CSV at `path`, creating
/// the file with a header if it does not exist. Existing lines are kept
/// byte for byte.
pub fn merge_into_csv(path: &Path, words: &[Word]) -> Result<MergeReport, QuizError> {
    let existing_text = match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    let existing = match &existing_text {
        Some(text) if !text.trim().is_empty() => Vocabulary::from_csv_str(text)?,
        _ => Vocabulary::default(),
    };

    let mut out = existing_text.unwrap_or_default();
    let needs_header = out.trim().is_empty();
    if needs_header {
        out.clear();
    } else if !out.ends_with('\n') {
        out.push('\n');
    }

    let mut seen: HashSet<String> = existing.words().iter().map(|w| w.korean.clone()).collect();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if needs_header {
        writer.write_record(CSV_HEADER)?;
    }
    let mut added = 0;
    for word in words {
        // Compare in the form the loader will read back.
        let word = word.clone().normalized();
        if word.korean.is_empty() || !seen.insert(word.korean.clone()) {
            continue;
        }
        writer.serialize(&word)?;
        added += 1;
    }
    let appended = writer
        .into_inner()
        .map_err(|e| QuizError::Io(e.into_error()))?;
    out.push_str(&String::from_utf8_lossy(&appended));
    fs::write(path, &out)?;

    let merged = Vocabulary::from_csv_str(&out)?;
    log::info!("merged {added} new words into {}", path.display());
    Ok(MergeReport {
        existing: existing.len(),
        added,
        skipped: words.len() - added,
        statistics: Statistics::from_words(merged.words()),
    })
}
