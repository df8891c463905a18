use std::collections::{BTreeSet, HashSet};

use crate::vocabulary::Word;

/// Which slice of the vocabulary a quiz draws from.
///
/// An empty category or level set means "no restriction", not "nothing".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudyFilter {
    pub categories: BTreeSet<String>,
    pub levels: BTreeSet<String>,
    pub show_mistakes_only: bool,
}

/// How much of the vocabulary a filter selects, for the filter header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterSummary {
    AllWords,
    Categories(usize),
    Levels(usize),
    CategoriesAndLevels(usize, usize),
}

impl StudyFilter {
    pub fn is_unrestricted(&self) -> bool {
        self.categories.is_empty() && self.levels.is_empty() && !self.show_mistakes_only
    }

    pub fn matches(&self, word: &Word, mistaken: &HashSet<String>) -> bool {
        (self.categories.is_empty() || self.categories.contains(&word.category))
            && (self.levels.is_empty() || self.levels.contains(&word.level))
            && (!self.show_mistakes_only || mistaken.contains(&word.korean))
    }

    pub fn toggle_category(&mut self, category: &str) {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_string());
        }
    }

    pub fn toggle_level(&mut self, level: &str) {
        if !self.levels.remove(level) {
            self.levels.insert(level.to_string());
        }
    }

    pub fn select_all_categories(&mut self, available: &[String]) {
        self.categories = available.iter().cloned().collect();
    }

    pub fn clear_categories(&mut self) {
        self.categories.clear();
    }

    pub fn select_all_levels(&mut self, available: &[String]) {
        self.levels = available.iter().cloned().collect();
    }

    pub fn clear_levels(&mut self) {
        self.levels.clear();
    }

    pub fn summary(&self, total_categories: usize, total_levels: usize) -> FilterSummary {
        let c = self.categories.len();
        let l = self.levels.len();
        if (c == 0 && l == 0) || (c == total_categories && l == total_levels) {
            FilterSummary::AllWords
        } else if c == 0 {
            FilterSummary::Levels(l)
        } else if l == 0 {
            FilterSummary::Categories(c)
        } else {
            FilterSummary::CategoriesAndLevels(c, l)
        }
    }
}

/// Apply `filter` to `words`, keeping input order and borrowing the originals.
pub fn filter_vocabulary<'a>(
    words: &'a [Word],
    filter: &StudyFilter,
    mistaken: &HashSet<String>,
) -> Vec<&'a Word> {
    words
        .iter()
        .filter(|w| filter.matches(w, mistaken))
        .collect()
}
