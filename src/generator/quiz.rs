use std::cmp::Reverse;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::progress::UserProgress;
use crate::error::QuizError;
use crate::generator::hangul::{Jamo, pronunciation_table};
use crate::vocabulary::{Word, level_rank};

pub const OPTION_COUNT: usize = 4;
pub const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;
pub const DEFAULT_QUESTION_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    Meaning,
    Reading,
    Pronunciation,
}

impl QuizType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizType::Meaning => "meaning",
            QuizType::Reading => "reading",
            QuizType::Pronunciation => "pronunciation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "meaning" => Some(QuizType::Meaning),
            "reading" => Some(QuizType::Reading),
            "pronunciation" => Some(QuizType::Pronunciation),
            _ => None,
        }
    }

    pub fn all() -> &'static [QuizType] {
        &[QuizType::Meaning, QuizType::Reading, QuizType::Pronunciation]
    }
}

/// What a question is about. Pronunciation questions carry a vocabulary
/// word for display only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    Meaning { word: Word },
    Reading { word: Word },
    Pronunciation { jamo: Jamo, context: Word },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: String,
    pub kind: QuestionKind,
}

impl QuizQuestion {
    pub fn quiz_type(&self) -> QuizType {
        match self.kind {
            QuestionKind::Meaning { .. } => QuizType::Meaning,
            QuestionKind::Reading { .. } => QuizType::Reading,
            QuestionKind::Pronunciation { .. } => QuizType::Pronunciation,
        }
    }

    pub fn word(&self) -> &Word {
        match &self.kind {
            QuestionKind::Meaning { word } | QuestionKind::Reading { word } => word,
            QuestionKind::Pronunciation { context, .. } => context,
        }
    }

    /// The word whose progress this question affects, if any.
    pub fn assessed_word(&self) -> Option<&Word> {
        match &self.kind {
            QuestionKind::Meaning { word } | QuestionKind::Reading { word } => Some(word),
            QuestionKind::Pronunciation { .. } => None,
        }
    }

    pub fn is_correct(&self, option: usize) -> bool {
        self.options.get(option) == Some(&self.correct_answer)
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }
}

/// Build a round of questions from `pool`.
///
/// Candidates are ordered easiest level first; with `progress`, words from
/// categories not yet learned come first and, among those, the most-missed
/// words. Ties are broken randomly. The first `count` candidates (clamped to
/// `1..=pool.len()`) become questions.
pub fn generate_quiz<R: Rng + ?Sized>(
    pool: &[&Word],
    quiz_type: QuizType,
    count: usize,
    progress: Option<&UserProgress>,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, QuizError> {
    if pool.len() < OPTION_COUNT {
        return Err(QuizError::InsufficientVocabulary {
            available: pool.len(),
            required: OPTION_COUNT,
        });
    }

    let candidates = order_candidates(pool, progress, rng);
    let count = count.clamp(1, candidates.len());

    match quiz_type {
        QuizType::Meaning | QuizType::Reading => candidates[..count]
            .iter()
            .map(|word| word_question(word, &candidates, quiz_type, rng))
            .collect(),
        QuizType::Pronunciation => {
            let table = pronunciation_table();
            let count = count.min(table.len());
            let letters: Vec<&Jamo> = table.choose_multiple(rng, count).copied().collect();
            letters
                .into_iter()
                .zip(candidates.iter())
                .map(|(jamo, context)| jamo_question(jamo, context, &table, rng))
                .collect()
        }
    }
}

fn order_candidates<'a, R: Rng + ?Sized>(
    pool: &[&'a Word],
    progress: Option<&UserProgress>,
    rng: &mut R,
) -> Vec<&'a Word> {
    let mut candidates = pool.to_vec();
    candidates.shuffle(rng);
    candidates.sort_by_key(|w| level_rank(&w.level));
    if let Some(progress) = progress {
        candidates.sort_by_key(|w| {
            (
                progress.is_category_learned(&w.category),
                Reverse(progress.mistake_count(&w.korean)),
            )
        });
    }
    candidates
}

fn answer_for(word: &Word, quiz_type: QuizType) -> &str {
    match quiz_type {
        QuizType::Reading => &word.pronunciation,
        _ => &word.japanese,
    }
}

fn word_question<R: Rng + ?Sized>(
    word: &Word,
    candidates: &[&Word],
    quiz_type: QuizType,
    rng: &mut R,
) -> Result<QuizQuestion, QuizError> {
    let correct = answer_for(word, quiz_type);
    let others: Vec<&str> = candidates
        .iter()
        .filter(|w| w.korean != word.korean)
        .map(|w| answer_for(w, quiz_type))
        .collect();
    let options = assemble_options(correct, &others, rng)?;

    let kind = match quiz_type {
        QuizType::Reading => QuestionKind::Reading { word: word.clone() },
        _ => QuestionKind::Meaning { word: word.clone() },
    };
    Ok(QuizQuestion {
        prompt: word.korean.clone(),
        options,
        correct_answer: correct.to_string(),
        kind,
    })
}

fn jamo_question<R: Rng + ?Sized>(
    jamo: &Jamo,
    context: &Word,
    table: &[&Jamo],
    rng: &mut R,
) -> Result<QuizQuestion, QuizError> {
    let others: Vec<&str> = table
        .iter()
        .filter(|j| j.grapheme != jamo.grapheme)
        .map(|j| j.romanization)
        .collect();
    let options = assemble_options(jamo.romanization, &others, rng)?;

    Ok(QuizQuestion {
        prompt: jamo.grapheme.to_string(),
        options,
        correct_answer: jamo.romanization.to_string(),
        kind: QuestionKind::Pronunciation {
            jamo: *jamo,
            context: context.clone(),
        },
    })
}

/// Draw distractors without replacement and shuffle them in with the answer.
///
/// Distractors whose text differs from the answer and from each other are
/// preferred; duplicates are only used when the pool has nothing else.
fn assemble_options<R: Rng + ?Sized>(
    correct: &str,
    others: &[&str],
    rng: &mut R,
) -> Result<[String; OPTION_COUNT], QuizError> {
    let mut order: Vec<usize> = (0..others.len()).collect();
    order.shuffle(rng);

    let mut chosen: Vec<usize> = Vec::with_capacity(DISTRACTOR_COUNT);
    for &i in &order {
        if chosen.len() == DISTRACTOR_COUNT {
            break;
        }
        if others[i] != correct && chosen.iter().all(|&j| others[j] != others[i]) {
            chosen.push(i);
        }
    }
    for &i in &order {
        if chosen.len() == DISTRACTOR_COUNT {
            break;
        }
        if !chosen.contains(&i) {
            chosen.push(i);
        }
    }

    let mut options: Vec<String> = Vec::with_capacity(OPTION_COUNT);
    options.push(correct.to_string());
    options.extend(chosen.iter().map(|&i| others[i].to_string()));
    options.shuffle(rng);

    let available = options.len();
    options
        .try_into()
        .map_err(|_| QuizError::InsufficientVocabulary {
            available,
            required: OPTION_COUNT,
        })
}
