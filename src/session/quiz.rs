use chrono::{DateTime, Utc};

use crate::generator::{QuizQuestion, QuizType};
use crate::vocabulary::Word;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Normal,
    Review,
    Complete,
}

/// What an answer asks the progress ledger to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEffect {
    Learned(Word),
    Mistake(Word),
    ResetMistakes(Word),
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub chosen: usize,
    pub correct: bool,
    pub effect: LedgerEffect,
}

/// One quiz round: a first pass over the generated questions, then a single
/// review pass over the ones answered wrongly.
pub struct QuizSession {
    quiz_type: QuizType,
    questions: Vec<QuizQuestion>,
    review: Vec<QuizQuestion>,
    phase: Phase,
    cursor: usize,
    answer: Option<Answer>,
    score: usize,
    review_score: usize,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(quiz_type: QuizType, questions: Vec<QuizQuestion>) -> Self {
        let phase = if questions.is_empty() {
            Phase::Complete
        } else {
            Phase::Normal
        };
        Self {
            quiz_type,
            questions,
            review: Vec::new(),
            phase,
            cursor: 0,
            answer: None,
            score: 0,
            review_score: 0,
            started_at: Utc::now(),
        }
    }

    pub fn quiz_type(&self) -> QuizType {
        self.quiz_type
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn active(&self) -> &[QuizQuestion] {
        match self.phase {
            Phase::Normal => &self.questions,
            Phase::Review => &self.review,
            Phase::Complete => &[],
        }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.active().get(self.cursor)
    }

    /// 1-based position and length of the pass in progress.
    pub fn position(&self) -> (usize, usize) {
        let active = self.active();
        ((self.cursor + 1).min(active.len()), active.len())
    }

    pub fn pending_answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    /// Answer the current question. Returns `None` when there is no current
    /// question or it has already been answered.
    pub fn answer(&mut self, option: usize) -> Option<&Answer> {
        if self.answer.is_some() {
            return None;
        }
        let question = self.current()?.clone();
        let correct = question.is_correct(option);
        let assessed = question.assessed_word().cloned();

        let effect = match (self.phase, correct) {
            (Phase::Normal, true) => {
                self.score += 1;
                assessed.map_or(LedgerEffect::None, LedgerEffect::Learned)
            }
            (Phase::Normal, false) => {
                self.review.push(question);
                assessed.map_or(LedgerEffect::None, LedgerEffect::Mistake)
            }
            (Phase::Review, true) => {
                self.review_score += 1;
                assessed.map_or(LedgerEffect::None, LedgerEffect::ResetMistakes)
            }
            (Phase::Review, false) => assessed.map_or(LedgerEffect::None, LedgerEffect::Mistake),
            (Phase::Complete, _) => return None,
        };

        let answer = self.answer.insert(Answer {
            chosen: option,
            correct,
            effect,
        });
        Some(&*answer)
    }

    /// Move past an answered question. Unanswered questions are not skipped.
    pub fn advance(&mut self) -> Phase {
        if self.answer.take().is_none() {
            return self.phase;
        }
        self.cursor += 1;
        match self.phase {
            Phase::Normal if self.cursor >= self.questions.len() => {
                self.cursor = 0;
                self.phase = if self.review.is_empty() {
                    Phase::Complete
                } else {
                    Phase::Review
                };
            }
            Phase::Review if self.cursor >= self.review.len() => {
                self.cursor = 0;
                self.phase = Phase::Complete;
            }
            _ => {}
        }
        self.phase
    }

    /// Whether advancing past the current answer ends the session.
    pub fn finishes_on_advance(&self) -> bool {
        match self.phase {
            Phase::Normal => self.cursor + 1 >= self.questions.len() && self.review.is_empty(),
            Phase::Review => self.cursor + 1 >= self.review.len(),
            Phase::Complete => true,
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn review_total(&self) -> usize {
        self.review.len()
    }

    pub fn review_score(&self) -> usize {
        self.review_score
    }

    pub fn missed_prompts(&self) -> Vec<String> {
        self.review.iter().map(|q| q.prompt.clone()).collect()
    }
}
