use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::QuizType;
use crate::session::quiz::QuizSession;

/// Summary of one finished session, kept in the profile's history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizResult {
    pub quiz_type: QuizType,
    pub total: usize,
    pub correct: usize,
    #[serde(default)]
    pub review_total: usize,
    #[serde(default)]
    pub review_correct: usize,
    /// Prompts answered wrongly in the first pass.
    #[serde(default)]
    pub missed: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

impl QuizResult {
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            quiz_type: session.quiz_type(),
            total: session.total(),
            correct: session.score(),
            review_total: session.review_total(),
            review_correct: session.review_score(),
            missed: session.missed_prompts(),
            started_at: session.started_at(),
            timestamp: Utc::now(),
        }
    }

    /// Percentage of first-pass questions answered correctly.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.correct as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }

    #[cfg(test)]
    pub fn sample(quiz_type: QuizType, total: usize, correct: usize) -> Self {
        let now = Utc::now();
        Self {
            quiz_type,
            total,
            correct,
            review_total: total - correct,
            review_correct: 0,
            missed: Vec::new(),
            started_at: now,
            timestamp: now,
        }
    }
}
