use thiserror::Error;

/// Errors surfaced by vocabulary loading, quiz construction and the progress ledger.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Vocabulary could not be fetched or parsed. Halts quiz start.
    #[error("vocabulary unavailable: {0}")]
    DataUnavailable(String),

    #[error("not enough words to build a quiz: {available} available, at least {required} needed")]
    InsufficientVocabulary { available: usize, required: usize },

    /// A ledger mutation was attempted before `initialize` or `load`.
    #[error("progress ledger has not been initialized")]
    LedgerMissing,

    #[error("stored progress is corrupt: {0}")]
    CorruptPersistedState(String),

    /// Stored data carries a schema this build does not know how to read.
    #[error("stored data was written by a newer version (schema {found}, expected at most {supported})")]
    NewerSchema { found: u32, supported: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QuizError {
    /// Errors the UI shell shows to the user instead of recovering silently.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            QuizError::DataUnavailable(_) | QuizError::InsufficientVocabulary { .. }
        )
    }
}

impl From<csv::Error> for QuizError {
    fn from(err: csv::Error) -> Self {
        QuizError::DataUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_vocabulary_message_names_counts() {
        let err = QuizError::InsufficientVocabulary {
            available: 3,
            required: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('4'));
        assert!(err.is_user_facing());
    }

    #[test]
    fn persistence_errors_are_not_user_facing() {
        assert!(!QuizError::LedgerMissing.is_user_facing());
        assert!(!QuizError::CorruptPersistedState("x".into()).is_user_facing());
        assert!(
            !QuizError::NewerSchema {
                found: 3,
                supported: 2
            }
            .is_user_facing()
        );
    }
}
